//! Authored gameplay configuration
//!
//! Tuning values are authored offline (RON or JSON, matching the engine's
//! scene files) and are immutable at runtime. Validation runs once at
//! startup; components given an invalid config log the problem and degrade
//! to inert instead of failing the process.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ai::PatrolMode;

/// Tuning for one enemy agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Movement speed in units/s (steering variant).
    pub move_speed: f32,
    /// Heading turn rate in degrees/s.
    pub rotation_speed_deg: f32,
    /// Downward acceleration in units/s^2 (negative).
    pub gravity: f32,
    /// Obstacle detection radius for the sensor fan.
    pub detection_radius: f32,
    /// Number of probes in the sensor fan.
    pub ray_count: usize,
    /// Total sensor fan angle in degrees.
    pub field_of_view_deg: f32,
    /// Sphere radius for each probe sweep; zero casts plain rays.
    pub probe_radius: f32,
    /// How strongly avoidance bends the movement direction.
    pub avoidance_strength: f32,
    /// Extra weight for probes near the fan center, 0.0 = uniform.
    pub center_bias: f32,
    /// Distance at which a waypoint counts as reached.
    pub waypoint_tolerance: f32,
    /// Cursor behavior at route boundaries.
    pub patrol_mode: PatrolMode,
    /// Speeds below this count as stalled (units/s).
    pub stuck_speed_threshold: f32,
    /// Continuous stall time before an escape triggers (s).
    pub stuck_timeout: f32,
    /// Escape override length (s).
    pub escape_duration: f32,
    /// Target inside this range is chased.
    pub sensing_radius: f32,
    /// Target inside this range is caught.
    pub catch_radius: f32,
    /// Patrol speed of the navigation-delegating variant (units/s).
    pub walk_speed: f32,
    /// Chase speed of the navigation-delegating variant (units/s).
    pub run_speed: f32,
    /// Minimum time between chase path requests (s).
    pub path_request_cooldown: f32,
    /// A destination closer than this to the current one is not re-issued.
    pub destination_epsilon: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.5,
            rotation_speed_deg: 120.0,
            gravity: -9.81,
            detection_radius: 3.0,
            ray_count: 9,
            field_of_view_deg: 120.0,
            probe_radius: 0.0,
            avoidance_strength: 2.5,
            center_bias: 0.0,
            waypoint_tolerance: 1.0,
            patrol_mode: PatrolMode::Wrap,
            stuck_speed_threshold: 0.35,
            stuck_timeout: 1.5,
            escape_duration: 0.75,
            sensing_radius: 15.0,
            catch_radius: 1.5,
            walk_speed: 2.0,
            run_speed: 5.0,
            path_request_cooldown: 0.5,
            destination_epsilon: 0.32,
        }
    }
}

impl AgentConfig {
    /// Heading turn rate in radians/s.
    #[must_use]
    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed_deg.to_radians()
    }

    /// Sensor fan angle in radians.
    #[must_use]
    pub fn field_of_view(&self) -> f32 {
        self.field_of_view_deg.to_radians()
    }

    /// Check the config for values that would break the per-tick math.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive and finite",
                })
            }
        }

        positive("move_speed", self.move_speed)?;
        positive("rotation_speed_deg", self.rotation_speed_deg)?;
        positive("detection_radius", self.detection_radius)?;
        positive("field_of_view_deg", self.field_of_view_deg)?;
        positive("waypoint_tolerance", self.waypoint_tolerance)?;
        positive("stuck_speed_threshold", self.stuck_speed_threshold)?;
        positive("stuck_timeout", self.stuck_timeout)?;
        positive("escape_duration", self.escape_duration)?;
        positive("sensing_radius", self.sensing_radius)?;
        positive("catch_radius", self.catch_radius)?;
        positive("walk_speed", self.walk_speed)?;
        positive("run_speed", self.run_speed)?;
        positive("destination_epsilon", self.destination_epsilon)?;

        if self.ray_count == 0 {
            return Err(ConfigError::Invalid {
                field: "ray_count",
                reason: "at least one sensor probe is required",
            });
        }
        if !self.gravity.is_finite() || self.gravity >= 0.0 {
            return Err(ConfigError::Invalid {
                field: "gravity",
                reason: "must be negative and finite",
            });
        }
        if self.catch_radius > self.sensing_radius {
            return Err(ConfigError::Invalid {
                field: "catch_radius",
                reason: "must not exceed sensing_radius",
            });
        }
        if self.path_request_cooldown < 0.0 || !self.path_request_cooldown.is_finite() {
            return Err(ConfigError::Invalid {
                field: "path_request_cooldown",
                reason: "must be zero or positive",
            });
        }

        Ok(())
    }
}

/// Session-level rules and scene wiring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Collectibles required to win.
    pub target_score: u32,
    /// Distance at which the player gathers a collectible.
    pub gather_radius: f32,
    /// Fade-out length before a scene load (s).
    pub fade_duration: f32,
    /// Scene loaded when the enemy catches the player.
    pub lose_scene: String,
    /// Scene loaded when the target score is reached.
    pub win_scene: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_score: 5,
            gather_radius: 1.0,
            fade_duration: 1.5,
            lose_scene: String::from("EndScene"),
            win_scene: String::from("WinScene"),
        }
    }
}

impl SessionConfig {
    /// Check the session rules.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_score == 0 {
            return Err(ConfigError::Invalid {
                field: "target_score",
                reason: "must be at least 1",
            });
        }
        if !(self.gather_radius > 0.0 && self.gather_radius.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "gather_radius",
                reason: "must be positive and finite",
            });
        }
        if !(self.fade_duration > 0.0 && self.fade_duration.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "fade_duration",
                reason: "must be positive and finite",
            });
        }
        Ok(())
    }
}

/// Authored level content: spawn points and patrol waypoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Where the player starts.
    pub player_spawn: Vec3,
    /// Where the enemy starts.
    pub enemy_spawn: Vec3,
    /// Patrol waypoints, in visiting order.
    pub waypoints: Vec<Vec3>,
    /// Candidate collectible spawn points.
    pub spawn_points: Vec<Vec3>,
}

/// Complete authored configuration for a game session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub agent: AgentConfig,
    pub session: SessionConfig,
    pub level: LevelConfig,
}

impl GameConfig {
    /// Load a config from a RON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        ron::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load a config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save the config to a RON file, e.g. to produce an editable template.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ConfigError::IoError(e.to_string()))
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first offending field across all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.agent.validate()?;
        self.session.validate()?;
        Ok(())
    }
}

/// Errors from loading or validating configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error reading or writing a config file.
    IoError(String),
    /// Malformed RON/JSON.
    ParseError(String),
    /// A value that would break the simulation.
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::ParseError(e) => write!(f, "Parse error: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}
