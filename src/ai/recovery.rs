//! Stuck detection and corner-escape recovery
//!
//! Watches horizontal displacement per tick; when the agent stalls against
//! geometry for long enough, steering is overridden with a fixed lateral
//! escape direction until a timer runs out.

use glam::Vec3;
use rand::Rng;

/// Progress monitor with a timed lateral escape override.
#[derive(Debug, Clone, Copy)]
pub struct Recovery {
    /// Speeds below this count as "not making progress" (units/s).
    stuck_speed_threshold: f32,
    /// Continuous stall time required to trigger an escape (s).
    stuck_timeout: f32,
    /// How long an escape overrides steering (s).
    escape_duration: f32,

    stuck_timer: f32,
    escape_timer: f32,
    escape_direction: Vec3,
    last_position: Option<Vec3>,
}

impl Recovery {
    /// Create a recovery monitor with the given tuning.
    #[must_use]
    pub fn new(stuck_speed_threshold: f32, stuck_timeout: f32, escape_duration: f32) -> Self {
        Self {
            stuck_speed_threshold,
            stuck_timeout,
            escape_duration,
            stuck_timer: 0.0,
            escape_timer: 0.0,
            escape_direction: Vec3::ZERO,
            last_position: None,
        }
    }

    /// Whether an escape override is currently active.
    #[must_use]
    pub fn is_escaping(&self) -> bool {
        self.escape_timer > 0.0
    }

    /// Accumulated stall time, for debugging/telemetry.
    #[must_use]
    pub fn stuck_timer(&self) -> f32 {
        self.stuck_timer
    }

    /// Forget all progress history, e.g. after a teleport or respawn.
    pub fn reset(&mut self) {
        self.stuck_timer = 0.0;
        self.escape_timer = 0.0;
        self.escape_direction = Vec3::ZERO;
        self.last_position = None;
    }

    /// Advance the monitor one tick.
    ///
    /// `seek` is the direction the agent wants to move this tick; the escape
    /// direction is derived from it once, at activation, and held stable for
    /// the whole escape. Returns the override direction while an escape is
    /// active, `None` when normal steering should run.
    pub fn tick(&mut self, position: Vec3, seek: Vec3, dt: f32, rng: &mut impl Rng) -> Option<Vec3> {
        if dt <= 0.0 {
            return self.is_escaping().then_some(self.escape_direction);
        }

        // Instantaneous horizontal speed since the previous tick. The
        // vertical part is excluded so the grounding bias does not read as
        // forward progress. Progress is not judged while an escape drives;
        // measurement resumes once steering is back in control.
        if let Some(last) = self.last_position {
            if self.escape_timer <= 0.0 {
                let mut displacement = position - last;
                displacement.y = 0.0;
                let speed = displacement.length() / dt;

                if speed < self.stuck_speed_threshold {
                    self.stuck_timer += dt;
                } else {
                    self.stuck_timer = 0.0;
                }
            }
        }
        self.last_position = Some(position);

        // Count down an active escape before considering a new one.
        if self.escape_timer > 0.0 {
            self.escape_timer -= dt;
            if self.escape_timer > 0.0 {
                return Some(self.escape_direction);
            }
            self.escape_timer = 0.0;
            return None;
        }

        if self.stuck_timer >= self.stuck_timeout {
            let lateral = seek.cross(Vec3::Y).normalize_or_zero();
            if lateral == Vec3::ZERO {
                // No usable seek direction to escape relative to; try again
                // next tick.
                return None;
            }

            let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            self.escape_direction = lateral * side;
            self.stuck_timer = 0.0;
            self.escape_timer = self.escape_duration;
            return Some(self.escape_direction);
        }

        None
    }
}
