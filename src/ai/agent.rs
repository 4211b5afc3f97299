//! Steering-based enemy agent
//!
//! Per-tick control loop: pick a behavior (patrol, chase, or the escape
//! override), combine seek and obstacle avoidance into a movement
//! direction, turn the heading at a bounded rate, and hand the resulting
//! displacement to the motion integrator.

use glam::Vec3;
use rand::Rng;

use crate::config::AgentConfig;
use crate::spatial::{MotionIntegrator, ObstacleFilter, SpatialQuery};

use super::patrol::PatrolRoute;
use super::recovery::Recovery;
use super::steering::{self, SensorFan, Steering};

/// Behavior driving the agent during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BehaviorState {
    /// No target and no usable route; the agent stays put.
    #[default]
    Idle,
    /// Visiting waypoints in route order.
    Patrol,
    /// Pursuing the target.
    Chase,
    /// Corner-escape override is steering.
    Escape,
}

impl BehaviorState {
    /// State name for logging.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Patrol => "Patrol",
            Self::Chase => "Chase",
            Self::Escape => "Escape",
        }
    }
}

/// What one tick concluded.
#[derive(Debug, Clone, Copy)]
pub struct TickReport {
    /// Behavior that drove this tick.
    pub state: BehaviorState,
    /// Horizontal movement direction, unit length or zero.
    pub move_direction: Vec3,
    /// The target entered the catch radius this tick.
    pub caught: bool,
}

impl TickReport {
    fn idle() -> Self {
        Self {
            state: BehaviorState::Idle,
            move_direction: Vec3::ZERO,
            caught: false,
        }
    }
}

/// Enemy that steers directly: seek plus sensor-fan avoidance, with
/// patrol/chase selection and stuck recovery.
#[derive(Debug)]
pub struct EnemyAgent {
    config: AgentConfig,
    fan: SensorFan,
    filter: ObstacleFilter,
    steering: Steering,
    recovery: Recovery,
    route: PatrolRoute,
    state: BehaviorState,
    grounded: bool,
    halted: bool,
    inert: bool,
}

impl EnemyAgent {
    /// Create an agent with the given tuning, patrol route, and initial
    /// heading.
    ///
    /// An invalid config is reported once and leaves the agent inert; every
    /// later tick is a no-op rather than an error.
    #[must_use]
    pub fn new(config: AgentConfig, route: PatrolRoute, heading: Vec3) -> Self {
        let inert = match config.validate() {
            Ok(()) => false,
            Err(e) => {
                log::error!("enemy agent disabled by invalid config: {e}");
                true
            }
        };

        let fan = SensorFan {
            ray_count: config.ray_count,
            field_of_view: config.field_of_view(),
            detection_radius: config.detection_radius,
            probe_radius: config.probe_radius,
            center_bias: config.center_bias,
        };
        let recovery = Recovery::new(
            config.stuck_speed_threshold,
            config.stuck_timeout,
            config.escape_duration,
        );

        Self {
            fan,
            filter: ObstacleFilter::blocking(),
            steering: Steering::new(heading),
            recovery,
            route,
            state: BehaviorState::Idle,
            grounded: false,
            halted: false,
            inert,
            config,
        }
    }

    /// Replace the obstacle filter used by the sensor fan.
    #[must_use]
    pub fn with_filter(mut self, filter: ObstacleFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Behavior selected on the most recent tick.
    #[must_use]
    pub fn state(&self) -> BehaviorState {
        self.state
    }

    /// Current horizontal heading.
    #[must_use]
    pub fn heading(&self) -> Vec3 {
        self.steering.heading()
    }

    /// Whether the agent was disabled by an invalid config.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.inert
    }

    /// Whether the agent has caught its target and stopped.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// The patrol route cursor, for inspection.
    #[must_use]
    pub fn route(&self) -> &PatrolRoute {
        &self.route
    }

    /// Advance the agent one simulation tick.
    ///
    /// `target` is the pursued point, if one currently exists; `world`
    /// answers obstacle probes and `mover` applies the resulting
    /// displacement. A missing target leaves the agent idle for the tick.
    pub fn tick(
        &mut self,
        target: Option<Vec3>,
        world: &dyn SpatialQuery,
        mover: &mut dyn MotionIntegrator,
        dt: f32,
        rng: &mut impl Rng,
    ) -> TickReport {
        if self.inert || self.halted || dt <= 0.0 {
            return TickReport::idle();
        }
        let Some(target) = target else {
            self.enter(BehaviorState::Idle);
            return TickReport::idle();
        };

        let position = mover.position();
        let target_distance = position.distance(target);

        // Contact beats everything: report the catch and stop moving.
        if target_distance <= self.config.catch_radius {
            self.halted = true;
            self.enter(BehaviorState::Idle);
            return TickReport {
                state: self.state,
                move_direction: Vec3::ZERO,
                caught: true,
            };
        }

        // Pick this tick's destination: the target when it is in sensing
        // range, the current waypoint otherwise.
        let (selected, destination) = if target_distance <= self.config.sensing_radius {
            (BehaviorState::Chase, Some(target))
        } else if self.route.is_empty() {
            (BehaviorState::Idle, None)
        } else {
            self.route
                .try_advance(position, self.config.waypoint_tolerance);
            (BehaviorState::Patrol, self.route.current())
        };

        let (state, move_direction) = if let Some(destination) = destination {
            let seek = steering::seek(position, destination);

            // The escape override bypasses seek and avoidance entirely
            // while it is active.
            match self.recovery.tick(position, seek, dt, rng) {
                Some(escape) => (BehaviorState::Escape, escape),
                None => {
                    let avoidance = self.fan.avoidance(
                        world,
                        position,
                        self.steering.heading(),
                        self.filter,
                    );
                    let desired = self.steering.desired_direction(
                        seek,
                        avoidance,
                        self.config.avoidance_strength,
                    );
                    (selected, desired)
                }
            }
        } else {
            // Not trying to move; progress monitoring would only misfire
            // once movement resumes.
            self.recovery.reset();
            (selected, Vec3::ZERO)
        };
        self.enter(state);

        self.steering
            .turn_towards(move_direction, self.config.rotation_speed(), dt);

        let vertical = self.steering.fall(self.config.gravity, self.grounded, dt);
        let displacement =
            move_direction * self.config.move_speed * dt + Vec3::new(0.0, vertical, 0.0);
        self.grounded = mover.move_by(displacement).grounded;

        TickReport {
            state: self.state,
            move_direction,
            caught: false,
        }
    }

    fn enter(&mut self, state: BehaviorState) {
        if self.state != state {
            log::debug!("enemy: {} -> {}", self.state.name(), state.name());
            self.state = state;
        }
    }
}
