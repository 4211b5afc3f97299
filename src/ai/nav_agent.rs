//! Navigation-delegating enemy agent
//!
//! Variant of the enemy that hands route planning to a [`NavQuery`]
//! provider instead of steering around obstacles itself. Destination
//! requests are deduplicated against an epsilon and, while chasing,
//! throttled by a cooldown so the planner is not hammered every tick.

use glam::Vec3;

use crate::config::AgentConfig;
use crate::nav::NavQuery;
use crate::spatial::MotionIntegrator;

use super::agent::{BehaviorState, TickReport};
use super::patrol::PatrolRoute;

/// Enemy that moves along provider-planned routes.
#[derive(Debug)]
pub struct NavEnemy {
    config: AgentConfig,
    route: PatrolRoute,
    state: BehaviorState,
    since_path_request: f32,
    halted: bool,
    inert: bool,
}

impl NavEnemy {
    /// Create an agent with the given tuning and patrol route.
    ///
    /// An invalid config is reported once and leaves the agent inert.
    #[must_use]
    pub fn new(config: AgentConfig, route: PatrolRoute) -> Self {
        let inert = match config.validate() {
            Ok(()) => false,
            Err(e) => {
                log::error!("nav enemy disabled by invalid config: {e}");
                true
            }
        };

        Self {
            config,
            route,
            state: BehaviorState::Idle,
            since_path_request: f32::MAX,
            halted: false,
            inert,
        }
    }

    /// Behavior selected on the most recent tick.
    #[must_use]
    pub fn state(&self) -> BehaviorState {
        self.state
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
    pub fn tick(
        &mut self,
        target: Option<Vec3>,
        nav: &mut dyn NavQuery,
        mover: &mut dyn MotionIntegrator,
        dt: f32,
    ) -> TickReport {
        if self.inert || self.halted || dt <= 0.0 {
            return TickReport {
                state: BehaviorState::Idle,
                move_direction: Vec3::ZERO,
                caught: false,
            };
        }
        self.since_path_request = if self.since_path_request == f32::MAX {
            f32::MAX
        } else {
            self.since_path_request + dt
        };

        let Some(target) = target else {
            self.enter(BehaviorState::Idle);
            nav.reset();
            return TickReport {
                state: self.state,
                move_direction: Vec3::ZERO,
                caught: false,
            };
        };

        let position = mover.position();
        let target_distance = position.distance(target);

        // Contact beats everything.
        if target_distance <= self.config.catch_radius {
            self.halted = true;
            self.enter(BehaviorState::Idle);
            nav.reset();
            return TickReport {
                state: self.state,
                move_direction: Vec3::ZERO,
                caught: true,
            };
        }

        let (state, desired, speed) = if target_distance <= self.config.sensing_radius {
            (BehaviorState::Chase, Some(target), self.config.run_speed)
        } else if self.route.is_empty() {
            (BehaviorState::Idle, None, 0.0)
        } else {
            // Arrival is only judged when no route computation is in
            // flight; a half-planned route reports a meaningless
            // remaining distance.
            if !nav.route_pending()
                && nav.remaining_distance(position) <= self.config.waypoint_tolerance
            {
                self.route.advance();
            }
            (
                BehaviorState::Patrol,
                self.route.current(),
                self.config.walk_speed,
            )
        };
        self.enter(state);

        let Some(desired) = desired else {
            nav.reset();
            return TickReport {
                state: self.state,
                move_direction: Vec3::ZERO,
                caught: false,
            };
        };

        // Re-issue the destination only when it actually moved; chasing
        // additionally waits out the request cooldown.
        let eps = self.config.destination_epsilon;
        let moved = nav
            .destination()
            .is_none_or(|current| current.distance_squared(desired) > eps * eps);
        let cooled = state != BehaviorState::Chase
            || self.since_path_request >= self.config.path_request_cooldown;

        if moved && cooled {
            self.since_path_request = 0.0;
            if !nav.request_destination(position, desired) {
                log::warn!("no traversable route to {desired}; holding position this tick");
                return TickReport {
                    state: self.state,
                    move_direction: Vec3::ZERO,
                    caught: false,
                };
            }
        }

        let move_direction = nav.direction_from(position).unwrap_or(Vec3::ZERO);
        mover.move_by(move_direction * speed * dt);

        TickReport {
            state: self.state,
            move_direction,
            caught: false,
        }
    }

    fn enter(&mut self, state: BehaviorState) {
        if self.state != state {
            log::debug!("nav enemy: {} -> {}", self.state.name(), state.name());
            self.state = state;
        }
    }
}
