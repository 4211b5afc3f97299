//! Waypoint patrol routes
//!
//! A route is an externally authored, ordered list of world-space points.
//! Only the cursor (index and, for ping-pong, direction) mutates at runtime.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How the cursor behaves at the ends of the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatrolMode {
    /// After the last waypoint, continue at the first.
    #[default]
    Wrap,
    /// Reverse direction at either boundary.
    PingPong,
}

/// Ordered waypoint sequence with an advancing cursor.
#[derive(Debug, Clone)]
pub struct PatrolRoute {
    waypoints: Vec<Vec3>,
    mode: PatrolMode,
    index: usize,
    direction: i32,
}

impl PatrolRoute {
    /// Create a route over the given waypoints. An empty list is allowed;
    /// such a route simply never yields a destination.
    #[must_use]
    pub fn new(waypoints: Vec<Vec3>, mode: PatrolMode) -> Self {
        Self {
            waypoints,
            mode,
            index: 0,
            direction: 1,
        }
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the route has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Current cursor position.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The waypoint the cursor points at, if any.
    #[must_use]
    pub fn current(&self) -> Option<Vec3> {
        self.waypoints.get(self.index).copied()
    }

    /// Advance the cursor by one waypoint according to the mode.
    ///
    /// No-op on an empty route; the index stays in `[0, len - 1]` for every
    /// reachable sequence of calls.
    pub fn advance(&mut self) {
        let len = self.waypoints.len();
        if len == 0 {
            return;
        }

        match self.mode {
            PatrolMode::Wrap => {
                self.index = (self.index + 1) % len;
            }
            PatrolMode::PingPong => {
                if self.index == len - 1 {
                    self.direction = -1;
                } else if self.index == 0 {
                    self.direction = 1;
                }
                let next = self.index as i32 + self.direction;
                self.index = next.clamp(0, len as i32 - 1) as usize;
            }
        }
    }

    /// Advance if `position` is within `tolerance` of the current waypoint
    /// (horizontal distance). Returns whether an arrival happened.
    pub fn try_advance(&mut self, position: Vec3, tolerance: f32) -> bool {
        let Some(target) = self.current() else {
            return false;
        };
        let mut delta = target - position;
        delta.y = 0.0;
        if delta.length() <= tolerance {
            self.advance();
            true
        } else {
            false
        }
    }
}
