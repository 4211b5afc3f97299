//! External spatial collaborators
//!
//! The gameplay core never talks to a physics engine directly. Obstacle
//! probes and collision-resolved movement go through the traits in this
//! module; backends live elsewhere (see [`crate::physics`] for the
//! rapier-based one used by the demo).

use glam::Vec3;

/// Category of scene geometry, used to filter spatial probes.
///
/// Replaces engine layer masks with an explicit, testable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleCategory {
    /// Walkable ground.
    Terrain,
    /// Walls and other static level geometry.
    Structure,
    /// Movable scenery.
    Prop,
    /// Other characters.
    Character,
}

impl ObstacleCategory {
    const COUNT: usize = 4;

    /// Every category, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Terrain,
        Self::Structure,
        Self::Prop,
        Self::Character,
    ];

    /// Stable index of this category, usable as a bit position.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Terrain => 0,
            Self::Structure => 1,
            Self::Prop => 2,
            Self::Character => 3,
        }
    }
}

/// Which obstacle categories a probe should report.
#[derive(Debug, Clone, Copy)]
pub struct ObstacleFilter {
    accepted: [bool; ObstacleCategory::COUNT],
}

impl ObstacleFilter {
    /// Filter that accepts every category.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            accepted: [true; ObstacleCategory::COUNT],
        }
    }

    /// Filter that accepts nothing; combine with [`with`](Self::with).
    #[must_use]
    pub const fn none() -> Self {
        Self {
            accepted: [false; ObstacleCategory::COUNT],
        }
    }

    /// Filter for what steering should avoid: level geometry and props,
    /// not the ground itself.
    #[must_use]
    pub const fn blocking() -> Self {
        Self::none()
            .with(ObstacleCategory::Structure)
            .with(ObstacleCategory::Prop)
    }

    /// Everything a moving body collides with: ground, level geometry, and
    /// props, but not other characters.
    #[must_use]
    pub const fn solid() -> Self {
        Self::blocking().with(ObstacleCategory::Terrain)
    }

    /// Add a category to the accepted set.
    #[must_use]
    pub const fn with(mut self, category: ObstacleCategory) -> Self {
        self.accepted[category.index()] = true;
        self
    }

    /// Check whether a category passes the filter.
    #[must_use]
    pub const fn accepts(&self, category: ObstacleCategory) -> bool {
        self.accepted[category.index()]
    }
}

impl Default for ObstacleFilter {
    fn default() -> Self {
        Self::blocking()
    }
}

/// Result of a spatial probe.
#[derive(Debug, Clone, Copy)]
pub struct ProbeHit {
    /// Distance from the probe origin to the hit.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Answers "is there an obstacle along this ray/sphere sweep?".
pub trait SpatialQuery {
    /// Sweep a sphere of `radius` from `origin` along `direction`, up to
    /// `max_distance`, reporting the nearest hit whose category passes
    /// `filter`. A `radius` of zero degenerates to a raycast.
    ///
    /// `direction` is expected to be normalized.
    fn probe(
        &self,
        origin: Vec3,
        direction: Vec3,
        radius: f32,
        max_distance: f32,
        filter: ObstacleFilter,
    ) -> Option<ProbeHit>;
}

/// Result of a collision-resolved move.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveResult {
    /// Whether the mover ended the step standing on ground.
    pub grounded: bool,
}

/// Engine character controller: applies a displacement with collision
/// resolution and owns the resulting position.
pub trait MotionIntegrator {
    /// Current world-space position of the mover.
    fn position(&self) -> Vec3;

    /// Apply a displacement, sliding along whatever is in the way.
    fn move_by(&mut self, displacement: Vec3) -> MoveResult;
}
