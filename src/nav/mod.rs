//! Navigation providers
//!
//! The navigation-delegating enemy hands route planning to a [`NavQuery`]
//! provider instead of steering around obstacles itself. A grid-based
//! reference provider ([`GridNavigator`]) is included; a real game would
//! adapt its navigation-mesh service to the same trait.

mod grid;

pub use grid::{GridNavigator, NavGrid};

use glam::Vec3;

/// Route planning surface consumed by the navigation-delegating enemy.
///
/// Providers own the current route and its progress cursor; the agent only
/// requests destinations and asks which way to walk.
pub trait NavQuery {
    /// Plan a route from `from` to `destination`, replacing the current
    /// one.
    ///
    /// Returns `false` when no traversable route exists; the previous route
    /// is dropped in that case.
    fn request_destination(&mut self, from: Vec3, destination: Vec3) -> bool;

    /// Destination of the current route, if any.
    fn destination(&self) -> Option<Vec3>;

    /// Whether a route computation is still in flight. While this is true,
    /// remaining-distance readings are not meaningful.
    fn route_pending(&self) -> bool;

    /// Distance left along the route, measured from `position` through the
    /// remaining corners. Infinity when there is no route.
    fn remaining_distance(&self, position: Vec3) -> f32;

    /// Horizontal direction to travel from `position` to follow the route,
    /// advancing past corners as they are reached. `None` when there is no
    /// route or the end has been reached.
    fn direction_from(&mut self, position: Vec3) -> Option<Vec3>;

    /// Drop the current route.
    fn reset(&mut self);
}
