//! Spatial backend built on rapier3d
//!
//! Static obstacle geometry plus a kinematic character mover, implementing
//! the [`SpatialQuery`](crate::spatial::SpatialQuery) and
//! [`MotionIntegrator`](crate::spatial::MotionIntegrator) traits for the
//! demo binary and integration-style tests.

mod world;

pub use world::{CharacterBody, ObstacleWorld};
