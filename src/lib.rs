//! Gameplay core for a small 3D pursuit game
//!
//! This crate provides:
//! - Enemy AI: steering with obstacle avoidance, waypoint patrol, chase,
//!   and stuck recovery
//! - A navigation-delegating enemy variant with destination deduplication
//! - Collectible spawning, score, and win/lose session flow
//! - Scene transitions driven by an explicit tick
//!
//! Engine services (spatial probes, character motion, navigation, scene
//! loading, audio output) sit behind traits; rapier3d-backed reference
//! implementations are included for the demo and tests.

pub mod ai;
pub mod audio;
pub mod config;
pub mod ecs;
pub mod nav;
pub mod physics;
pub mod session;
pub mod spatial;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use rapier3d;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{
        BehaviorState, EnemyAgent, NavEnemy, PatrolMode, PatrolRoute, SensorFan, Steering,
    };
    pub use crate::config::{AgentConfig, ConfigError, GameConfig, LevelConfig, SessionConfig};
    pub use crate::ecs::{Collectible, Enemy, Name, Player, Transform, World};
    pub use crate::nav::{GridNavigator, NavGrid, NavQuery};
    pub use crate::physics::{CharacterBody, ObstacleWorld};
    pub use crate::session::{
        EventQueue, GameEvent, GameSession, SceneFlow, SceneLoader, SessionOutcome,
    };
    pub use crate::spatial::{
        MotionIntegrator, MoveResult, ObstacleCategory, ObstacleFilter, ProbeHit, SpatialQuery,
    };
    pub use glam::{Quat, Vec3};
}
