//! Enemy AI module
//!
//! Steering, obstacle avoidance, waypoint patrol, stuck recovery, and the
//! two enemy agent variants built from them.

mod agent;
mod nav_agent;
mod patrol;
mod recovery;
mod steering;

pub use agent::{BehaviorState, EnemyAgent, TickReport};
pub use nav_agent::NavEnemy;
pub use patrol::{PatrolMode, PatrolRoute};
pub use recovery::Recovery;
pub use steering::{SensorFan, Steering, seek};
