//! Entity storage and common components

mod components;
mod world;

pub use components::{Collectible, Enemy, Name, Player, Transform};
pub use world::World;
