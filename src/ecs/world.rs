//! Entity storage for a game session
//!
//! Wraps hecs with helpers for the handful of entity shapes this game
//! uses: the player, the enemy, and the collectibles mirrored from the
//! spawner.

use glam::Vec3;
use hecs::Entity;

use super::components::{Collectible, Enemy, Name, Player, Transform};

/// Game world containing all session entities.
#[derive(Default)]
pub struct World {
    inner: hecs::World,
}

impl World {
    /// Create a new empty world.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn an entity with arbitrary components.
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        self.inner.spawn(components)
    }

    /// Spawn the player entity.
    pub fn spawn_player(&mut self, position: Vec3) -> Entity {
        self.inner.spawn((
            Transform::from_position(position),
            Player,
            Name::new("player"),
        ))
    }

    /// Spawn the enemy entity with its brain component attached.
    pub fn spawn_enemy(&mut self, position: Vec3, brain: impl hecs::Component) -> Entity {
        self.inner.spawn((
            Transform::from_position(position),
            Enemy,
            Name::new("enemy"),
            brain,
        ))
    }

    /// Spawn a collectible entity.
    pub fn spawn_collectible(&mut self, position: Vec3) -> Entity {
        self.inner.spawn((
            Transform::from_position(position),
            Collectible,
            Name::new("collectible"),
        ))
    }

    /// Remove every collectible entity.
    pub fn despawn_collectibles(&mut self) {
        let stale: Vec<Entity> = self
            .inner
            .query::<&Collectible>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        for entity in stale {
            let _ = self.inner.despawn(entity);
        }
    }

    /// Positions of all collectible entities.
    #[must_use]
    pub fn collectible_positions(&self) -> Vec<Vec3> {
        self.inner
            .query::<(&Collectible, &Transform)>()
            .iter()
            .map(|(_, (_, transform))| transform.position)
            .collect()
    }

    /// Despawn an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity no longer exists.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.inner.despawn(entity)
    }

    /// Whether an entity still exists.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.inner.contains(entity)
    }

    /// Position of an entity, if it exists and has a transform.
    #[must_use]
    pub fn position(&self, entity: Entity) -> Option<Vec3> {
        self.inner
            .get::<&Transform>(entity)
            .map(|t| t.position)
            .ok()
    }

    /// Move an entity, leaving its orientation alone. No-op for missing
    /// entities.
    pub fn set_position(&mut self, entity: Entity, position: Vec3) {
        if let Ok(mut transform) = self.inner.get::<&mut Transform>(entity) {
            transform.position = position;
        }
    }

    /// Move an entity and face it along a heading.
    pub fn place_facing(&mut self, entity: Entity, position: Vec3, heading: Vec3) {
        if let Ok(mut transform) = self.inner.get::<&mut Transform>(entity) {
            transform.position = position;
            transform.face(heading);
        }
    }

    /// Get a reference to a component.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity or component is missing.
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// Get a mutable reference to a component.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity or component is missing.
    pub fn get_mut<T: hecs::Component>(
        &mut self,
        entity: Entity,
    ) -> Result<hecs::RefMut<'_, T>, hecs::ComponentError> {
        self.inner.get::<&mut T>(entity)
    }

    /// Query for entities with specific components.
    pub fn query<Q: hecs::Query>(&self) -> hecs::QueryBorrow<'_, Q> {
        self.inner.query::<Q>()
    }
}
