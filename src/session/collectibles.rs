//! Collectible spawning and score
//!
//! One collectible exists at a time. Gathering it scores a point and
//! respawns the next one at a different authored spawn point; reaching the
//! target score raises the win event. Spawn-point selection goes through
//! the non-repeating picker so the next pill never appears where the last
//! one stood.

use glam::Vec3;
use rand::Rng;

use super::events::{EventQueue, GameEvent};
use super::picker::NonRepeating;
use super::triggers::ContactTrigger;

/// The collectible currently placed in the level.
#[derive(Debug, Clone, Copy)]
struct ActiveCollectible {
    position: Vec3,
    trigger: ContactTrigger,
}

/// Spawn bookkeeping, score tally, and the win condition.
#[derive(Debug)]
pub struct CollectibleSpawner {
    spawn_points: Vec<Vec3>,
    target_score: u32,
    gather_radius: f32,
    score: u32,
    picker: NonRepeating,
    active: Option<ActiveCollectible>,
    inert: bool,
}

impl CollectibleSpawner {
    /// Create a spawner over the authored spawn points.
    ///
    /// An empty spawn-point list is reported once and leaves the spawner
    /// inert; the session simply runs without collectibles.
    #[must_use]
    pub fn new(spawn_points: Vec<Vec3>, target_score: u32, gather_radius: f32) -> Self {
        let inert = spawn_points.is_empty();
        if inert {
            log::error!("no collectible spawn points authored; spawner disabled");
        }

        Self {
            spawn_points,
            target_score,
            gather_radius,
            score: 0,
            picker: NonRepeating::new(),
            active: None,
            inert,
        }
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Score required to win.
    #[must_use]
    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    /// Position of the collectible currently in the level.
    #[must_use]
    pub fn active_position(&self) -> Option<Vec3> {
        self.active.map(|a| a.position)
    }

    /// Whether the spawner was disabled at construction.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.inert
    }

    /// Place the first collectible. Call once when the session starts.
    pub fn spawn_first(&mut self, rng: &mut impl Rng, events: &mut EventQueue) {
        if self.inert || self.active.is_some() {
            return;
        }
        self.spawn_next(rng, events);
    }

    /// Advance the collectible loop one tick.
    ///
    /// Checks the active collectible's trigger against the player; on a
    /// gather, scores, and either wins the session or respawns elsewhere.
    pub fn tick(
        &mut self,
        player: Vec3,
        session_ended: bool,
        rng: &mut impl Rng,
        events: &mut EventQueue,
    ) {
        if self.inert {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };

        if !active.trigger.check(player, active.position, session_ended) {
            return;
        }

        self.active = None;
        self.score += 1;
        events.push(GameEvent::CollectibleGathered { score: self.score });
        events.push(GameEvent::PlaySound {
            name: "pickup",
            volume: 1.0,
        });

        if self.score >= self.target_score {
            events.push(GameEvent::CourseWon { score: self.score });
        } else {
            self.spawn_next(rng, events);
        }
    }

    fn spawn_next(&mut self, rng: &mut impl Rng, events: &mut EventQueue) {
        let Some(spawn_index) = self.picker.pick(self.spawn_points.len(), rng) else {
            return;
        };
        let position = self.spawn_points[spawn_index];

        self.active = Some(ActiveCollectible {
            position,
            trigger: ContactTrigger::new(self.gather_radius),
        });
        events.push(GameEvent::CollectibleSpawned {
            position,
            spawn_index,
        });
    }
}
