//! Gameplay event queue
//!
//! Gameplay systems report what happened (collectible gathered, player
//! caught, scene requested) as typed events; consumers such as the scene
//! flow and the audio cue player read them one frame later. The queue is
//! double-buffered so event visibility never depends on system update
//! order within a frame.

use std::collections::VecDeque;

use glam::Vec3;

/// Something that happened in the session.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GameEvent {
    /// The player picked up a collectible.
    CollectibleGathered {
        /// Score after the pickup.
        score: u32,
    },

    /// A new collectible appeared.
    CollectibleSpawned {
        /// Where it appeared.
        position: Vec3,
        /// Which authored spawn point was used.
        spawn_index: usize,
    },

    /// The enemy caught the player. Terminal.
    PlayerCaught {
        /// Where contact happened.
        position: Vec3,
    },

    /// The target score was reached. Terminal.
    CourseWon {
        /// Final score.
        score: u32,
    },

    /// The enemy switched behavior (for UI/audio reactions).
    EnemyStateChanged {
        /// New behavior name.
        state: &'static str,
    },

    /// Ask the scene flow to fade out and load a scene.
    SceneRequested {
        /// Scene to load once the fade completes.
        scene: String,
    },

    /// Ask the audio system to play a cue.
    PlaySound {
        /// Cue name.
        name: &'static str,
        /// Volume multiplier, 0.0 to 1.0.
        volume: f32,
    },
}

/// Double-buffered queue: events pushed during frame N are readable during
/// frame N+1, after [`swap`](EventQueue::swap).
#[derive(Debug)]
pub struct EventQueue {
    pending: VecDeque<GameEvent>,
    processing: VecDeque<GameEvent>,
}

impl EventQueue {
    const DEFAULT_CAPACITY: usize = 32;

    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(Self::DEFAULT_CAPACITY),
            processing: VecDeque::with_capacity(Self::DEFAULT_CAPACITY),
        }
    }

    /// Queue an event for next frame's consumers.
    #[inline]
    pub fn push(&mut self, event: GameEvent) {
        self.pending.push_back(event);
    }

    /// Flip buffers at the frame boundary: last frame's events become
    /// readable, the write side starts empty.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Events from the previous frame.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.processing.iter()
    }

    /// Number of readable events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Whether there is nothing to read this frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Drop everything, both readable and pending. Used on scene
    /// transitions.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
