//! Audio cues for gameplay events
//!
//! Built on the rodio audio library. Gameplay pushes `PlaySound` events;
//! the player resolves each cue to a loaded clip (rotating between
//! variants without immediate repeats) and fires it at the mixer. A
//! machine without an output device degrades to silence instead of
//! failing the session.

mod cues;
mod player;

pub use cues::CueBank;
pub use player::{AudioError, AudioPlayer};
