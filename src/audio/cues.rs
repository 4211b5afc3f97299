//! Cue-to-clip resolution
//!
//! A cue is what gameplay asks for ("pickup", "alert"); a clip is a loaded
//! sound. Cues with several clip variants rotate through them with the
//! non-repeating picker, so the same footstep never plays twice in a row.
//! Pure bookkeeping, independent of any audio device.

use std::collections::HashMap;

use rand::Rng;

use crate::session::NonRepeating;

#[derive(Debug, Default)]
struct CueSlot {
    clips: Vec<String>,
    picker: NonRepeating,
}

/// Maps gameplay cue names to loaded clip names.
#[derive(Debug, Default)]
pub struct CueBank {
    cues: HashMap<String, CueSlot>,
}

impl CueBank {
    /// Create an empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip as a variant of `cue`. Call repeatedly to build up
    /// a variant pool.
    pub fn add_variant(&mut self, cue: impl Into<String>, clip: impl Into<String>) {
        self.cues
            .entry(cue.into())
            .or_default()
            .clips
            .push(clip.into());
    }

    /// Whether a cue has any variants.
    #[must_use]
    pub fn contains(&self, cue: &str) -> bool {
        self.cues.get(cue).is_some_and(|slot| !slot.clips.is_empty())
    }

    /// Resolve a cue to a clip name, avoiding the variant picked last time.
    pub fn resolve(&mut self, cue: &str, rng: &mut impl Rng) -> Option<&str> {
        let slot = self.cues.get_mut(cue)?;
        let index = slot.picker.pick(slot.clips.len(), rng)?;
        Some(slot.clips[index].as_str())
    }
}
