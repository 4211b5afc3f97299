//! Non-repeating random selection
//!
//! Picks indices from a pool while never returning the same index twice in
//! a row. Used for collectible spawn points and audio cue variants, so
//! back-to-back repeats don't read as a glitch. The RNG is injected, which
//! keeps the policy testable with a seeded generator.

use rand::Rng;

/// Index picker that excludes whatever it picked last.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonRepeating {
    last: Option<usize>,
}

impl NonRepeating {
    /// Create a picker with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent pick, if any.
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.last
    }

    /// Pick an index in `0..len`, never the previous one when `len > 1`.
    ///
    /// Returns `None` for an empty pool. A pool of one always yields 0.
    pub fn pick(&mut self, len: usize, rng: &mut impl Rng) -> Option<usize> {
        if len == 0 {
            return None;
        }

        let index = match self.last {
            Some(last) if len > 1 && last < len => {
                // Draw from the pool with the previous index removed, then
                // shift to skip over it.
                let raw = rng.gen_range(0..len - 1);
                if raw >= last { raw + 1 } else { raw }
            }
            _ => rng.gen_range(0..len),
        };

        self.last = Some(index);
        Some(index)
    }

    /// Drop the history, e.g. when the pool changes.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
