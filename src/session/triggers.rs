//! One-shot contact triggers
//!
//! Bridges a geometric condition (two volumes overlapping) to a single
//! event. The latch guarantees the event fires exactly once per trigger
//! lifetime, and a suppressed trigger (session already over) never fires
//! at all.

use glam::Vec3;

/// Sphere-overlap trigger that fires exactly once.
#[derive(Debug, Clone, Copy)]
pub struct ContactTrigger {
    /// Contact distance between the two volume centers.
    radius: f32,
    fired: bool,
}

impl ContactTrigger {
    /// Create a trigger with the given contact radius.
    #[must_use]
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            fired: false,
        }
    }

    /// Whether the trigger has already fired.
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Test the trigger for this tick.
    ///
    /// Returns `true` exactly once: on the first tick where the volumes
    /// overlap and `suppressed` is false. Contact persisting across later
    /// ticks does not re-fire, and a suppressed trigger latches nothing.
    pub fn check(&mut self, a: Vec3, b: Vec3, suppressed: bool) -> bool {
        if self.fired || suppressed {
            return false;
        }
        if a.distance(b) <= self.radius {
            self.fired = true;
            return true;
        }
        false
    }

    /// Re-arm the trigger, e.g. for a respawned volume.
    pub fn rearm(&mut self) {
        self.fired = false;
    }
}
