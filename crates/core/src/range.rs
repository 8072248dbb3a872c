//! Particle index windows for paged loading

use serde::{Deserialize, Serialize};

/// Requested window of particles within one type
///
/// `max_count <= 0` means "everything from `start` on".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParticleRange {
    /// Index of the first particle to load
    pub start: u64,
    /// Upper bound on particles to load; zero or negative is unbounded
    pub max_count: i64,
}

impl ParticleRange {
    /// Window starting at `start` holding at most `max_count` particles
    pub fn new(start: u64, max_count: i64) -> Self {
        ParticleRange { start, max_count }
    }

    /// Every particle of the type
    pub fn all() -> Self {
        ParticleRange::new(0, 0)
    }

    /// Everything from `start` to the end
    pub fn from_start(start: u64) -> Self {
        ParticleRange::new(start, 0)
    }

    /// Whether the window has no upper bound
    pub fn is_unbounded(&self) -> bool {
        self.max_count <= 0
    }

    /// Concrete particle count against `available` particles
    ///
    /// A start at or past the end resolves to zero.
    pub fn resolve(&self, available: u64) -> u64 {
        let remaining = available.saturating_sub(self.start);
        if self.is_unbounded() {
            remaining
        } else {
            remaining.min(self.max_count as u64)
        }
    }

    /// Window immediately following this one after `loaded` particles
    pub fn next_page(&self, loaded: u64) -> Self {
        ParticleRange::new(self.start + loaded, self.max_count)
    }
}
