//! Error types for fakespec core
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while building core values from untrusted input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Particle type slot outside `0..N_TYPES`
    #[error("Invalid particle type slot {0} (expected 0..6)")]
    InvalidParticleType(usize),

    /// Particle type name not recognised
    #[error("Unknown particle type name: {0:?}")]
    UnknownParticleTypeName(String),
}
