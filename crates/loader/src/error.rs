//! Load errors
//!
//! Every error is fatal to the load call that raised it. The loader never
//! exits the process; callers decide what a failed load means.

use crate::buffer::AllocationError;
use crate::config::ConfigError;
use fakespec_format::{BlockTag, ContainerError};
use std::path::PathBuf;

/// Result type alias for load operations
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Errors that can occur while loading particles
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The snapshot could not be opened
    #[error("Failed to open snapshot {path:?}: {source}")]
    ContainerOpen {
        /// Path given to the loader
        path: PathBuf,
        /// Underlying container error
        #[source]
        source: ContainerError,
    },

    /// The particle buffer could not be allocated
    #[error("Particle buffer allocation failed: {0}")]
    Allocation(#[from] AllocationError),

    /// Particle masses of one species differ
    #[error("Mass of particle {index} is {found}, expected {expected}: particles of one species must share a mass")]
    CorruptMassData {
        /// Index within the loaded window
        index: u64,
        /// Mass of the first particle
        expected: f32,
        /// Differing mass
        found: f32,
    },

    /// A block required by the configured format is absent
    #[error("Required block {tag} is missing")]
    BlockMissing {
        /// Missing tag
        tag: BlockTag,
    },

    /// Any other container read failure
    #[error("Container error: {0}")]
    Container(ContainerError),

    /// The loader config was rejected
    #[error("Invalid loader config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl From<ContainerError> for LoadError {
    fn from(e: ContainerError) -> Self {
        match e {
            ContainerError::BlockNotFound { tag } => LoadError::BlockMissing { tag },
            other => LoadError::Container(other),
        }
    }
}
