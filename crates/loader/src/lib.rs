//! Particle loading for fakespec
//!
//! Turns a window of one particle type into an owned, columnar
//! [`ParticleBuffer`] plus the snapshot's cosmological scalars.
//!
//! - Config: particle type, helium tracking, electron fraction layout
//! - Buffer: all-or-nothing allocation and consuming release
//! - Loader: the ordered block reads and derived quantities
//! - Diagnostics: `tracing` summaries for the first page

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod loader;

pub use buffer::{AllocationError, ParticleBuffer};
pub use config::{ConfigError, FormatVersion, HeliumTracking, LoaderConfig};
pub use error::{LoadError, LoadResult};
pub use loader::{LoadOutcome, Pages, SnapshotLoader};
