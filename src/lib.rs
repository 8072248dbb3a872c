//! fakespec - paged particle loading from Gadget simulation snapshots
//!
//! Reads one particle type at a time from SnapFormat 1 or 2 snapshot files
//! (either byte order, single or double precision, one file or many) into
//! owned columnar buffers, together with the cosmological scalars of the
//! snapshot.
//!
//! # Quick Start
//!
//! ```ignore
//! use fakespec::{LoaderConfig, ParticleRange, SnapshotLoader};
//!
//! let loader = SnapshotLoader::new(LoaderConfig::default())?;
//! let outcome = loader.load("snapdir/snapshot_010", ParticleRange::new(0, 1_000_000))?;
//! if let Some(buffer) = outcome.buffer {
//!     println!("{} gas particles, H(a) = {}", buffer.len(), outcome.scalars.hubble_rate);
//! }
//! ```
//!
//! # Architecture
//!
//! - `fakespec-core`: particle types, header, ranges, cosmology
//! - `fakespec-format`: the block container interface and the Gadget reader
//! - `fakespec-loader`: configuration, buffers and the load sequence

pub use fakespec_core::{
    hubble_rate, omega_baryon, ParticleRange, ParticleType, SnapshotHeader, SnapshotScalars,
    TypeMask,
};
pub use fakespec_format::{
    BlockContainer, BlockTag, ContainerError, Endian, GadgetOptions, GadgetSnapshot,
    MemoryContainer, SnapFormat,
};
pub use fakespec_loader::{
    AllocationError, ConfigError, FormatVersion, HeliumTracking, LoadError, LoadOutcome,
    LoadResult, LoaderConfig, Pages, ParticleBuffer, SnapshotLoader,
};
