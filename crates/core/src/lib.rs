//! Core types for fakespec
//!
//! This crate defines the foundational types shared by the container readers
//! and the particle loader:
//! - ParticleType / TypeMask: the six particle slots and skip masks over them
//! - SnapshotHeader: per-snapshot metadata
//! - ParticleRange: paged windows over one particle type
//! - Cosmology: Hubble rate and baryon fraction
//! - Error: core error type

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cosmology;
pub mod error;
pub mod header;
pub mod range;
pub mod types;

pub use cosmology::{hubble_rate, omega_baryon, SnapshotScalars};
pub use error::{CoreError, Result};
pub use header::SnapshotHeader;
pub use range::ParticleRange;
pub use types::{ParticleType, TypeMask, N_TYPES};
