//! Snapshot header
//!
//! One header describes a whole snapshot. For multi-file snapshots the
//! per-type counts are the sums over every file; the scalar parameters come
//! from the first file.

use crate::types::{ParticleType, TypeMask, N_TYPES};
use serde::{Deserialize, Serialize};

/// Header metadata of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    /// Number of particles of each type stored on disk
    pub particle_count_by_type: [u64; N_TYPES],
    /// Uniform mass per type; zero means masses are stored per particle
    pub mass_by_type: [f64; N_TYPES],
    /// Expansion factor `a` at the snapshot epoch
    pub expansion_factor: f64,
    /// Redshift `z = 1/a - 1`
    pub redshift: f64,
    /// Comoving box side length
    pub box_size: f64,
    /// Dimensionless Hubble parameter `h`
    pub hubble_param: f64,
    /// Total matter density parameter
    pub omega0: f64,
    /// Dark energy density parameter
    pub omega_lambda: f64,
    /// Radiative cooling was enabled (ionisation blocks present for gas)
    pub cooling_flag: bool,
    /// Total particles of each type over the whole simulation, as recorded
    pub total_count_by_type: [u64; N_TYPES],
    /// Number of files the snapshot is split over
    pub num_files: u32,
    /// Star formation was enabled
    pub sfr_flag: bool,
    /// Feedback was enabled
    pub feedback_flag: bool,
    /// Stellar ages are stored
    pub stellar_age_flag: bool,
    /// Metallicities are stored
    pub metals_flag: bool,
    /// The `U` block holds entropy instead of internal energy
    pub entropy_instead_of_u_flag: bool,
}

impl SnapshotHeader {
    /// Number of particles of type `t`
    pub fn particle_count(&self, t: ParticleType) -> u64 {
        self.particle_count_by_type[t.index()]
    }

    /// Header mass of type `t` (zero when stored per particle)
    pub fn mass(&self, t: ParticleType) -> f64 {
        self.mass_by_type[t.index()]
    }

    /// Whether every particle of type `t` shares the header mass
    pub fn has_uniform_mass(&self, t: ParticleType) -> bool {
        self.mass(t) != 0.0
    }

    /// Types whose header mass is non-zero
    ///
    /// These types contribute no entries to the MASS block.
    pub fn uniform_mass_types(&self) -> TypeMask {
        ParticleType::ALL
            .iter()
            .filter(|t| self.has_uniform_mass(**t))
            .fold(TypeMask::NONE, |mask, t| mask.with(*t))
    }

    /// Types with at least one particle
    pub fn populated_types(&self) -> TypeMask {
        ParticleType::ALL
            .iter()
            .filter(|t| self.particle_count(**t) > 0)
            .fold(TypeMask::NONE, |mask, t| mask.with(*t))
    }

    /// Total number of particles over all types
    pub fn total_particles(&self) -> u64 {
        self.particle_count_by_type.iter().sum()
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        SnapshotHeader {
            particle_count_by_type: [0; N_TYPES],
            mass_by_type: [0.0; N_TYPES],
            expansion_factor: 1.0,
            redshift: 0.0,
            box_size: 0.0,
            hubble_param: 1.0,
            omega0: 1.0,
            omega_lambda: 0.0,
            cooling_flag: false,
            total_count_by_type: [0; N_TYPES],
            num_files: 1,
            sfr_flag: false,
            feedback_flag: false,
            stellar_age_flag: false,
            metals_flag: false,
            entropy_instead_of_u_flag: false,
        }
    }
}
