//! Load summaries
//!
//! Emitted through `tracing` when a load starts at particle 0, so the first
//! page of a paged read reports the snapshot once.

use crate::buffer::ParticleBuffer;
use fakespec_core::{ParticleType, SnapshotHeader, SnapshotScalars};

/// Log the header summary
pub fn log_header(header: &SnapshotHeader, scalars: &SnapshotScalars) {
    tracing::info!(
        npart = ?header.particle_count_by_type,
        masses = ?header.mass_by_type,
        redshift = scalars.redshift,
        omega_m = header.omega0,
        omega_lambda = header.omega_lambda,
        "Snapshot header"
    );
    tracing::info!(
        expansion_factor = scalars.expansion_factor,
        hubble_param = scalars.hubble_param,
        box_size = scalars.box_size,
        hubble_rate = scalars.hubble_rate,
        "Snapshot cosmology"
    );
}

/// Log the first particle and, for gas, the last particle's gas fields
pub fn log_particles(buffer: &ParticleBuffer, scalars: &SnapshotScalars, particle_type: ParticleType) {
    if buffer.is_empty() {
        return;
    }
    tracing::info!(
        pos = ?buffer.position(0),
        vel = ?buffer.velocity(0),
        mass = buffer.masses()[0],
        omega_b = ?scalars.omega_baryon,
        "First particle"
    );

    if particle_type.is_gas() {
        let last = buffer.len() - 1;
        tracing::info!(
            index = last,
            u = buffer.internal_energy()[last],
            ne = buffer.electron_fraction()[last],
            nh0 = buffer.neutral_hydrogen()[last],
            h = buffer.smoothing_length()[last],
            "Last gas particle"
        );
    }
}
