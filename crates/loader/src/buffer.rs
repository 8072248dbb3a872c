//! Columnar particle buffer
//!
//! Every field is a separate array indexed by particle; index `i` of every
//! array is the same particle. Vector fields hold three values per particle.
//!
//! The buffer is acquired as a unit: if any field cannot be reserved, the
//! fields already reserved are freed before the error is returned. Release
//! consumes the buffer, so a buffer cannot be released twice.

use crate::config::HeliumTracking;
use std::collections::TryReserveError;

/// Owned particle fields for one loaded window
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBuffer {
    count: usize,
    pub(crate) velocity: Vec<f32>,
    pub(crate) position: Vec<f32>,
    pub(crate) mass: Vec<f32>,
    pub(crate) internal_energy: Vec<f32>,
    pub(crate) neutral_hydrogen: Vec<f32>,
    pub(crate) electron_fraction: Vec<f32>,
    pub(crate) helium: Option<Vec<f32>>,
    pub(crate) smoothing_length: Vec<f32>,
}

impl ParticleBuffer {
    /// Allocate every field for `count` particles
    ///
    /// Fields are zero-filled. The helium field exists only when tracking
    /// is on.
    pub fn allocate(count: u64, helium: HeliumTracking) -> Result<Self, AllocationError> {
        Self::allocate_with(count, helium, reserve_field)
    }

    /// Allocate with `reserve` producing each zero-filled field
    fn allocate_with<F>(count: u64, helium: HeliumTracking, mut reserve: F) -> Result<Self, AllocationError>
    where
        F: FnMut(&'static str, usize) -> Result<Vec<f32>, AllocationError>,
    {
        let scalar = usize::try_from(count).map_err(|_| AllocationError::TooLarge { count })?;
        let vector = scalar
            .checked_mul(3)
            .ok_or(AllocationError::TooLarge { count })?;

        // Each `?` drops the fields reserved before it
        let velocity = reserve("velocity", vector)?;
        let position = reserve("position", vector)?;
        let mass = reserve("mass", scalar)?;
        let internal_energy = reserve("internal_energy", scalar)?;
        let neutral_hydrogen = reserve("neutral_hydrogen", scalar)?;
        let electron_fraction = reserve("electron_fraction", scalar)?;
        let helium = match helium {
            HeliumTracking::On => Some(reserve("helium", scalar)?),
            HeliumTracking::Off => None,
        };
        let smoothing_length = reserve("smoothing_length", scalar)?;

        Ok(ParticleBuffer {
            count: scalar,
            velocity,
            position,
            mass,
            internal_energy,
            neutral_hydrogen,
            electron_fraction,
            helium,
            smoothing_length,
        })
    }

    /// Free every field
    ///
    /// Returns the number of bytes handed back to the allocator.
    pub fn release(self) -> usize {
        let bytes = self.heap_bytes();
        drop(self);
        bytes
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the buffer holds no particles
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether the helium field is allocated
    pub fn has_helium(&self) -> bool {
        self.helium.is_some()
    }

    /// Heap bytes held by all fields
    pub fn heap_bytes(&self) -> usize {
        let fields = [
            &self.velocity,
            &self.position,
            &self.mass,
            &self.internal_energy,
            &self.neutral_hydrogen,
            &self.electron_fraction,
            &self.smoothing_length,
        ];
        let helium = self.helium.as_ref().map_or(0, Vec::capacity);
        (fields.iter().map(|f| f.capacity()).sum::<usize>() + helium) * std::mem::size_of::<f32>()
    }

    /// Positions, three values per particle
    pub fn positions(&self) -> &[f32] {
        &self.position
    }

    /// Velocities, three values per particle
    pub fn velocities(&self) -> &[f32] {
        &self.velocity
    }

    /// Masses
    pub fn masses(&self) -> &[f32] {
        &self.mass
    }

    /// Internal energy per unit mass (gas only)
    pub fn internal_energy(&self) -> &[f32] {
        &self.internal_energy
    }

    /// Free electron fraction relative to hydrogen (gas only)
    pub fn electron_fraction(&self) -> &[f32] {
        &self.electron_fraction
    }

    /// Neutral hydrogen fraction (gas only)
    pub fn neutral_hydrogen(&self) -> &[f32] {
        &self.neutral_hydrogen
    }

    /// Neutral helium fraction, when tracked
    pub fn helium(&self) -> Option<&[f32]> {
        self.helium.as_deref()
    }

    /// SPH smoothing length (gas only)
    pub fn smoothing_length(&self) -> &[f32] {
        &self.smoothing_length
    }

    /// Position of particle `i`
    pub fn position(&self, i: usize) -> [f32; 3] {
        [
            self.position[3 * i],
            self.position[3 * i + 1],
            self.position[3 * i + 2],
        ]
    }

    /// Velocity of particle `i`
    pub fn velocity(&self, i: usize) -> [f32; 3] {
        [
            self.velocity[3 * i],
            self.velocity[3 * i + 1],
            self.velocity[3 * i + 2],
        ]
    }
}

fn reserve_field(field: &'static str, len: usize) -> Result<Vec<f32>, AllocationError> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|source| AllocationError::Reserve { field, len, source })?;
    values.resize(len, 0.0);
    Ok(values)
}

/// Errors raised while allocating a particle buffer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    /// Particle count does not fit in the address space
    #[error("Cannot address {count} particles")]
    TooLarge {
        /// Requested particle count
        count: u64,
    },

    /// The allocator refused a field
    #[error("Failed to reserve {len} values for field {field}: {source}")]
    Reserve {
        /// Field being reserved
        field: &'static str,
        /// Values requested
        len: usize,
        /// Allocator error
        #[source]
        source: TryReserveError,
    },
}
