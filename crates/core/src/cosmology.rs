//! Cosmological scalars derived from a snapshot
//!
//! Velocities in km/s and lengths in kpc/h give the Hubble rate in
//! km/s/Mpc, which is why the `100 h` prefactor appears.

use crate::header::SnapshotHeader;
use serde::{Deserialize, Serialize};

/// Hubble rate at expansion factor `a` for a flat matter + Lambda universe
///
/// `H(a) = 100 h sqrt(1 + Ω0 (1/a - 1) + ΩΛ (a² - 1)) / a`
pub fn hubble_rate(a: f64, hubble_param: f64, omega0: f64, omega_lambda: f64) -> f64 {
    100.0 * hubble_param * (1.0 + omega0 * (1.0 / a - 1.0) + omega_lambda * (a * a - 1.0)).sqrt()
        / a
}

/// Baryon density parameter from the gas particle mass
///
/// `Ωb = m_gas / (m_gas + m_dm) Ω0`. Returns `None` when the reference
/// dark matter mass is zero, since the ratio then no longer measures the
/// baryon fraction.
pub fn omega_baryon(gas_mass: f64, reference_mass: f64, omega0: f64) -> Option<f64> {
    if reference_mass == 0.0 {
        return None;
    }
    Some(gas_mass / (gas_mass + reference_mass) * omega0)
}

/// Scalar outputs of a snapshot load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotScalars {
    /// Expansion factor `a`
    pub expansion_factor: f64,
    /// Redshift `z`
    pub redshift: f64,
    /// Hubble rate at the snapshot epoch
    pub hubble_rate: f64,
    /// Comoving box side length
    pub box_size: f64,
    /// Dimensionless Hubble parameter `h`
    pub hubble_param: f64,
    /// Baryon density parameter, once the mass block has been read
    pub omega_baryon: Option<f64>,
}

impl SnapshotScalars {
    /// Scalars available from the header alone
    pub fn from_header(header: &SnapshotHeader) -> Self {
        SnapshotScalars {
            expansion_factor: header.expansion_factor,
            redshift: header.redshift,
            hubble_rate: hubble_rate(
                header.expansion_factor,
                header.hubble_param,
                header.omega0,
                header.omega_lambda,
            ),
            box_size: header.box_size,
            hubble_param: header.hubble_param,
            omega_baryon: None,
        }
    }
}
