//! Loader configuration
//!
//! Selects the particle type to load and the snapshot flavour: which
//! ionisation blocks hold the electron fraction, whether a helium fraction
//! is tracked, and the block order of unnamed files.

use fakespec_core::ParticleType;
use fakespec_format::{BlockTag, GadgetOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Whether a neutral helium fraction field is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeliumTracking {
    /// Load `NHE ` into the helium field
    On,
    /// No helium field
    #[default]
    Off,
}

impl HeliumTracking {
    /// Whether tracking is on
    pub fn is_on(self) -> bool {
        self == HeliumTracking::On
    }
}

/// How the snapshot stores the free electron fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatVersion {
    /// Separate `NHP `, `NHEP` and `NHEQ` blocks, combined on load
    #[default]
    Legacy,
    /// A single `NE  ` block
    CombinedElectronFraction,
}

/// Loader configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Particle type to load
    pub particle_type: ParticleType,
    /// Helium fraction tracking
    pub helium: HeliumTracking,
    /// Electron fraction layout
    pub format_version: FormatVersion,
    /// Block names for unnamed (SnapFormat 1) files, starting with `HEAD`
    pub block_order: Vec<BlockTag>,
    /// Log a header and particle summary when loading from index 0
    pub diagnostics: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            particle_type: ParticleType::Gas,
            helium: HeliumTracking::Off,
            format_version: FormatVersion::Legacy,
            block_order: BlockTag::DEFAULT_ORDER.to_vec(),
            diagnostics: true,
        }
    }
}

impl LoaderConfig {
    /// Config for snapshots with separate ionisation blocks (default)
    pub fn legacy() -> Self {
        LoaderConfig::default()
    }

    /// Config for snapshots with a combined `NE  ` block
    ///
    /// The unnamed block order swaps the three ionisation blocks for `NE  `.
    pub fn combined_electron_fraction() -> Self {
        LoaderConfig {
            format_version: FormatVersion::CombinedElectronFraction,
            block_order: vec![
                BlockTag::HEAD,
                BlockTag::POS,
                BlockTag::VEL,
                BlockTag::ID,
                BlockTag::MASS,
                BlockTag::U,
                BlockTag::RHO,
                BlockTag::NE,
                BlockTag::NH,
                BlockTag::HSML,
                BlockTag::SFR,
            ],
            ..LoaderConfig::default()
        }
    }

    /// Set the particle type
    pub fn with_particle_type(mut self, particle_type: ParticleType) -> Self {
        self.particle_type = particle_type;
        self
    }

    /// Set helium tracking
    pub fn with_helium(mut self, helium: HeliumTracking) -> Self {
        self.helium = helium;
        self
    }

    /// Set the electron fraction layout
    pub fn with_format_version(mut self, format_version: FormatVersion) -> Self {
        self.format_version = format_version;
        self
    }

    /// Set the unnamed block order
    pub fn with_block_order(mut self, block_order: Vec<BlockTag>) -> Self {
        self.block_order = block_order;
        self
    }

    /// Enable or disable the index-0 summary
    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Options for opening snapshot files under this config
    pub fn gadget_options(&self) -> GadgetOptions {
        GadgetOptions::default().with_block_order(self.block_order.clone())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_order.first() != Some(&BlockTag::HEAD) {
            return Err(ConfigError::BlockOrderWithoutHeader);
        }
        let mut seen = HashSet::new();
        for tag in &self.block_order {
            if !seen.insert(*tag) {
                return Err(ConfigError::DuplicateBlock { tag: *tag });
            }
        }
        if self.helium.is_on() && !self.particle_type.is_gas() {
            return Err(ConfigError::HeliumWithoutGas {
                particle_type: self.particle_type,
            });
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Block order must name the header first
    #[error("Block order must start with HEAD")]
    BlockOrderWithoutHeader,

    /// A block appears twice in the block order
    #[error("Block {tag} appears more than once in the block order")]
    DuplicateBlock {
        /// Repeated tag
        tag: BlockTag,
    },

    /// Helium is a gas field
    #[error("Helium tracking requires the gas particle type, not {particle_type}")]
    HeliumWithoutGas {
        /// Configured type
        particle_type: ParticleType,
    },
}
