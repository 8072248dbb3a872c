//! Particle type slots and type masks
//!
//! Gadget snapshots store six particle species in parallel slots throughout
//! the header and every block. `ParticleType` names a slot; `TypeMask` is a
//! bit set over slots, used as the skip mask for type-filtered block reads.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of particle type slots in a snapshot
pub const N_TYPES: usize = 6;

/// Particle species stored in one of the six type slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleType {
    /// SPH gas (slot 0); the only type with gas-physics blocks
    Gas,
    /// Dark matter (slot 1)
    DarkMatter,
    /// Disk (slot 2)
    Disk,
    /// Bulge (slot 3)
    Bulge,
    /// Stars (slot 4)
    Stars,
    /// Black holes (slot 5)
    BlackHoles,
}

impl ParticleType {
    /// All types in slot order
    pub const ALL: [ParticleType; N_TYPES] = [
        ParticleType::Gas,
        ParticleType::DarkMatter,
        ParticleType::Disk,
        ParticleType::Bulge,
        ParticleType::Stars,
        ParticleType::BlackHoles,
    ];

    /// Slot index of this type in header arrays and block layouts
    pub fn index(self) -> usize {
        match self {
            ParticleType::Gas => 0,
            ParticleType::DarkMatter => 1,
            ParticleType::Disk => 2,
            ParticleType::Bulge => 3,
            ParticleType::Stars => 4,
            ParticleType::BlackHoles => 5,
        }
    }

    /// Type stored at `index`
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(CoreError::InvalidParticleType(index))
    }

    /// Whether this type carries the gas-physics fields
    pub fn is_gas(self) -> bool {
        self == ParticleType::Gas
    }

    /// Lower-case name used in configuration and logs
    pub fn name(self) -> &'static str {
        match self {
            ParticleType::Gas => "gas",
            ParticleType::DarkMatter => "dark_matter",
            ParticleType::Disk => "disk",
            ParticleType::Bulge => "bulge",
            ParticleType::Stars => "stars",
            ParticleType::BlackHoles => "black_holes",
        }
    }
}

impl fmt::Display for ParticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParticleType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| CoreError::UnknownParticleTypeName(s.to_string()))
    }
}

/// Bit set over the six particle type slots
///
/// Bit `i` refers to slot `i`. As a skip mask, a set bit tells the container
/// to step over that type's particles instead of copying them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TypeMask(u8);

impl TypeMask {
    /// Mask with every slot set
    pub const ALL: TypeMask = TypeMask((1 << N_TYPES) - 1);

    /// Mask with no slot set
    pub const NONE: TypeMask = TypeMask(0);

    /// Build a mask from raw bits, discarding bits above slot 5
    pub fn from_bits(bits: u8) -> Self {
        TypeMask(bits & Self::ALL.0)
    }

    /// Raw bits
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Skip mask that keeps only `target`
    pub fn all_except(target: ParticleType) -> Self {
        Self::ALL.without(target)
    }

    /// Mask containing only `t`
    pub fn only(t: ParticleType) -> Self {
        TypeMask(1 << t.index())
    }

    /// Copy of this mask with `t` cleared
    pub fn without(self, t: ParticleType) -> Self {
        TypeMask(self.0 & !(1 << t.index()))
    }

    /// Copy of this mask with `t` set
    pub fn with(self, t: ParticleType) -> Self {
        TypeMask(self.0 | (1 << t.index()))
    }

    /// Whether `t` is set
    pub fn contains(self, t: ParticleType) -> bool {
        self.0 & (1 << t.index()) != 0
    }

    /// Whether no slot is set
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the set types in slot order
    pub fn iter(self) -> impl Iterator<Item = ParticleType> {
        ParticleType::ALL.into_iter().filter(move |t| self.contains(*t))
    }
}

impl fmt::Debug for TypeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeMask({:#08b})", self.0)
    }
}
