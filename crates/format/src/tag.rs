//! Four-character block tags
//!
//! Gadget names every block with a fixed four-byte tag, padded with spaces
//! (`"POS "`, `"U   "`). Tags compare and hash by their raw bytes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Fixed-size block name
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockTag([u8; 4]);

impl BlockTag {
    /// Header block
    pub const HEAD: BlockTag = BlockTag(*b"HEAD");
    /// Positions (3 components)
    pub const POS: BlockTag = BlockTag(*b"POS ");
    /// Velocities (3 components)
    pub const VEL: BlockTag = BlockTag(*b"VEL ");
    /// Particle IDs
    pub const ID: BlockTag = BlockTag(*b"ID  ");
    /// Per-particle masses for types without a header mass
    pub const MASS: BlockTag = BlockTag(*b"MASS");
    /// Internal energy per unit mass
    pub const U: BlockTag = BlockTag(*b"U   ");
    /// Density
    pub const RHO: BlockTag = BlockTag(*b"RHO ");
    /// Free electron fraction, combined
    pub const NE: BlockTag = BlockTag(*b"NE  ");
    /// Ionised hydrogen fraction
    pub const NHP: BlockTag = BlockTag(*b"NHP ");
    /// Singly ionised helium fraction
    pub const NHEP: BlockTag = BlockTag(*b"NHEP");
    /// Doubly ionised helium fraction
    pub const NHEQ: BlockTag = BlockTag(*b"NHEQ");
    /// Neutral hydrogen fraction
    pub const NH: BlockTag = BlockTag(*b"NH  ");
    /// Neutral helium fraction
    pub const NHE: BlockTag = BlockTag(*b"NHE ");
    /// Smoothing length
    pub const HSML: BlockTag = BlockTag(*b"HSML");
    /// Star formation rate
    pub const SFR: BlockTag = BlockTag(*b"SFR ");

    /// Block order of unnamed (SnapFormat 1) snapshots written by the
    /// cooling-enabled Gadget-2 builds
    pub const DEFAULT_ORDER: [BlockTag; 14] = [
        BlockTag::HEAD,
        BlockTag::POS,
        BlockTag::VEL,
        BlockTag::ID,
        BlockTag::MASS,
        BlockTag::U,
        BlockTag::RHO,
        BlockTag::NHP,
        BlockTag::NHEP,
        BlockTag::NHEQ,
        BlockTag::NH,
        BlockTag::NHE,
        BlockTag::HSML,
        BlockTag::SFR,
    ];

    /// Tag from raw bytes
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        BlockTag(bytes)
    }

    /// Tag from a name of at most four ASCII characters, space padded
    pub fn new(name: &str) -> Option<Self> {
        let raw = name.as_bytes();
        if raw.is_empty() || raw.len() > 4 || !raw.is_ascii() {
            return None;
        }
        let mut bytes = [b' '; 4];
        bytes[..raw.len()].copy_from_slice(raw);
        Some(BlockTag(bytes))
    }

    /// Raw tag bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Tag with trailing padding removed
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.0).trim_end().to_string()
    }

    /// Whether the block holds values for gas particles only
    pub fn is_gas_only(&self) -> bool {
        matches!(
            *self,
            BlockTag::U
                | BlockTag::RHO
                | BlockTag::NE
                | BlockTag::NH
                | BlockTag::HSML
                | BlockTag::NHP
                | BlockTag::NHEP
                | BlockTag::NHEQ
                | BlockTag::NHE
                | BlockTag::SFR
        )
    }

    /// Whether the block is written only by runs with cooling enabled
    pub fn needs_cooling(&self) -> bool {
        matches!(
            *self,
            BlockTag::NE
                | BlockTag::NH
                | BlockTag::NHP
                | BlockTag::NHEP
                | BlockTag::NHEQ
                | BlockTag::NHE
        )
    }

    /// Values per particle: 3 for vector blocks, 1 otherwise
    pub fn components(&self) -> usize {
        match *self {
            BlockTag::POS | BlockTag::VEL => 3,
            _ => 1,
        }
    }
}

impl fmt::Debug for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockTag({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}

impl Serialize for BlockTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(&self.0))
    }
}

impl<'de> Deserialize<'de> for BlockTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        BlockTag::new(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid block tag: {:?}", name)))
    }
}
