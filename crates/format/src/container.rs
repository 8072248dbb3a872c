//! Block container abstraction
//!
//! A block container exposes a snapshot as a header plus a set of tagged
//! blocks. Each block holds one field for some subset of particle types,
//! laid out type-major: every particle of the lowest type slot first, then
//! the next slot, and so on (per file, for multi-file snapshots).

use crate::tag::BlockTag;
use fakespec_core::{ParticleType, SnapshotHeader, TypeMask};
use std::path::PathBuf;

/// Read access to a tagged, type-multiplexed snapshot
pub trait BlockContainer {
    /// Snapshot header
    fn header(&self) -> &SnapshotHeader;

    /// Number of particles of type `t`
    fn particle_count(&self, t: ParticleType) -> u64 {
        self.header().particle_count(t)
    }

    /// Whether a block with this tag exists
    fn has_block(&self, tag: BlockTag) -> bool;

    /// Copy `count` particles of a block into `dest`
    ///
    /// Types set in `skip` are stepped over. The particles of the remaining
    /// types form one stream; particles `start..start + count` of that
    /// stream are copied. `dest.len()` must be `count` times the number of
    /// values per particle.
    fn read_block(
        &mut self,
        tag: BlockTag,
        dest: &mut [f32],
        count: u64,
        start: u64,
        skip: TypeMask,
    ) -> Result<(), ContainerError>;
}

/// Errors raised by block containers
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with a recognised record marker
    #[error("Unrecognised snapshot format in {path:?}: first record marker {marker:#010x}")]
    UnrecognizedFormat {
        /// File that failed detection
        path: PathBuf,
        /// First four bytes, read little-endian
        marker: u32,
    },

    /// Leading and trailing record markers disagree, or a record overruns the file
    #[error("Corrupt record at offset {offset}: leading marker {leading}, trailing marker {trailing}")]
    RecordMismatch {
        /// Byte offset of the leading marker
        offset: u64,
        /// Leading length marker
        leading: u32,
        /// Trailing length marker (0 if the record is truncated)
        trailing: u32,
    },

    /// Header block missing or malformed
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Requested block does not exist
    #[error("Block {tag} not found")]
    BlockNotFound {
        /// Missing tag
        tag: BlockTag,
    },

    /// Block payload length does not divide into particles
    #[error("Block {tag} holds {bytes} bytes, not a whole number of values for {particles} particles x {components} components")]
    BlockSizeMismatch {
        /// Block tag
        tag: BlockTag,
        /// Payload length in bytes
        bytes: u64,
        /// Particles expected in the block
        particles: u64,
        /// Values per particle requested
        components: usize,
    },

    /// Requested window extends past the selected particles
    #[error("Range {start}..{end} of block {tag} exceeds the {available} selected particles")]
    RangeOutOfBounds {
        /// Block tag
        tag: BlockTag,
        /// First requested particle
        start: u64,
        /// One past the last requested particle
        end: u64,
        /// Particles in the selected types
        available: u64,
    },

    /// Destination slice length is not a multiple of the particle count
    #[error("Destination holds {len} values, not a whole multiple of {count} particles")]
    DestinationLength {
        /// Destination length
        len: usize,
        /// Requested particle count
        count: u64,
    },

    /// Destination size implies a different number of values per particle
    /// than the block stores
    #[error("Block {tag} holds {expected} values per particle, destination implies {found}")]
    ComponentMismatch {
        /// Block tag
        tag: BlockTag,
        /// Values per particle of the block
        expected: usize,
        /// Values per particle implied by the destination
        found: usize,
    },

    /// A single file of a multi-file snapshot was opened
    #[error("{path:?} is one of {num_files} snapshot files; open the set through its first file or base name")]
    IncompleteSnapshot {
        /// Path that was opened
        path: PathBuf,
        /// Files recorded in its header
        num_files: u32,
    },

    /// A file of a multi-file snapshot is missing
    #[error("Snapshot file {path:?} is missing")]
    MissingFile {
        /// Expected path
        path: PathBuf,
    },
}

impl ContainerError {
    /// Whether this error reports an absent block
    pub fn is_block_not_found(&self) -> bool {
        matches!(self, ContainerError::BlockNotFound { .. })
    }
}

/// Values per particle implied by a destination buffer
///
/// For a non-empty read the result must match the values per particle of
/// `tag`.
pub(crate) fn components_for(
    tag: BlockTag,
    dest: &[f32],
    count: u64,
) -> Result<usize, ContainerError> {
    let len = dest.len();
    if count == 0 {
        return if len == 0 {
            Ok(0)
        } else {
            Err(ContainerError::DestinationLength { len, count })
        };
    }
    let count_usize = usize::try_from(count)
        .map_err(|_| ContainerError::DestinationLength { len, count })?;
    if len == 0 || len % count_usize != 0 {
        return Err(ContainerError::DestinationLength { len, count });
    }
    let found = len / count_usize;
    let expected = tag.components();
    if found != expected {
        return Err(ContainerError::ComponentMismatch {
            tag,
            expected,
            found,
        });
    }
    Ok(found)
}
