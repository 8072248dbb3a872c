//! Type-multiplexed block layout
//!
//! A block is a sequence of segments, one per (file, member type), in file
//! order then slot order. A read selects the segments whose type is not
//! skipped, treats them as one stream, and copies a window of that stream.

use crate::container::ContainerError;
use crate::tag::BlockTag;
use fakespec_core::{ParticleType, SnapshotHeader, TypeMask, N_TYPES};

/// Types that have entries in `tag`
///
/// Gas-only blocks hold slot 0; MASS holds the types without a header mass;
/// every other block holds all types.
pub fn block_members(tag: BlockTag, header: &SnapshotHeader) -> TypeMask {
    if tag.is_gas_only() {
        TypeMask::only(ParticleType::Gas)
    } else if tag == BlockTag::MASS {
        let mut mask = TypeMask::ALL;
        for t in header.uniform_mass_types().iter() {
            mask = mask.without(t);
        }
        mask
    } else {
        TypeMask::ALL
    }
}

/// Contiguous run of one type's particles inside one file's block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// File index
    pub file: usize,
    /// Particle type
    pub ptype: ParticleType,
    /// Particle offset of the segment within the file's block
    pub offset: u64,
    /// Particles in the segment
    pub len: u64,
}

/// Part of a read served from one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// File index
    pub file: usize,
    /// Particle type
    pub ptype: ParticleType,
    /// Particle offset within the file's block
    pub offset: u64,
    /// Particles to copy
    pub len: u64,
    /// Particle offset in the destination
    pub dest_offset: u64,
}

/// Segment map of one block across all files
#[derive(Debug, Clone, Default)]
pub struct BlockLayout {
    segments: Vec<Segment>,
    file_particles: Vec<u64>,
}

impl BlockLayout {
    /// Build the layout from per-file particle counts
    pub fn new(members: TypeMask, per_file_counts: &[[u64; N_TYPES]]) -> Self {
        let mut segments = Vec::new();
        let mut file_particles = Vec::with_capacity(per_file_counts.len());

        for (file, counts) in per_file_counts.iter().enumerate() {
            let mut offset = 0;
            for t in members.iter() {
                let len = counts[t.index()];
                if len > 0 {
                    segments.push(Segment {
                        file,
                        ptype: t,
                        offset,
                        len,
                    });
                }
                offset += len;
            }
            file_particles.push(offset);
        }

        BlockLayout {
            segments,
            file_particles,
        }
    }

    /// Particles stored in the block of file `file`
    pub fn file_particles(&self, file: usize) -> u64 {
        self.file_particles.get(file).copied().unwrap_or(0)
    }

    /// Particles stored in the block over every file
    pub fn total_particles(&self) -> u64 {
        self.file_particles.iter().sum()
    }

    /// Particles left in the stream after applying `skip`
    pub fn stream_len(&self, skip: TypeMask) -> u64 {
        self.segments
            .iter()
            .filter(|s| !skip.contains(s.ptype))
            .map(|s| s.len)
            .sum()
    }

    /// Spans covering stream particles `start..start + count`
    pub fn plan(
        &self,
        tag: BlockTag,
        skip: TypeMask,
        start: u64,
        count: u64,
    ) -> Result<Vec<Span>, ContainerError> {
        let available = self.stream_len(skip);
        let end = start.checked_add(count).unwrap_or(u64::MAX);
        if end > available {
            return Err(ContainerError::RangeOutOfBounds {
                tag,
                start,
                end,
                available,
            });
        }

        let mut spans = Vec::new();
        let mut to_skip = start;
        let mut remaining = count;
        let mut dest_offset = 0;

        for segment in self.segments.iter().filter(|s| !skip.contains(s.ptype)) {
            if remaining == 0 {
                break;
            }
            if to_skip >= segment.len {
                to_skip -= segment.len;
                continue;
            }
            let len = (segment.len - to_skip).min(remaining);
            spans.push(Span {
                file: segment.file,
                ptype: segment.ptype,
                offset: segment.offset + to_skip,
                len,
                dest_offset,
            });
            dest_offset += len;
            remaining -= len;
            to_skip = 0;
        }

        Ok(spans)
    }
}
