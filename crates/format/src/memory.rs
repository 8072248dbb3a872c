//! In-memory block container
//!
//! Holds whole blocks as `f32` vectors laid out type-major. Useful when the
//! block data is already in memory, and as a test double for the loader.

use crate::container::{components_for, BlockContainer, ContainerError};
use crate::layout::{block_members, BlockLayout};
use crate::tag::BlockTag;
use fakespec_core::{SnapshotHeader, TypeMask};
use std::collections::HashMap;

/// Snapshot held entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryContainer {
    header: SnapshotHeader,
    blocks: HashMap<BlockTag, Vec<f32>>,
    reads: Vec<BlockTag>,
}

impl MemoryContainer {
    /// Empty container with the given header
    pub fn new(header: SnapshotHeader) -> Self {
        MemoryContainer {
            header,
            blocks: HashMap::new(),
            reads: Vec::new(),
        }
    }

    /// Add a block, replacing any block with the same tag
    pub fn with_block(mut self, tag: BlockTag, data: Vec<f32>) -> Self {
        self.insert_block(tag, data);
        self
    }

    /// Add a block, replacing any block with the same tag
    pub fn insert_block(&mut self, tag: BlockTag, data: Vec<f32>) {
        self.blocks.insert(tag, data);
    }

    /// Remove a block
    pub fn remove_block(&mut self, tag: BlockTag) -> Option<Vec<f32>> {
        self.blocks.remove(&tag)
    }

    /// Tags read so far, in call order
    pub fn reads(&self) -> &[BlockTag] {
        &self.reads
    }
}

impl BlockContainer for MemoryContainer {
    fn header(&self) -> &SnapshotHeader {
        &self.header
    }

    fn has_block(&self, tag: BlockTag) -> bool {
        self.blocks.contains_key(&tag)
    }

    fn read_block(
        &mut self,
        tag: BlockTag,
        dest: &mut [f32],
        count: u64,
        start: u64,
        skip: TypeMask,
    ) -> Result<(), ContainerError> {
        let data = self
            .blocks
            .get(&tag)
            .ok_or(ContainerError::BlockNotFound { tag })?;
        self.reads.push(tag);

        let components = components_for(tag, dest, count)?;
        if count == 0 {
            return Ok(());
        }

        let layout = BlockLayout::new(
            block_members(tag, &self.header),
            &[self.header.particle_count_by_type],
        );
        let particles = layout.total_particles();
        if data.len() as u64 != particles * components as u64 {
            return Err(ContainerError::BlockSizeMismatch {
                tag,
                bytes: data.len() as u64 * 4,
                particles,
                components,
            });
        }

        for span in layout.plan(tag, skip, start, count)? {
            let src = span.offset as usize * components;
            let dst = span.dest_offset as usize * components;
            let n = span.len as usize * components;
            dest[dst..dst + n].copy_from_slice(&data[src..src + n]);
        }
        Ok(())
    }
}
