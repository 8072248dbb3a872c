//! Snapshot fixtures for tests
//!
//! Writes small Gadget files so readers and loaders can be exercised
//! end to end. This is test infrastructure, not a general snapshot writer:
//! block data is supplied whole and type-major, exactly as a reader returns
//! it with no types skipped.

use crate::gadget::header::GadgetHeader;
use crate::gadget::record::{write_record, write_tag_record, SnapFormat};
use crate::gadget::{numbered, Endian};
use crate::layout::block_members;
use crate::tag::BlockTag;
use fakespec_core::{SnapshotHeader, N_TYPES};
use std::fs::File;
use std::io::{BufWriter, Error, ErrorKind, Result, Write};
use std::path::{Path, PathBuf};

/// Float width of written blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// 4-byte floats
    Single,
    /// 8-byte floats
    Double,
}

/// Builder for fixture snapshot files
#[derive(Debug, Clone)]
pub struct SnapshotFileBuilder {
    header: SnapshotHeader,
    blocks: Vec<(BlockTag, Vec<f32>)>,
    format: SnapFormat,
    endian: Endian,
    precision: Precision,
    files: usize,
}

impl SnapshotFileBuilder {
    /// Start a tagged, little-endian, single-precision, one-file snapshot
    pub fn new(header: SnapshotHeader) -> Self {
        SnapshotFileBuilder {
            header,
            blocks: Vec::new(),
            format: SnapFormat::Tagged,
            endian: Endian::Little,
            precision: Precision::Single,
            files: 1,
        }
    }

    /// Append a block; blocks are written in the order they are added
    pub fn block(mut self, tag: BlockTag, data: Vec<f32>) -> Self {
        self.blocks.push((tag, data));
        self
    }

    /// Write SnapFormat 1 (no tag records)
    pub fn unnamed(mut self) -> Self {
        self.format = SnapFormat::Unnamed;
        self
    }

    /// Set the byte order
    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Set the float width
    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Split the particles of every type over `files` files
    pub fn files(mut self, files: usize) -> Self {
        self.files = files.max(1);
        self
    }

    /// Write the snapshot and return the paths of the files written
    ///
    /// A single file is written at `path`; several files at `path.0`,
    /// `path.1`, ...
    pub fn write(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let counts = self.header.particle_count_by_type;
        let mut header = self.header.clone();
        header.total_count_by_type = counts;
        header.num_files = self.files as u32;

        let shares = split_counts(counts, self.files);
        let mut written = Vec::with_capacity(self.files);

        for (index, share) in shares.iter().enumerate() {
            let file_path = if self.files == 1 {
                path.to_path_buf()
            } else {
                numbered(path, index)
            };
            let mut out = BufWriter::new(File::create(&file_path)?);

            let head = GadgetHeader::for_file(&header, share.counts).to_bytes(self.endian);
            self.write_block(&mut out, BlockTag::HEAD, &head)?;

            for (tag, data) in &self.blocks {
                if let Some(payload) = self.file_payload(&header, share, *tag, data)? {
                    self.write_block(&mut out, *tag, &payload)?;
                }
            }

            out.flush()?;
            written.push(file_path);
        }

        Ok(written)
    }

    fn write_block<W: Write>(&self, out: &mut W, tag: BlockTag, payload: &[u8]) -> Result<()> {
        if self.format == SnapFormat::Tagged {
            write_tag_record(out, self.endian, tag, payload.len())?;
        }
        write_record(out, self.endian, payload)
    }

    /// Encoded slice of one block belonging to one file, or `None` if the
    /// file holds no particles of that block
    fn file_payload(
        &self,
        header: &SnapshotHeader,
        share: &FileShare,
        tag: BlockTag,
        data: &[f32],
    ) -> Result<Option<Vec<u8>>> {
        let members = block_members(tag, header);
        let total: u64 = members.iter().map(|t| header.particle_count(t)).sum();
        if total == 0 || data.len() as u64 % total != 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "block {} has {} values for {} particles",
                    tag,
                    data.len(),
                    total
                ),
            ));
        }
        let components = (data.len() as u64 / total) as usize;

        let mut values = Vec::new();
        let mut type_offset = 0u64;
        for t in members.iter() {
            let i = t.index();
            let first = (type_offset + share.first[i]) as usize * components;
            let len = share.counts[i] as usize * components;
            values.extend_from_slice(&data[first..first + len]);
            type_offset += header.particle_count_by_type[i];
        }
        if values.is_empty() {
            return Ok(None);
        }

        let payload = match self.precision {
            Precision::Single => {
                let mut raw = vec![0u8; values.len() * 4];
                self.endian.write_f32_into(&values, &mut raw);
                raw
            }
            Precision::Double => {
                let wide: Vec<f64> = values.iter().map(|v| f64::from(*v)).collect();
                let mut raw = vec![0u8; wide.len() * 8];
                self.endian.write_f64_into(&wide, &mut raw);
                raw
            }
        };
        Ok(Some(payload))
    }
}

/// Particles of each type held by one file
#[derive(Debug, Clone, Copy)]
struct FileShare {
    /// Index of the file's first particle within each type
    first: [u64; N_TYPES],
    /// Particles of each type in the file
    counts: [u64; N_TYPES],
}

/// Split each type's particles into contiguous runs, earlier files first
fn split_counts(counts: [u64; N_TYPES], files: usize) -> Vec<FileShare> {
    let files_u64 = files as u64;
    let mut next = [0u64; N_TYPES];
    (0..files_u64)
        .map(|index| {
            let mut share = FileShare {
                first: [0; N_TYPES],
                counts: [0; N_TYPES],
            };
            for t in 0..N_TYPES {
                let n = counts[t] / files_u64 + u64::from(index < counts[t] % files_u64);
                share.first[t] = next[t];
                share.counts[t] = n;
                next[t] += n;
            }
            share
        })
        .collect()
}
