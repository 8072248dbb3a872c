//! File-backed Gadget snapshot container
//!
//! Opening indexes every block of every file once; reads then seek
//! straight to the bytes of the requested window.

use super::endian::Endian;
use super::numbered;
use super::header::{GadgetHeader, GADGET_HEADER_SIZE};
use super::record::{self, Record, SnapFormat};
use crate::container::{components_for, BlockContainer, ContainerError};
use crate::layout::{block_members, BlockLayout};
use crate::tag::BlockTag;
use fakespec_core::{SnapshotHeader, TypeMask, N_TYPES};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Options for opening a snapshot
#[derive(Debug, Clone)]
pub struct GadgetOptions {
    /// Names assigned, in order, to the records of unnamed (SnapFormat 1)
    /// files. Must start with `HEAD`.
    pub block_order: Vec<BlockTag>,
}

impl Default for GadgetOptions {
    fn default() -> Self {
        GadgetOptions {
            block_order: BlockTag::DEFAULT_ORDER.to_vec(),
        }
    }
}

impl GadgetOptions {
    /// Set the block order for unnamed files
    pub fn with_block_order(mut self, order: Vec<BlockTag>) -> Self {
        self.block_order = order;
        self
    }
}

/// One file of a snapshot
struct SnapshotFile {
    path: PathBuf,
    reader: BufReader<File>,
    header: GadgetHeader,
    blocks: HashMap<BlockTag, Record>,
}

/// Gadget snapshot, possibly split over several files
pub struct GadgetSnapshot {
    files: Vec<SnapshotFile>,
    header: SnapshotHeader,
    format: SnapFormat,
    endian: Endian,
}

impl std::fmt::Debug for GadgetSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GadgetSnapshot")
            .field("files", &self.paths())
            .field("format", &self.format)
            .field("endian", &self.endian)
            .finish()
    }
}

impl GadgetSnapshot {
    /// Open a snapshot with default options
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ContainerError> {
        Self::open_with(path, &GadgetOptions::default())
    }

    /// Open a snapshot
    ///
    /// `path` is a single-file snapshot, the base name of a multi-file set
    /// (`path.0 .. path.{num_files - 1}`), or the first file `base.0` of
    /// such a set. Any other file whose header records more than one file
    /// is rejected, since it holds only part of the particles.
    pub fn open_with(path: impl AsRef<Path>, options: &GadgetOptions) -> Result<Self, ContainerError> {
        let path = path.as_ref();
        let (base, first_path) = if path.is_file() {
            (set_base(path), path.to_path_buf())
        } else {
            let first = numbered(path, 0);
            if !first.is_file() {
                return Err(ContainerError::MissingFile {
                    path: path.to_path_buf(),
                });
            }
            (Some(path.to_path_buf()), first)
        };

        let (first, format, endian) = SnapshotFile::open(&first_path, options)?;
        let num_files = first.header.num_files.max(1) as usize;
        let base = match base {
            Some(base) => base,
            None if num_files == 1 => path.to_path_buf(),
            None => {
                return Err(ContainerError::IncompleteSnapshot {
                    path: path.to_path_buf(),
                    num_files: first.header.num_files as u32,
                })
            }
        };

        let mut files = vec![first];
        for i in 1..num_files {
            let next_path = numbered(&base, i);
            if !next_path.is_file() {
                return Err(ContainerError::MissingFile { path: next_path });
            }
            let (file, next_format, next_endian) = SnapshotFile::open(&next_path, options)?;
            if next_format != format || next_endian != endian {
                return Err(ContainerError::InvalidHeader(format!(
                    "{:?} is {:?}/{:?}, expected {:?}/{:?}",
                    next_path, next_format, next_endian, format, endian
                )));
            }
            files.push(file);
        }

        let mut counts = [0u64; N_TYPES];
        for file in &files {
            for (sum, n) in counts.iter_mut().zip(file.header.file_counts()) {
                *sum += n;
            }
        }

        let header = files[0].header.to_snapshot_header(counts);
        if header.total_count_by_type != counts {
            tracing::warn!(
                recorded = ?header.total_count_by_type,
                summed = ?counts,
                "Header particle totals disagree with per-file counts; using per-file counts"
            );
        }

        tracing::debug!(
            files = files.len(),
            ?format,
            ?endian,
            particles = header.total_particles(),
            "Opened Gadget snapshot"
        );

        Ok(GadgetSnapshot {
            files,
            header,
            format,
            endian,
        })
    }

    /// File flavour
    pub fn format(&self) -> SnapFormat {
        self.format
    }

    /// Byte order
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Number of files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Paths of all files, in order
    pub fn paths(&self) -> Vec<&Path> {
        self.files.iter().map(|f| f.path.as_path()).collect()
    }

    /// Tags present in any file, sorted
    pub fn block_tags(&self) -> Vec<BlockTag> {
        let mut tags: Vec<_> = self
            .files
            .iter()
            .flat_map(|f| f.blocks.keys().copied())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    fn layout(&self, tag: BlockTag) -> BlockLayout {
        let per_file: Vec<[u64; N_TYPES]> =
            self.files.iter().map(|f| f.header.file_counts()).collect();
        BlockLayout::new(block_members(tag, &self.header), &per_file)
    }
}

impl BlockContainer for GadgetSnapshot {
    fn header(&self) -> &SnapshotHeader {
        &self.header
    }

    fn has_block(&self, tag: BlockTag) -> bool {
        self.files.iter().any(|f| f.blocks.contains_key(&tag))
    }

    fn read_block(
        &mut self,
        tag: BlockTag,
        dest: &mut [f32],
        count: u64,
        start: u64,
        skip: TypeMask,
    ) -> Result<(), ContainerError> {
        if !self.has_block(tag) {
            return Err(ContainerError::BlockNotFound { tag });
        }
        let components = components_for(tag, dest, count)?;
        if count == 0 {
            return Ok(());
        }

        let layout = self.layout(tag);
        let spans = layout.plan(tag, skip, start, count)?;
        tracing::debug!(
            block = %tag,
            count,
            start,
            skip = ?skip,
            spans = spans.len(),
            "Reading block"
        );

        let endian = self.endian;
        for span in spans {
            let file = &mut self.files[span.file];
            let entry = *file
                .blocks
                .get(&tag)
                .ok_or(ContainerError::BlockNotFound { tag })?;
            let particles = layout.file_particles(span.file);
            let width = element_width(tag, entry.len, particles, components)?;

            let values = span.len as usize * components;
            let byte_offset = entry.offset + span.offset * (components * width) as u64;
            file.reader.seek(SeekFrom::Start(byte_offset))?;

            let out_start = span.dest_offset as usize * components;
            let out = &mut dest[out_start..out_start + values];
            if width == 4 {
                endian.read_f32_values(&mut file.reader, out)?;
            } else {
                endian.read_f64_narrowed(&mut file.reader, out)?;
            }
        }

        Ok(())
    }
}

impl SnapshotFile {
    fn open(path: &Path, options: &GadgetOptions) -> Result<(Self, SnapFormat, Endian), ContainerError> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let mut marker = [0u8; 4];
        if file_len < 4 {
            return Err(ContainerError::UnrecognizedFormat {
                path: path.to_path_buf(),
                marker: 0,
            });
        }
        reader.read_exact(&mut marker)?;
        let (format, endian) =
            record::detect(marker).ok_or_else(|| ContainerError::UnrecognizedFormat {
                path: path.to_path_buf(),
                marker: u32::from_le_bytes(marker),
            })?;

        let records = record::scan_records(&mut reader, endian, file_len)?;
        let named = match format {
            SnapFormat::Tagged => name_tagged(&mut reader, endian, &records)?,
            SnapFormat::Unnamed => Vec::new(),
        };

        let header_record = match format {
            SnapFormat::Tagged => named
                .iter()
                .find(|(tag, _)| *tag == BlockTag::HEAD)
                .map(|(_, r)| *r),
            SnapFormat::Unnamed => records.first().copied(),
        }
        .ok_or_else(|| ContainerError::InvalidHeader(format!("{:?} has no HEAD block", path)))?;

        if header_record.len < GADGET_HEADER_SIZE as u64 {
            return Err(ContainerError::InvalidHeader(format!(
                "HEAD block of {:?} is {} bytes, expected {}",
                path, header_record.len, GADGET_HEADER_SIZE
            )));
        }
        let payload = record::read_payload(&mut reader, header_record)?;
        let header = GadgetHeader::from_bytes(&payload, endian)
            .ok_or_else(|| ContainerError::InvalidHeader(format!("{:?}: short header", path)))?;

        let named = match format {
            SnapFormat::Tagged => named,
            SnapFormat::Unnamed => name_unnamed(&records, &header, options)?,
        };

        let mut blocks = HashMap::new();
        for (tag, rec) in named {
            if blocks.insert(tag, rec).is_some() {
                tracing::warn!(block = %tag, path = ?path, "Duplicate block; keeping the last one");
            }
        }

        tracing::debug!(path = ?path, blocks = blocks.len(), "Indexed snapshot file");

        Ok((
            SnapshotFile {
                path: path.to_path_buf(),
                reader,
                header,
                blocks,
            },
            format,
            endian,
        ))
    }
}

/// Base name of a set when `path` names its first file (`base.0`)
fn set_base(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let base = name.strip_suffix(".0").filter(|b| !b.is_empty())?;
    Some(path.with_file_name(base))
}

/// Pair each data record with the tag record in front of it
fn name_tagged<R: Read + Seek>(
    reader: &mut R,
    endian: Endian,
    records: &[Record],
) -> Result<Vec<(BlockTag, Record)>, ContainerError> {
    if records.len() % 2 != 0 {
        return Err(ContainerError::InvalidHeader(
            "tagged snapshot has a tag record without a data record".to_string(),
        ));
    }
    let mut named = Vec::with_capacity(records.len() / 2);
    for pair in records.chunks_exact(2) {
        let payload = record::read_payload(reader, pair[0])?;
        let (tag, _) = record::parse_tag_record(&payload, endian).ok_or_else(|| {
            ContainerError::InvalidHeader(format!(
                "expected a tag record at offset {}, found {} bytes",
                pair[0].offset - 4,
                pair[0].len
            ))
        })?;
        named.push((tag, pair[1]));
    }
    Ok(named)
}

/// Assign names from the configured order to the records of an unnamed file
///
/// Names whose block would be empty in this file are skipped, and so are
/// the ionisation blocks of runs without cooling, since Gadget writes no
/// record for them.
fn name_unnamed(
    records: &[Record],
    header: &GadgetHeader,
    options: &GadgetOptions,
) -> Result<Vec<(BlockTag, Record)>, ContainerError> {
    if options.block_order.first() != Some(&BlockTag::HEAD) {
        return Err(ContainerError::InvalidHeader(
            "block order must start with HEAD".to_string(),
        ));
    }

    let snapshot = header.to_snapshot_header(header.file_counts());
    let populated = snapshot.populated_types();
    let mut names = options.block_order[1..].iter().filter(|tag| {
        if tag.needs_cooling() && !snapshot.cooling_flag {
            return false;
        }
        block_members(**tag, &snapshot)
            .iter()
            .any(|t| populated.contains(t))
    });

    let mut named = vec![(BlockTag::HEAD, records[0])];
    for rec in &records[1..] {
        match names.next() {
            Some(tag) => named.push((*tag, *rec)),
            None => {
                tracing::warn!(
                    offset = rec.offset,
                    len = rec.len,
                    "Unnamed record past the end of the block order; ignoring"
                );
            }
        }
    }
    Ok(named)
}

/// Bytes per value of a block: 4 for single, 8 for double precision
fn element_width(
    tag: BlockTag,
    bytes: u64,
    particles: u64,
    components: usize,
) -> Result<usize, ContainerError> {
    let values = particles * components as u64;
    let mismatch = ContainerError::BlockSizeMismatch {
        tag,
        bytes,
        particles,
        components,
    };
    if values == 0 || bytes % values != 0 {
        return Err(mismatch);
    }
    match bytes / values {
        4 => Ok(4),
        8 => Ok(8),
        _ => Err(mismatch),
    }
}
