//! Fortran unformatted record framing
//!
//! ```text
//! +-------------+ 0
//! | len: u32    |
//! +-------------+ 4
//! | payload     | len bytes
//! +-------------+ 4 + len
//! | len: u32    |
//! +-------------+ 8 + len
//! ```
//!
//! SnapFormat 2 puts an 8-byte record in front of every block:
//! `tag[4] | next_block_size: u32`.

use super::endian::Endian;
use crate::container::ContainerError;
use crate::tag::BlockTag;
use std::io::{Read, Seek, SeekFrom, Write};

/// Payload size of a SnapFormat 2 tag record
pub const TAG_RECORD_SIZE: u32 = 8;

/// Snapshot file flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapFormat {
    /// Unnamed blocks in a fixed order
    Unnamed,
    /// Every block preceded by a tag record
    Tagged,
}

/// Detect flavour and byte order from the first record marker
///
/// Tagged files open with an 8-byte tag record, unnamed files with the
/// 256-byte header record.
pub fn detect(marker: [u8; 4]) -> Option<(SnapFormat, Endian)> {
    let candidates = [
        (SnapFormat::Tagged, TAG_RECORD_SIZE),
        (SnapFormat::Unnamed, super::header::GADGET_HEADER_SIZE as u32),
    ];
    for endian in [Endian::Little, Endian::Big] {
        let value = endian.read_u32(&marker);
        for (format, expected) in candidates {
            if value == expected {
                return Some((format, endian));
            }
        }
    }
    None
}

/// Location of one record's payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// Byte offset of the payload
    pub offset: u64,
    /// Payload length in bytes
    pub len: u64,
}

/// Walk every record of a file, validating both markers
pub fn scan_records<R: Read + Seek>(
    reader: &mut R,
    endian: Endian,
    file_len: u64,
) -> Result<Vec<Record>, ContainerError> {
    let mut records = Vec::new();
    let mut pos = 0u64;
    let mut marker = [0u8; 4];

    while pos < file_len {
        if pos + 4 > file_len {
            return Err(ContainerError::RecordMismatch {
                offset: pos,
                leading: 0,
                trailing: 0,
            });
        }
        reader.seek(SeekFrom::Start(pos))?;
        reader.read_exact(&mut marker)?;
        let leading = endian.read_u32(&marker);
        let len = u64::from(leading);

        let trailer_at = pos + 4 + len;
        if trailer_at + 4 > file_len {
            return Err(ContainerError::RecordMismatch {
                offset: pos,
                leading,
                trailing: 0,
            });
        }
        reader.seek(SeekFrom::Start(trailer_at))?;
        reader.read_exact(&mut marker)?;
        let trailing = endian.read_u32(&marker);
        if trailing != leading {
            return Err(ContainerError::RecordMismatch {
                offset: pos,
                leading,
                trailing,
            });
        }

        records.push(Record {
            offset: pos + 4,
            len,
        });
        pos = trailer_at + 4;
    }

    Ok(records)
}

/// Read a whole record payload
pub fn read_payload<R: Read + Seek>(reader: &mut R, record: Record) -> std::io::Result<Vec<u8>> {
    let mut buf = vec![0u8; record.len as usize];
    reader.seek(SeekFrom::Start(record.offset))?;
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// Decode a SnapFormat 2 tag record payload
pub fn parse_tag_record(payload: &[u8], endian: Endian) -> Option<(BlockTag, u32)> {
    if payload.len() != TAG_RECORD_SIZE as usize {
        return None;
    }
    let tag = BlockTag::from_bytes(payload[0..4].try_into().ok()?);
    Some((tag, endian.read_u32(&payload[4..8])))
}

/// Write one framed record
pub fn write_record<W: Write>(writer: &mut W, endian: Endian, payload: &[u8]) -> std::io::Result<()> {
    let len = u32::try_from(payload.len()).map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "record exceeds 4 GiB")
    })?;
    let mut marker = [0u8; 4];
    endian.write_u32(&mut marker, len);
    writer.write_all(&marker)?;
    writer.write_all(payload)?;
    writer.write_all(&marker)
}

/// Write a SnapFormat 2 tag record announcing a block of `block_len` bytes
pub fn write_tag_record<W: Write>(
    writer: &mut W,
    endian: Endian,
    tag: BlockTag,
    block_len: usize,
) -> std::io::Result<()> {
    let mut payload = [0u8; TAG_RECORD_SIZE as usize];
    payload[0..4].copy_from_slice(tag.as_bytes());
    // Gadget counts the framing of the data record in this size
    endian.write_u32(&mut payload[4..8], (block_len + 8) as u32);
    write_record(writer, endian, &payload)
}
