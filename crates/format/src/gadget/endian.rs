//! Runtime byte order
//!
//! Gadget writes in the native order of the machine that ran the
//! simulation, so the order is only known after inspecting the first record
//! marker of a file.

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use std::io::{self, Read};

/// Values narrowed per step when reading double precision blocks
const NARROW_CHUNK: usize = 1024;

/// Byte order of a snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Little-endian
    #[default]
    Little,
    /// Big-endian
    Big,
}

impl Endian {
    /// Decode a `u32`
    pub fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            Endian::Little => LittleEndian::read_u32(buf),
            Endian::Big => BigEndian::read_u32(buf),
        }
    }

    /// Decode an `i32`
    pub fn read_i32(self, buf: &[u8]) -> i32 {
        match self {
            Endian::Little => LittleEndian::read_i32(buf),
            Endian::Big => BigEndian::read_i32(buf),
        }
    }

    /// Decode an `f64`
    pub fn read_f64(self, buf: &[u8]) -> f64 {
        match self {
            Endian::Little => LittleEndian::read_f64(buf),
            Endian::Big => BigEndian::read_f64(buf),
        }
    }

    /// Read `dst.len()` `f32` values from `reader`
    pub fn read_f32_values<R: Read>(self, reader: &mut R, dst: &mut [f32]) -> io::Result<()> {
        match self {
            Endian::Little => reader.read_f32_into::<LittleEndian>(dst),
            Endian::Big => reader.read_f32_into::<BigEndian>(dst),
        }
    }

    /// Read `dst.len()` `f64` values from `reader`, narrowing to `f32`
    ///
    /// Values pass through a fixed-size stack buffer, so no allocation
    /// scales with `dst`.
    pub fn read_f64_narrowed<R: Read>(self, reader: &mut R, dst: &mut [f32]) -> io::Result<()> {
        let mut wide = [0f64; NARROW_CHUNK];
        for chunk in dst.chunks_mut(NARROW_CHUNK) {
            let wide = &mut wide[..chunk.len()];
            match self {
                Endian::Little => reader.read_f64_into::<LittleEndian>(wide)?,
                Endian::Big => reader.read_f64_into::<BigEndian>(wide)?,
            }
            for (o, w) in chunk.iter_mut().zip(wide.iter()) {
                *o = *w as f32;
            }
        }
        Ok(())
    }

    /// Encode a `u32`
    pub fn write_u32(self, buf: &mut [u8], n: u32) {
        match self {
            Endian::Little => LittleEndian::write_u32(buf, n),
            Endian::Big => BigEndian::write_u32(buf, n),
        }
    }

    /// Encode an `i32`
    pub fn write_i32(self, buf: &mut [u8], n: i32) {
        match self {
            Endian::Little => LittleEndian::write_i32(buf, n),
            Endian::Big => BigEndian::write_i32(buf, n),
        }
    }

    /// Encode an `f64`
    pub fn write_f64(self, buf: &mut [u8], n: f64) {
        match self {
            Endian::Little => LittleEndian::write_f64(buf, n),
            Endian::Big => BigEndian::write_f64(buf, n),
        }
    }

    /// Encode `f32` values into `dst`
    pub fn write_f32_into(self, src: &[f32], dst: &mut [u8]) {
        match self {
            Endian::Little => LittleEndian::write_f32_into(src, dst),
            Endian::Big => BigEndian::write_f32_into(src, dst),
        }
    }

    /// Encode `f64` values into `dst`
    pub fn write_f64_into(self, src: &[f64], dst: &mut [u8]) {
        match self {
            Endian::Little => LittleEndian::write_f64_into(src, dst),
            Endian::Big => BigEndian::write_f64_into(src, dst),
        }
    }
}
