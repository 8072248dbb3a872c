//! Gadget `HEAD` block
//!
//! # Layout (256 bytes)
//!
//! ```text
//! offset  field                      type
//!      0  npart[6]                   u32
//!     24  mass[6]                    f64
//!     72  time                       f64
//!     80  redshift                   f64
//!     88  flag_sfr                   i32
//!     92  flag_feedback              i32
//!     96  npartTotal[6]              u32
//!    120  flag_cooling               i32
//!    124  num_files                  i32
//!    128  BoxSize                    f64
//!    136  Omega0                     f64
//!    144  OmegaLambda                f64
//!    152  HubbleParam                f64
//!    160  flag_stellarage            i32
//!    164  flag_metals                i32
//!    168  npartTotalHighWord[6]      u32
//!    192  flag_entropy_instead_u     i32
//!    196  padding
//! ```

use super::endian::Endian;
use fakespec_core::{SnapshotHeader, N_TYPES};

/// Size of the `HEAD` payload in bytes
pub const GADGET_HEADER_SIZE: usize = 256;

/// Header of a single snapshot file, as stored
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GadgetHeader {
    /// Particles of each type in this file
    pub npart: [u32; N_TYPES],
    /// Uniform mass per type
    pub mass: [f64; N_TYPES],
    /// Expansion factor
    pub time: f64,
    /// Redshift
    pub redshift: f64,
    /// Star formation flag
    pub flag_sfr: i32,
    /// Feedback flag
    pub flag_feedback: i32,
    /// Low 32 bits of the total particles of each type
    pub npart_total: [u32; N_TYPES],
    /// Cooling flag
    pub flag_cooling: i32,
    /// Number of files in the snapshot
    pub num_files: i32,
    /// Box size
    pub box_size: f64,
    /// Matter density parameter
    pub omega0: f64,
    /// Dark energy density parameter
    pub omega_lambda: f64,
    /// Dimensionless Hubble parameter
    pub hubble_param: f64,
    /// Stellar age flag
    pub flag_stellarage: i32,
    /// Metals flag
    pub flag_metals: i32,
    /// High 32 bits of the total particles of each type
    pub npart_total_high_word: [u32; N_TYPES],
    /// Entropy-instead-of-energy flag
    pub flag_entropy_instead_u: i32,
}

impl GadgetHeader {
    /// Parse a header payload
    ///
    /// Returns `None` if `bytes` is shorter than the fixed header.
    pub fn from_bytes(bytes: &[u8], endian: Endian) -> Option<Self> {
        if bytes.len() < GADGET_HEADER_SIZE {
            return None;
        }
        let u32s = |at: usize| -> [u32; N_TYPES] {
            let mut out = [0u32; N_TYPES];
            for (i, v) in out.iter_mut().enumerate() {
                *v = endian.read_u32(&bytes[at + 4 * i..]);
            }
            out
        };
        let mut mass = [0f64; N_TYPES];
        for (i, m) in mass.iter_mut().enumerate() {
            *m = endian.read_f64(&bytes[24 + 8 * i..]);
        }

        Some(GadgetHeader {
            npart: u32s(0),
            mass,
            time: endian.read_f64(&bytes[72..]),
            redshift: endian.read_f64(&bytes[80..]),
            flag_sfr: endian.read_i32(&bytes[88..]),
            flag_feedback: endian.read_i32(&bytes[92..]),
            npart_total: u32s(96),
            flag_cooling: endian.read_i32(&bytes[120..]),
            num_files: endian.read_i32(&bytes[124..]),
            box_size: endian.read_f64(&bytes[128..]),
            omega0: endian.read_f64(&bytes[136..]),
            omega_lambda: endian.read_f64(&bytes[144..]),
            hubble_param: endian.read_f64(&bytes[152..]),
            flag_stellarage: endian.read_i32(&bytes[160..]),
            flag_metals: endian.read_i32(&bytes[164..]),
            npart_total_high_word: u32s(168),
            flag_entropy_instead_u: endian.read_i32(&bytes[192..]),
        })
    }

    /// Serialize the header payload
    pub fn to_bytes(&self, endian: Endian) -> [u8; GADGET_HEADER_SIZE] {
        let mut bytes = [0u8; GADGET_HEADER_SIZE];
        for i in 0..N_TYPES {
            endian.write_u32(&mut bytes[4 * i..], self.npart[i]);
            endian.write_f64(&mut bytes[24 + 8 * i..], self.mass[i]);
            endian.write_u32(&mut bytes[96 + 4 * i..], self.npart_total[i]);
            endian.write_u32(&mut bytes[168 + 4 * i..], self.npart_total_high_word[i]);
        }
        endian.write_f64(&mut bytes[72..], self.time);
        endian.write_f64(&mut bytes[80..], self.redshift);
        endian.write_i32(&mut bytes[88..], self.flag_sfr);
        endian.write_i32(&mut bytes[92..], self.flag_feedback);
        endian.write_i32(&mut bytes[120..], self.flag_cooling);
        endian.write_i32(&mut bytes[124..], self.num_files);
        endian.write_f64(&mut bytes[128..], self.box_size);
        endian.write_f64(&mut bytes[136..], self.omega0);
        endian.write_f64(&mut bytes[144..], self.omega_lambda);
        endian.write_f64(&mut bytes[152..], self.hubble_param);
        endian.write_i32(&mut bytes[160..], self.flag_stellarage);
        endian.write_i32(&mut bytes[164..], self.flag_metals);
        endian.write_i32(&mut bytes[192..], self.flag_entropy_instead_u);
        bytes
    }

    /// Particles of each type in this file, widened
    pub fn file_counts(&self) -> [u64; N_TYPES] {
        self.npart.map(u64::from)
    }

    /// Total particles of each type with the high word folded in
    pub fn total_counts(&self) -> [u64; N_TYPES] {
        let mut totals = [0u64; N_TYPES];
        for (i, total) in totals.iter_mut().enumerate() {
            *total = u64::from(self.npart_total[i])
                | (u64::from(self.npart_total_high_word[i]) << 32);
        }
        totals
    }

    /// Snapshot-level header with the given summed per-type counts
    pub fn to_snapshot_header(&self, particle_count_by_type: [u64; N_TYPES]) -> SnapshotHeader {
        SnapshotHeader {
            particle_count_by_type,
            mass_by_type: self.mass,
            expansion_factor: self.time,
            redshift: self.redshift,
            box_size: self.box_size,
            hubble_param: self.hubble_param,
            omega0: self.omega0,
            omega_lambda: self.omega_lambda,
            cooling_flag: self.flag_cooling != 0,
            total_count_by_type: self.total_counts(),
            num_files: self.num_files.max(1) as u32,
            sfr_flag: self.flag_sfr != 0,
            feedback_flag: self.flag_feedback != 0,
            stellar_age_flag: self.flag_stellarage != 0,
            metals_flag: self.flag_metals != 0,
            entropy_instead_of_u_flag: self.flag_entropy_instead_u != 0,
        }
    }

    /// On-disk header describing one file of `snapshot`
    pub fn for_file(snapshot: &SnapshotHeader, file_counts: [u64; N_TYPES]) -> Self {
        let flag = |b: bool| i32::from(b);
        GadgetHeader {
            npart: file_counts.map(|n| n as u32),
            mass: snapshot.mass_by_type,
            time: snapshot.expansion_factor,
            redshift: snapshot.redshift,
            flag_sfr: flag(snapshot.sfr_flag),
            flag_feedback: flag(snapshot.feedback_flag),
            npart_total: snapshot.total_count_by_type.map(|n| n as u32),
            flag_cooling: flag(snapshot.cooling_flag),
            num_files: snapshot.num_files as i32,
            box_size: snapshot.box_size,
            omega0: snapshot.omega0,
            omega_lambda: snapshot.omega_lambda,
            hubble_param: snapshot.hubble_param,
            flag_stellarage: flag(snapshot.stellar_age_flag),
            flag_metals: flag(snapshot.metals_flag),
            npart_total_high_word: snapshot.total_count_by_type.map(|n| (n >> 32) as u32),
            flag_entropy_instead_u: flag(snapshot.entropy_instead_of_u_flag),
        }
    }
}
