//! Gadget snapshot files
//!
//! Supports both SnapFormat 1 (unnamed blocks) and SnapFormat 2 (tagged
//! blocks), either byte order, single or double precision float blocks, and
//! snapshots split over several numbered files.

pub mod endian;
pub mod header;
pub mod reader;
pub mod record;

pub use endian::Endian;
pub use header::{GadgetHeader, GADGET_HEADER_SIZE};
pub use reader::{GadgetOptions, GadgetSnapshot};
pub use record::SnapFormat;

use std::path::{Path, PathBuf};

/// Path of file `index` of a multi-file snapshot (`base.index`)
pub fn numbered(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}
