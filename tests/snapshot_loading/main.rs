//! Integration tests for loading particles from snapshot files.
//!
//! Fixtures are written to temporary directories with the format crate's
//! test writer and loaded back through `SnapshotLoader::load`, covering the
//! file flavours (tagged or unnamed, either byte order, single or double
//! precision, one file or several) and the paged load contract.

#[path = "../common/mod.rs"]
mod common;

mod derived_quantities;
mod errors;
mod format_equivalence;
mod paging;
