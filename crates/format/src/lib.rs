//! Snapshot containers for fakespec
//!
//! This crate handles everything that touches snapshot files:
//!
//! - BlockTag: four-character block names
//! - BlockContainer: the read interface the particle loader drives
//! - Layout: type-multiplexed block layout and window planning
//! - Gadget: SnapFormat 1/2 reader with byte-order detection, double
//!   precision blocks and multi-file snapshots
//! - MemoryContainer: blocks held in memory
//! - Testing: fixture file writer

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod container;
pub mod gadget;
pub mod layout;
pub mod memory;
pub mod tag;
pub mod testing;

pub use container::{BlockContainer, ContainerError};
pub use gadget::{Endian, GadgetHeader, GadgetOptions, GadgetSnapshot, SnapFormat};
pub use layout::{block_members, BlockLayout, Segment, Span};
pub use memory::MemoryContainer;
pub use tag::BlockTag;
