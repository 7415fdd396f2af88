//! # Formats
//!
//! Byte-level encodings of engine state. Pure transformations: hosts decide
//! where the bytes are stored.

pub mod persistence;

pub use persistence::{SelectionSnapshot, SnapshotHeader, snapshot_from_bytes, snapshot_to_bytes};
