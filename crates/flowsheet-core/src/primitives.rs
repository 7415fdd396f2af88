//! # Primitives
//!
//! Fixed constants of the flowsheet core. Compiled in, never configured.

/// Magic bytes for the snapshot blob header.
///
/// - Blob = Magic Bytes ("FLSH") + Version (u8) + postcard payload.
pub const MAGIC_BYTES: &[u8; 4] = b"FLSH";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot payload.
pub const FORMAT_VERSION: u8 = 1;

/// Header length in bytes (magic + version).
pub const HEADER_LEN: usize = 5;

/// Maximum accepted snapshot size.
///
/// Checked before any payload decoding. A selection state is a few hundred
/// bytes; 1 MiB leaves room for very large programs.
pub const MAX_SNAPSHOT_SIZE: usize = 1024 * 1024;

/// Minimum number of rows the grid is laid out with.
pub const MIN_GRID_ROWS: usize = 5;
