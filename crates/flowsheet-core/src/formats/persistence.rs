//! # Snapshot Format
//!
//! Binary encoding of a selection state, handed to the host as an opaque
//! blob. The core never touches files or key-value stores itself.
//!
//! Format: Header (5 bytes) + postcard-serialized [`SelectionSnapshot`].
//! - 4 bytes: Magic ("FLSH")
//! - 1 byte: Version
//!
//! Size and header are validated before the payload is decoded.

use crate::{FlowsheetError, ProgramId, Selections, primitives};
use serde::{Deserialize, Serialize};

// =============================================================================
// PAYLOAD
// =============================================================================

/// Everything needed to reproduce a session's choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    /// Program the selections belong to; `None` if nothing was open.
    pub program: Option<ProgramId>,
    pub selections: Selections,
}

// =============================================================================
// HEADER
// =============================================================================

/// The snapshot header precedes the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl SnapshotHeader {
    /// Header for the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), FlowsheetError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(FlowsheetError::SerializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(FlowsheetError::SerializationError(format!(
                "Unsupported snapshot version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; primitives::HEADER_LEN] {
        let mut bytes = [0u8; primitives::HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FlowsheetError> {
        let Some(head) = bytes.get(..primitives::HEADER_LEN) else {
            return Err(FlowsheetError::SerializationError(
                "Header too short".to_string(),
            ));
        };
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&head[0..4]);
        Ok(Self {
            magic,
            version: head[4],
        })
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ENCODE / DECODE
// =============================================================================

/// Encode a snapshot (header + payload).
pub fn snapshot_to_bytes(snapshot: &SelectionSnapshot) -> Result<Vec<u8>, FlowsheetError> {
    let payload = postcard::to_stdvec(snapshot)
        .map_err(|e| FlowsheetError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(primitives::HEADER_LEN + payload.len());
    result.extend_from_slice(&SnapshotHeader::new().to_bytes());
    result.extend_from_slice(&payload);
    Ok(result)
}

/// Decode a snapshot.
///
/// Rejects, in order: blobs shorter than the header, blobs over
/// [`primitives::MAX_SNAPSHOT_SIZE`], a wrong magic or version, and
/// payloads that do not decode.
pub fn snapshot_from_bytes(bytes: &[u8]) -> Result<SelectionSnapshot, FlowsheetError> {
    if bytes.len() < primitives::HEADER_LEN {
        return Err(FlowsheetError::SerializationError(format!(
            "Snapshot too short: minimum {} bytes required",
            primitives::HEADER_LEN
        )));
    }
    if bytes.len() > primitives::MAX_SNAPSHOT_SIZE {
        return Err(FlowsheetError::SerializationError(format!(
            "Snapshot size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            primitives::MAX_SNAPSHOT_SIZE
        )));
    }

    SnapshotHeader::from_bytes(bytes)?.validate()?;

    let payload = &bytes[primitives::HEADER_LEN..];
    postcard::from_bytes(payload).map_err(|e| {
        FlowsheetError::SerializationError(format!("Failed to decode snapshot: {}", e))
    })
}

// =============================================================================
// TESTS
// =============================================================================
