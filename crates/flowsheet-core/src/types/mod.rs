//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the flowsheet engine:
//! - Identifiers (`CourseId`, `SlotId`, `TrackId`, `ProgramId`)
//! - Slot and track discriminants (`SlotKind`, `TrackKind`)
//! - Error types (`FlowsheetError`)
//!
//! ## Identity Rules
//!
//! Slot ids, option ids and track course ids live in ONE namespace per
//! program: a prerequisite list may name any of them. A slot id is stable
//! across substitution and is the join key for every downstream consumer.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a concrete course or of a slot in the curriculum grid.
///
/// Core slots use their course id as slot id. Elective, minor and honors
/// slots have their own ids which never collide with the ids of the courses
/// that can be substituted into them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub String);

impl CourseId {
    /// Create a new course id.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourseId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A slot is addressed by a course id: slot ids share the course namespace.
pub type SlotId = CourseId;

/// Identifier of a Minor or Honors track.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub String);

impl TrackId {
    /// Create a new track id.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier of a degree program.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(pub String);

impl ProgramId {
    /// Create a new program id.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProgramId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// =============================================================================
// DISCRIMINANTS
// =============================================================================

/// The kind of a slot, independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// A fixed course.
    Core,
    /// A slot resolved by a per-slot choice among declared options.
    Elective,
    /// A slot bound by position to the active Minor track.
    Minor,
    /// A slot bound by position to the active Honors track.
    Honors,
}

impl SlotKind {
    /// Lowercase name, as used in catalog documents.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKind::Core => "core",
            SlotKind::Elective => "elective",
            SlotKind::Minor => "minor",
            SlotKind::Honors => "honors",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two program-wide track pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Minor,
    Honors,
}

impl TrackKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Minor => "minor",
            TrackKind::Honors => "honors",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the flowsheet engine.
///
/// Interactive operations (resolve, conflicts, relationships, status) never
/// fail: stale or dangling references degrade to unresolved content. Errors
/// are reserved for lookups that miss and for rejecting bad input documents.
#[derive(Debug, Error)]
pub enum FlowsheetError {
    /// The requested program does not exist in the catalog.
    #[error("Program not found: {0}")]
    ProgramNotFound(ProgramId),

    /// An operation that needs an open program was called without one.
    #[error("No program is open")]
    NoProgramOpen,

    /// The catalog violates a structural rule and cannot be used.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// The prerequisite graph of a program contains a cycle.
    #[error("Prerequisite cycle in program {program}: {}", format_cycle(.cycle))]
    PrerequisiteCycle {
        program: ProgramId,
        cycle: Vec<CourseId>,
    },

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// A choice or track selection was refused (raised by hosts when a
    /// transition returns `false`).
    #[error("Rejected: {0}")]
    Rejected(String),

    /// An I/O error occurred (raised by hosts, never by the core itself).
    #[error("I/O error: {0}")]
    IoError(String),
}

fn format_cycle(cycle: &[CourseId]) -> String {
    cycle
        .iter()
        .map(CourseId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_encode_as_plain_strings() {
        let id = CourseId::new("R5CO2001T");
        let bytes = postcard::to_stdvec(&id).expect("serialize");
        let decoded: String = postcard::from_bytes(&bytes).expect("decode as string");
        assert_eq!(decoded, "R5CO2001T");
    }

    #[test]
    fn ids_order_lexicographically() {
        let mut ids = vec![CourseId::from("c3"), CourseId::from("c1"), CourseId::from("c2")];
        ids.sort();
        let raw: Vec<_> = ids.iter().map(CourseId::as_str).collect();
        assert_eq!(raw, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn cycle_error_message_lists_path() {
        let err = FlowsheetError::PrerequisiteCycle {
            program: ProgramId::from("cse-bs"),
            cycle: vec![CourseId::from("a"), CourseId::from("b"), CourseId::from("a")],
        };
        assert_eq!(
            err.to_string(),
            "Prerequisite cycle in program cse-bs: a -> b -> a"
        );
    }

    #[test]
    fn rejection_message_names_the_transition() {
        let err = FlowsheetError::Rejected("Chose X for E1".to_string());
        assert_eq!(err.to_string(), "Rejected: Chose X for E1");
    }

    #[test]
    fn slot_kind_names() {
        assert_eq!(SlotKind::Elective.to_string(), "elective");
        assert_eq!(TrackKind::Honors.as_str(), "honors");
    }
}
