//! # flowsheet-core
//!
//! The slot resolution and prerequisite overlay engine for Flowsheet.
//!
//! A program's curriculum is a grid of slots. Core slots hold a fixed
//! course; elective, minor and honors slots are filled by a choice. This
//! crate turns a static [`Catalog`] plus a versioned [`Selections`] state
//! into everything a front end needs to draw the grid:
//!
//! - the Effective Course List ([`Resolver`])
//! - the options and tracks that are currently unavailable ([`ConflictEngine`])
//! - prerequisite / postrequisite sets of the active slot ([`relationships`])
//! - per-slot display states ([`classify`])
//!
//! ## Architectural Constraints
//!
//! - Slot ids never change; substitution only swaps content
//! - Every derived output is rebuilt from inputs, never patched
//! - No async, no network, no file I/O (hosts own persistence)
//! - `BTreeMap` / `BTreeSet` only, integer credits only

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod conflict;
pub mod formats;
pub mod labels;
pub mod linkage;
pub mod metrics;
pub mod primitives;
pub mod relations;
pub mod resolver;
pub mod selection;
pub mod session;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{CourseId, FlowsheetError, ProgramId, SlotId, SlotKind, TrackId, TrackKind};

// =============================================================================
// RE-EXPORTS: Catalog and State
// =============================================================================

pub use catalog::{
    Catalog, Course, CourseContent, CourseOption, ElectiveSlot, Program, Semester, Slot, Track,
    TrackSlot, Year,
};
pub use selection::Selections;
pub use validation::{CatalogValidator, CatalogWarning};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use conflict::ConflictEngine;
pub use linkage::Linkage;
pub use metrics::{ProgramMetrics, SemesterCredits};
pub use relations::{
    Connection, ConnectionKind, Relationships, SlotIndex, connections, relationships, resolve_slot,
};
pub use resolver::{EffectiveContent, EffectiveCourse, Resolver};
pub use session::{CourseView, FlowsheetView, Session};
pub use status::{CourseStatus, classify};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{SelectionSnapshot, SnapshotHeader, snapshot_from_bytes, snapshot_to_bytes};
