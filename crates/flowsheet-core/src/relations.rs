//! # Relationship Deriver
//!
//! Prerequisite and postrequisite sets of the active slot, computed against
//! the Effective Course List so substituted content takes part.
//!
//! ## Indirection
//!
//! Catalog prerequisites may name a slot id or the id of a concrete course
//! that only reaches the grid through substitution (a minor course sitting
//! in a minor slot). [`resolve_slot`] maps either form back to the slot the
//! course occupies.

use crate::resolver::EffectiveCourse;
use crate::{CourseId, SlotId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Relationship sets of one active slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationships {
    /// The active course's prerequisite ids, unresolved.
    pub prereq_ids: BTreeSet<CourseId>,
    /// Slot ids of courses that depend on the active course.
    pub postreq_ids: BTreeSet<SlotId>,
}

impl Relationships {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prereq_ids.is_empty() && self.postreq_ids.is_empty()
    }
}

/// Derive relationships for `active` over `effective`.
///
/// Both sets are empty when nothing is active or the active id names no
/// effective course.
#[must_use]
pub fn relationships(active: Option<&SlotId>, effective: &[EffectiveCourse]) -> Relationships {
    let Some(course) = active.and_then(|id| effective.iter().find(|c| &c.id == id)) else {
        return Relationships::default();
    };

    let prereq_ids = course.prereqs().iter().cloned().collect();
    let original = course.original_id();

    let postreq_ids = effective
        .iter()
        .filter(|other| {
            other
                .prereqs()
                .iter()
                .any(|p| p == &course.id || Some(p) == original)
        })
        .map(|other| other.id.clone())
        .collect();

    Relationships {
        prereq_ids,
        postreq_ids,
    }
}

/// The slot a course id currently lives in.
///
/// Direct slot id match wins; otherwise the slot whose substituted content
/// has that id.
#[must_use]
pub fn resolve_slot<'e>(
    id: &CourseId,
    effective: &'e [EffectiveCourse],
) -> Option<&'e EffectiveCourse> {
    effective
        .iter()
        .find(|c| &c.id == id)
        .or_else(|| effective.iter().find(|c| c.original_id() == Some(id)))
}

// =============================================================================
// SLOT INDEX
// =============================================================================

/// Reverse index from course id to slot id, rebuilt with the effective list.
#[derive(Debug, Clone, Default)]
pub struct SlotIndex {
    slots: BTreeSet<SlotId>,
    by_original: BTreeMap<CourseId, SlotId>,
}

impl SlotIndex {
    #[must_use]
    pub fn build(effective: &[EffectiveCourse]) -> Self {
        let mut index = Self::default();
        for course in effective {
            index.slots.insert(course.id.clone());
            if let Some(original) = course.original_id() {
                // First occurrence wins, matching the linear scan.
                index
                    .by_original
                    .entry(original.clone())
                    .or_insert_with(|| course.id.clone());
            }
        }
        index
    }

    /// Same answer as [`resolve_slot`], by lookup.
    #[must_use]
    pub fn resolve(&self, id: &CourseId) -> Option<&SlotId> {
        self.slots.get(id).or_else(|| self.by_original.get(id))
    }
}

// =============================================================================
// CONNECTIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    Prereq,
    Postreq,
}

/// One connector between two rendered slots.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    pub from: SlotId,
    pub to: SlotId,
    pub kind: ConnectionKind,
}

/// Connector endpoints for the active slot.
///
/// Prerequisite edges run from the prerequisite's slot to the active slot;
/// postrequisite edges from the active slot to the dependent slot. Ids that
/// resolve to no slot are skipped.
#[must_use]
pub fn connections(
    active: Option<&SlotId>,
    rel: &Relationships,
    effective: &[EffectiveCourse],
) -> Vec<Connection> {
    let Some(active) = active else {
        return Vec::new();
    };
    let index = SlotIndex::build(effective);

    let incoming = rel.prereq_ids.iter().filter_map(|id| {
        index.resolve(id).map(|from| Connection {
            from: from.clone(),
            to: active.clone(),
            kind: ConnectionKind::Prereq,
        })
    });
    let outgoing = rel.postreq_ids.iter().filter_map(|id| {
        index.resolve(id).map(|to| Connection {
            from: active.clone(),
            to: to.clone(),
            kind: ConnectionKind::Postreq,
        })
    });

    incoming.chain(outgoing).collect()
}

// =============================================================================
// TESTS
// =============================================================================
