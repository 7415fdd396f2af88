//! # Selection State
//!
//! The only mutable input of the engine: which option fills each elective
//! slot, and which Minor and Honors tracks are active program-wide.
//!
//! - Owned by a single controller (the [`crate::Session`] or a host)
//! - Mutated only through the transition functions below
//! - Every transition bumps `version` exactly once, so observers can tell
//!   that a linked (two-key) update happened atomically
//! - Never persisted by the core; see [`crate::formats`] for the blob format

use crate::{CourseId, SlotId, TrackId, TrackKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Versioned selection state fed into every derived computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections {
    choices: BTreeMap<SlotId, CourseId>,
    minor: Option<TrackId>,
    honors: Option<TrackId>,
    version: u64,
}

impl Selections {
    /// Create an empty selection state at version 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The chosen option for an elective slot.
    #[must_use]
    pub fn choice(&self, slot: &SlotId) -> Option<&CourseId> {
        self.choices.get(slot)
    }

    /// All elective choices, ordered by slot id.
    #[must_use]
    pub fn choices(&self) -> &BTreeMap<SlotId, CourseId> {
        &self.choices
    }

    #[must_use]
    pub fn minor(&self) -> Option<&TrackId> {
        self.minor.as_ref()
    }

    #[must_use]
    pub fn honors(&self) -> Option<&TrackId> {
        self.honors.as_ref()
    }

    /// The active track of one kind.
    #[must_use]
    pub fn track(&self, kind: TrackKind) -> Option<&TrackId> {
        match kind {
            TrackKind::Minor => self.minor(),
            TrackKind::Honors => self.honors(),
        }
    }

    /// Monotonic change counter.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// True when nothing is chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty() && self.minor.is_none() && self.honors.is_none()
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Write a batch of elective choices as one transition.
    ///
    /// All entries are written before the version is bumped; the batch is the
    /// unit of atomicity for linked choices. Empty batches are ignored.
    pub fn apply_choices(&mut self, updates: impl IntoIterator<Item = (SlotId, CourseId)>) {
        let mut changed = false;
        for (slot, option) in updates {
            self.choices.insert(slot, option);
            changed = true;
        }
        if changed {
            self.bump();
        }
    }

    /// Set or clear the active track of one kind.
    pub fn set_track(&mut self, kind: TrackKind, id: Option<TrackId>) {
        match kind {
            TrackKind::Minor => self.minor = id,
            TrackKind::Honors => self.honors = id,
        }
        self.bump();
    }

    pub fn set_minor(&mut self, id: Option<TrackId>) {
        self.set_track(TrackKind::Minor, id);
    }

    pub fn set_honors(&mut self, id: Option<TrackId>) {
        self.set_track(TrackKind::Honors, id);
    }

    /// Clear one elective choice. Returns whether a choice was removed.
    pub fn clear_choice(&mut self, slot: &SlotId) -> bool {
        let removed = self.choices.remove(slot).is_some();
        if removed {
            self.bump();
        }
        removed
    }

    /// Discard every choice and both tracks.
    ///
    /// The version keeps counting so a reset is observable as a change.
    pub fn reset(&mut self) {
        self.choices.clear();
        self.minor = None;
        self.honors = None;
        self.bump();
    }

    fn bump(&mut self) {
        self.version = self.version.saturating_add(1);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_is_one_version_bump() {
        let mut s = Selections::new();
        s.apply_choices([
            (SlotId::from("lec"), CourseId::from("lec-a")),
            (SlotId::from("lab"), CourseId::from("lab-a")),
        ]);
        assert_eq!(s.version(), 1);
        assert_eq!(s.choice(&SlotId::from("lec")), Some(&CourseId::from("lec-a")));
        assert_eq!(s.choice(&SlotId::from("lab")), Some(&CourseId::from("lab-a")));
    }

    #[test]
    fn empty_batch_does_not_bump() {
        let mut s = Selections::new();
        s.apply_choices(std::iter::empty());
        assert_eq!(s.version(), 0);
    }

    #[test]
    fn tracks_are_singletons() {
        let mut s = Selections::new();
        s.set_minor(Some(TrackId::from("m1")));
        s.set_minor(Some(TrackId::from("m2")));
        assert_eq!(s.minor(), Some(&TrackId::from("m2")));
        s.set_honors(Some(TrackId::from("h1")));
        assert_eq!(s.track(TrackKind::Honors), Some(&TrackId::from("h1")));
        s.set_minor(None);
        assert!(s.minor().is_none());
    }

    #[test]
    fn reset_clears_everything_and_counts() {
        let mut s = Selections::new();
        s.apply_choices([(SlotId::from("e1"), CourseId::from("o1"))]);
        s.set_minor(Some(TrackId::from("m1")));
        s.set_honors(Some(TrackId::from("h1")));
        let before = s.version();

        s.reset();

        assert!(s.is_empty());
        assert!(s.choices().is_empty());
        assert!(s.version() > before);
    }

    #[test]
    fn clear_choice_reports_removal() {
        let mut s = Selections::new();
        s.apply_choices([(SlotId::from("e1"), CourseId::from("o1"))]);
        assert!(s.clear_choice(&SlotId::from("e1")));
        assert!(!s.clear_choice(&SlotId::from("e1")));
        assert_eq!(s.version(), 2);
    }
}
