//! # Conflict Engine
//!
//! Works out which choices are unavailable given what is already taken.
//!
//! ## Sets
//!
//! | Set | Built from |
//! |-----|------------|
//! | taken | core slot ids + currently selected option ids |
//! | disabled minors / honors | track courses or their mutex ids hitting `taken` |
//! | disabled options | `taken` + active track courses, mutex ids in both directions |
//!
//! Everything is recomputed from scratch per change; nothing is cached here.

use crate::catalog::{Catalog, CourseOption, ElectiveSlot, Slot, Track};
use crate::{CourseId, Selections, TrackId, TrackKind};
use std::collections::BTreeSet;

/// Stateless conflict computations.
pub struct ConflictEngine;

impl ConflictEngine {
    /// Every core slot id plus every valid selected option id.
    ///
    /// This is the pre-substitution view: it does not include courses that
    /// only reach the grid through an active Minor or Honors track.
    pub fn taken_base_set<'a, I>(slots: I, selections: &Selections) -> BTreeSet<CourseId>
    where
        I: IntoIterator<Item = &'a Slot>,
    {
        let mut taken = BTreeSet::new();
        for slot in slots {
            match slot {
                Slot::Core(course) => {
                    taken.insert(course.id.clone());
                }
                Slot::Elective(elective) => {
                    if let Some(option) = Self::selected_option(elective, selections) {
                        taken.insert(option.id.clone());
                    }
                }
                Slot::Minor(_) | Slot::Honors(_) => {}
            }
        }
        taken
    }

    /// Tracks that cannot be activated because they overlap `taken`.
    ///
    /// A track is disabled as soon as one of its courses is taken, or one of
    /// its courses names a taken id in `mutex_ids`.
    #[must_use]
    pub fn disabled_tracks(tracks: &[Track], taken: &BTreeSet<CourseId>) -> BTreeSet<TrackId> {
        tracks
            .iter()
            .filter(|track| {
                track.courses.iter().any(|course| {
                    taken.contains(&course.id) || course.mutex_ids.iter().any(|m| taken.contains(m))
                })
            })
            .map(|track| track.id.clone())
            .collect()
    }

    #[must_use]
    pub fn disabled_minors(minors: &[Track], taken: &BTreeSet<CourseId>) -> BTreeSet<TrackId> {
        Self::disabled_tracks(minors, taken)
    }

    #[must_use]
    pub fn disabled_honors(honors: &[Track], taken: &BTreeSet<CourseId>) -> BTreeSet<TrackId> {
        Self::disabled_tracks(honors, taken)
    }

    /// Elective options that cannot be chosen right now.
    ///
    /// An option is disabled when its id or one of its mutex ids is in the
    /// extended set (`taken` plus active track courses), or when a selected
    /// option or active track course lists it in its own `mutex_ids`. The
    /// option currently selected in a slot is never disabled for that slot.
    pub fn disabled_options<'a, I>(
        catalog: &Catalog,
        slots: I,
        taken: &BTreeSet<CourseId>,
        selections: &Selections,
    ) -> BTreeSet<CourseId>
    where
        I: IntoIterator<Item = &'a Slot>,
    {
        let electives: Vec<&ElectiveSlot> =
            slots.into_iter().filter_map(Slot::as_elective).collect();
        let active_courses = Self::active_track_courses(catalog, selections);

        let mut extended = taken.clone();
        extended.extend(active_courses.iter().map(|c| c.id.clone()));

        // Ids named as conflicts by whatever is already on the grid.
        let mut blocked: BTreeSet<&CourseId> = BTreeSet::new();
        for elective in &electives {
            if let Some(option) = Self::selected_option(elective, selections) {
                blocked.extend(option.mutex_ids.iter());
            }
        }
        for course in &active_courses {
            blocked.extend(course.mutex_ids.iter());
        }

        let mut disabled = BTreeSet::new();
        for elective in &electives {
            let own = selections.choice(&elective.id);
            for option in &elective.options {
                if own == Some(&option.id) {
                    continue;
                }
                let conflicts = extended.contains(&option.id)
                    || option.mutex_ids.iter().any(|m| extended.contains(m))
                    || blocked.contains(&option.id);
                if conflicts {
                    disabled.insert(option.id.clone());
                }
            }
        }
        disabled
    }

    fn selected_option<'s>(
        elective: &'s ElectiveSlot,
        selections: &Selections,
    ) -> Option<&'s CourseOption> {
        selections
            .choice(&elective.id)
            .and_then(|id| elective.option(id))
    }

    fn active_track_courses<'c>(
        catalog: &'c Catalog,
        selections: &Selections,
    ) -> Vec<&'c CourseOption> {
        [TrackKind::Minor, TrackKind::Honors]
            .into_iter()
            .filter_map(|kind| {
                selections
                    .track(kind)
                    .and_then(|id| catalog.track(kind, id))
            })
            .flat_map(|track| track.courses.iter())
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
