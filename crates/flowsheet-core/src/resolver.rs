//! # Slot Resolver
//!
//! Turns Catalog + Selections into the Effective Course List: one entry per
//! slot, in grid order, keeping the slot id and substituting content.
//!
//! - Core slots pass through as `Fixed`
//! - A valid choice / active track course becomes `Substituted`, which always
//!   records the substituted course's own id as `original_id`
//! - Anything missing or stale becomes `Unresolved` (never an error)
//!
//! The list is rebuilt from scratch on every change. Entries are fresh
//! values; nothing is merged into or patched on an existing record.

use crate::catalog::{Catalog, CourseContent, Slot, TrackSlot};
use crate::labels::track_slot_label;
use crate::{CourseId, Selections, SlotId, SlotKind, TrackKind};
use serde::{Deserialize, Serialize};

// =============================================================================
// EFFECTIVE COURSE
// =============================================================================

/// What a slot currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EffectiveContent {
    /// A core course; the slot id is also the content id.
    Fixed(CourseContent),
    /// Content of a chosen option or active track course.
    Substituted {
        original_id: CourseId,
        content: CourseContent,
    },
    /// No valid choice: placeholder only, no prerequisites.
    Unresolved { label: String, credits: u32 },
}

/// A slot after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveCourse {
    /// The slot id, never the substituted course's id.
    pub id: SlotId,
    pub kind: SlotKind,
    pub content: EffectiveContent,
}

impl EffectiveCourse {
    /// Declared prerequisites of the current content.
    #[must_use]
    pub fn prereqs(&self) -> &[CourseId] {
        match &self.content {
            EffectiveContent::Fixed(c) | EffectiveContent::Substituted { content: c, .. } => {
                &c.prereqs
            }
            EffectiveContent::Unresolved { .. } => &[],
        }
    }

    /// The substituted course's own id, if content was substituted.
    #[must_use]
    pub fn original_id(&self) -> Option<&CourseId> {
        match &self.content {
            EffectiveContent::Substituted { original_id, .. } => Some(original_id),
            _ => None,
        }
    }

    #[must_use]
    pub fn course(&self) -> Option<&CourseContent> {
        match &self.content {
            EffectiveContent::Fixed(c) | EffectiveContent::Substituted { content: c, .. } => {
                Some(c)
            }
            EffectiveContent::Unresolved { .. } => None,
        }
    }

    #[must_use]
    pub fn credits(&self) -> u32 {
        match &self.content {
            EffectiveContent::Fixed(c) | EffectiveContent::Substituted { content: c, .. } => {
                c.credits
            }
            EffectiveContent::Unresolved { credits, .. } => *credits,
        }
    }

    /// Code if resolved, otherwise the placeholder label.
    #[must_use]
    pub fn display_code(&self) -> &str {
        match &self.content {
            EffectiveContent::Fixed(c) | EffectiveContent::Substituted { content: c, .. } => {
                &c.code
            }
            EffectiveContent::Unresolved { label, .. } => label,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self.content, EffectiveContent::Unresolved { .. })
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Builds Effective Course Lists.
pub struct Resolver;

impl Resolver {
    /// Resolve every slot against the selections.
    ///
    /// Output has exactly one entry per input slot, in input order, with
    /// `id` equal to the slot id.
    pub fn resolve<'a, I>(
        catalog: &Catalog,
        slots: I,
        selections: &Selections,
    ) -> Vec<EffectiveCourse>
    where
        I: IntoIterator<Item = &'a Slot>,
    {
        slots
            .into_iter()
            .map(|slot| Self::resolve_slot(catalog, slot, selections))
            .collect()
    }

    /// Resolve a single slot.
    #[must_use]
    pub fn resolve_slot(
        catalog: &Catalog,
        slot: &Slot,
        selections: &Selections,
    ) -> EffectiveCourse {
        let content = match slot {
            Slot::Core(course) => EffectiveContent::Fixed(course.content()),
            Slot::Elective(elective) => {
                let chosen = selections.choice(&elective.id).and_then(|option_id| {
                    let found = elective.option(option_id);
                    if found.is_none() {
                        tracing::debug!(
                            slot = %elective.id,
                            option = %option_id,
                            "stale elective choice, showing placeholder"
                        );
                    }
                    found
                });
                match chosen {
                    Some(option) => EffectiveContent::Substituted {
                        original_id: option.id.clone(),
                        content: option.content(),
                    },
                    None => EffectiveContent::Unresolved {
                        label: elective.label.clone(),
                        credits: elective.credits,
                    },
                }
            }
            Slot::Minor(track_slot) => {
                Self::resolve_track_slot(catalog, TrackKind::Minor, track_slot, selections)
            }
            Slot::Honors(track_slot) => {
                Self::resolve_track_slot(catalog, TrackKind::Honors, track_slot, selections)
            }
        };

        EffectiveCourse {
            id: slot.id().clone(),
            kind: slot.kind(),
            content,
        }
    }

    fn resolve_track_slot(
        catalog: &Catalog,
        kind: TrackKind,
        slot: &TrackSlot,
        selections: &Selections,
    ) -> EffectiveContent {
        let placeholder = || EffectiveContent::Unresolved {
            label: slot
                .label
                .clone()
                .unwrap_or_else(|| track_slot_label(kind, slot.index)),
            credits: 0,
        };

        let (Some(track_id), Some(index)) = (selections.track(kind), slot.index) else {
            return placeholder();
        };

        let Some(track) = catalog.track(kind, track_id) else {
            tracing::debug!(slot = %slot.id, track = %track_id, "unknown active {kind}");
            return placeholder();
        };

        match track.course_at(index) {
            Some(course) => EffectiveContent::Substituted {
                original_id: course.id.clone(),
                content: course.content(),
            },
            None => {
                tracing::warn!(
                    slot = %slot.id,
                    track = %track.id,
                    index,
                    course_count = track.courses.len(),
                    "{kind} slot index out of range, showing placeholder"
                );
                placeholder()
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
