//! # Linkage Propagator
//!
//! Applies an elective choice, plus the paired choice it forces in a linked
//! slot (lecture/laboratory pairs), as a single selection transition.

use crate::catalog::Program;
use crate::{CourseId, Selections, SlotId};

/// Applies elective choices to a selection state.
pub struct Linkage;

impl Linkage {
    /// Choose `option_id` for `slot_id`.
    ///
    /// Returns `false` without touching `selections` when the slot is not an
    /// elective of `program` or the option is not one of its options. A
    /// linked write whose target slot is missing (or not an elective) is
    /// skipped; the primary choice still applies.
    pub fn apply_choice(
        program: &Program,
        slot_id: &SlotId,
        option_id: &CourseId,
        selections: &mut Selections,
    ) -> bool {
        let updates = match Self::plan(program, slot_id, option_id) {
            Some(updates) => updates,
            None => {
                tracing::debug!(slot = %slot_id, option = %option_id, "choice rejected");
                return false;
            }
        };

        selections.apply_choices(updates);
        true
    }

    /// The writes a choice would produce, primary first.
    #[must_use]
    pub fn plan(
        program: &Program,
        slot_id: &SlotId,
        option_id: &CourseId,
    ) -> Option<Vec<(SlotId, CourseId)>> {
        let elective = program.slot(slot_id)?.as_elective()?;
        let option = elective.option(option_id)?;

        let mut updates = vec![(slot_id.clone(), option_id.clone())];

        if let (Some(linked_option), Some(linked_slot)) =
            (&option.linked_option_id, &elective.linked_slot_id)
        {
            let target = program.slot(linked_slot).and_then(|s| s.as_elective());
            match target {
                Some(_) => updates.push((linked_slot.clone(), linked_option.clone())),
                None => tracing::warn!(
                    slot = %slot_id,
                    linked_slot = %linked_slot,
                    "linked slot missing, skipping paired choice"
                ),
            }
        }

        Some(updates)
    }
}
