//! # Program Metrics
//!
//! Integer-only summary of an Effective Course List: how much of the grid is
//! resolved and how many credits each semester carries right now.

use crate::SlotKind;
use crate::catalog::Program;
use crate::labels::semester_label;
use crate::resolver::EffectiveCourse;
use serde::{Deserialize, Serialize};

/// Credit total for one semester column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterCredits {
    pub semester_id: String,
    /// Catalog label, or "Semester N" in roman numerals when it has none.
    pub label: String,
    pub credits: u32,
    /// Credits fixed by core courses, independent of any choice.
    pub core_credits: u32,
    /// Slots in this semester still showing a placeholder.
    pub unresolved: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramMetrics {
    pub slot_count: usize,
    pub core_count: usize,
    pub elective_count: usize,
    pub minor_count: usize,
    pub honors_count: usize,
    pub resolved_count: usize,
    pub unresolved_count: usize,
    /// Sum of displayed credits, placeholders included.
    pub total_credits: u32,
    /// Rows needed to lay out the grid.
    pub grid_rows: usize,
    pub semesters: Vec<SemesterCredits>,
}

impl ProgramMetrics {
    /// Compute metrics for `effective`, which must be the list resolved from
    /// `program.slots()` (same length, grid order).
    #[must_use]
    pub fn compute(program: &Program, effective: &[EffectiveCourse]) -> Self {
        let mut metrics = Self {
            slot_count: effective.len(),
            grid_rows: program.max_rows(),
            ..Self::default()
        };

        for course in effective {
            match course.kind {
                SlotKind::Core => metrics.core_count += 1,
                SlotKind::Elective => metrics.elective_count += 1,
                SlotKind::Minor => metrics.minor_count += 1,
                SlotKind::Honors => metrics.honors_count += 1,
            }
            if course.is_resolved() {
                metrics.resolved_count += 1;
            }
            metrics.total_credits = metrics.total_credits.saturating_add(course.credits());
        }
        metrics.unresolved_count = metrics.slot_count - metrics.resolved_count;

        let mut remaining = effective;
        for (ordinal, semester) in program.semesters().enumerate() {
            let take = semester.slots.len().min(remaining.len());
            let (column, rest) = remaining.split_at(take);
            remaining = rest;

            metrics.semesters.push(SemesterCredits {
                semester_id: semester.id.clone(),
                label: if semester.label.is_empty() {
                    semester_label(ordinal + 1)
                } else {
                    semester.label.clone()
                },
                core_credits: semester.core_credits(),
                credits: column
                    .iter()
                    .map(EffectiveCourse::credits)
                    .fold(0u32, u32::saturating_add),
                unresolved: column.iter().filter(|c| !c.is_resolved()).count(),
            });
        }

        metrics
    }
}
