//! Per-slot display state relative to the active slot.

use crate::relations::Relationships;
use crate::resolver::EffectiveCourse;
use crate::SlotId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    #[default]
    Default,
    Active,
    Prereq,
    Postreq,
}

impl CourseStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Default => "default",
            CourseStatus::Active => "active",
            CourseStatus::Prereq => "prereq",
            CourseStatus::Postreq => "postreq",
        }
    }
}

/// Classify one effective course. Precedence: Active > Prereq > Postreq.
#[must_use]
pub fn classify(
    course: &EffectiveCourse,
    active: Option<&SlotId>,
    rel: &Relationships,
) -> CourseStatus {
    let Some(active) = active else {
        return CourseStatus::Default;
    };

    if &course.id == active {
        CourseStatus::Active
    } else if rel.prereq_ids.contains(&course.id)
        || course
            .original_id()
            .is_some_and(|o| rel.prereq_ids.contains(o))
    {
        CourseStatus::Prereq
    } else if rel.postreq_ids.contains(&course.id) {
        CourseStatus::Postreq
    } else {
        CourseStatus::Default
    }
}
