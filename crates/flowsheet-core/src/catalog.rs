//! # Catalog Store
//!
//! The static, read-only definition of every program, its grid of slots, and
//! the global Minor and Honors pools.
//!
//! A catalog is parsed once by the host (TOML or JSON, see `apps/flowsheet`),
//! checked by [`crate::validation::CatalogValidator`], then shared behind an
//! `Arc` for the process lifetime. Nothing in the core mutates it.
//!
//! ## Document Shape
//!
//! ```toml
//! [[programs]]
//! id = "cse-bs"
//! name = "Computer Science BS"
//! department = "Computer Science & Engineering"
//!
//! [[programs.years]]
//! id = "y1"
//! label = "Year 1"
//!
//! [[programs.years.semesters]]
//! id = "y1s1"
//! label = "Fall"
//!
//! [[programs.years.semesters.slots]]
//! kind = "core"
//! id = "c1"
//! code = "MTH 141"
//! title = "Calculus I"
//! credits = 4
//! ```

use crate::primitives::MIN_GRID_ROWS;
use crate::{CourseId, FlowsheetError, ProgramId, SlotId, SlotKind, TrackId, TrackKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// COURSE CONTENT
// =============================================================================

/// The displayable payload of a course: what a slot shows once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseContent {
    pub code: String,
    pub title: String,
    pub credits: u32,
    /// Ids of courses (or slots) this course depends on.
    pub prereqs: Vec<CourseId>,
}

/// A fixed course, used as the payload of a Core slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub title: String,
    pub credits: u32,
    #[serde(default)]
    pub prereqs: Vec<CourseId>,
}

impl Course {
    /// Create a course with no prerequisites.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        title: impl Into<String>,
        credits: u32,
    ) -> Self {
        Self {
            id: CourseId::new(id),
            code: code.into(),
            title: title.into(),
            credits,
            prereqs: Vec::new(),
        }
    }

    /// Builder-style prerequisite list.
    #[must_use]
    pub fn with_prereqs<I, S>(mut self, prereqs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prereqs = prereqs.into_iter().map(CourseId::new).collect();
        self
    }

    /// Copy out the displayable content.
    #[must_use]
    pub fn content(&self) -> CourseContent {
        CourseContent {
            code: self.code.clone(),
            title: self.title.clone(),
            credits: self.credits,
            prereqs: self.prereqs.clone(),
        }
    }
}

/// A concrete, selectable course: an elective option or a track course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseOption {
    pub id: CourseId,
    pub code: String,
    pub title: String,
    pub credits: u32,
    #[serde(default)]
    pub prereqs: Vec<CourseId>,
    /// When chosen, forces this option into the slot's linked slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_option_id: Option<CourseId>,
    /// Courses this option conflicts with.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mutex_ids: Vec<CourseId>,
}

impl CourseOption {
    /// Create an option with no prerequisites, link or conflicts.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        title: impl Into<String>,
        credits: u32,
    ) -> Self {
        Self {
            id: CourseId::new(id),
            code: code.into(),
            title: title.into(),
            credits,
            prereqs: Vec::new(),
            linked_option_id: None,
            mutex_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_prereqs<I, S>(mut self, prereqs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prereqs = prereqs.into_iter().map(CourseId::new).collect();
        self
    }

    #[must_use]
    pub fn with_mutex<I, S>(mut self, mutex_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mutex_ids = mutex_ids.into_iter().map(CourseId::new).collect();
        self
    }

    #[must_use]
    pub fn linked_to(mut self, option_id: impl Into<String>) -> Self {
        self.linked_option_id = Some(CourseId::new(option_id));
        self
    }

    /// Copy out the displayable content.
    #[must_use]
    pub fn content(&self) -> CourseContent {
        CourseContent {
            code: self.code.clone(),
            title: self.title.clone(),
            credits: self.credits,
            prereqs: self.prereqs.clone(),
        }
    }
}

// =============================================================================
// SLOTS
// =============================================================================

/// An elective slot: one choice among an ordered list of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectiveSlot {
    pub id: SlotId,
    /// Placeholder text shown while nothing is chosen.
    pub label: String,
    /// Placeholder credits shown while nothing is chosen.
    #[serde(default)]
    pub credits: u32,
    pub options: Vec<CourseOption>,
    /// Slot that receives an option's `linked_option_id` when one is chosen here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_slot_id: Option<SlotId>,
}

impl ElectiveSlot {
    /// Find a declared option by id.
    #[must_use]
    pub fn option(&self, id: &CourseId) -> Option<&CourseOption> {
        self.options.iter().find(|o| &o.id == id)
    }
}

/// A slot bound by position to the active Minor or Honors track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSlot {
    pub id: SlotId,
    /// Position in the active track's course list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Placeholder text; generated from `index` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A position in the curriculum grid.
///
/// The slot id never changes, whatever content is substituted into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Slot {
    Core(Course),
    Elective(ElectiveSlot),
    Minor(TrackSlot),
    Honors(TrackSlot),
}

impl Slot {
    /// The stable slot id.
    #[must_use]
    pub fn id(&self) -> &SlotId {
        match self {
            Slot::Core(c) => &c.id,
            Slot::Elective(e) => &e.id,
            Slot::Minor(t) | Slot::Honors(t) => &t.id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> SlotKind {
        match self {
            Slot::Core(_) => SlotKind::Core,
            Slot::Elective(_) => SlotKind::Elective,
            Slot::Minor(_) => SlotKind::Minor,
            Slot::Honors(_) => SlotKind::Honors,
        }
    }

    #[must_use]
    pub fn as_elective(&self) -> Option<&ElectiveSlot> {
        match self {
            Slot::Elective(e) => Some(e),
            _ => None,
        }
    }

    /// The track binding of a Minor/Honors slot.
    #[must_use]
    pub fn as_track_slot(&self) -> Option<(TrackKind, &TrackSlot)> {
        match self {
            Slot::Minor(t) => Some((TrackKind::Minor, t)),
            Slot::Honors(t) => Some((TrackKind::Honors, t)),
            _ => None,
        }
    }
}

// =============================================================================
// TRACKS
// =============================================================================

/// A Minor or Honors track: a named, ordered bundle of courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    #[serde(alias = "dept")]
    pub department: String,
    pub courses: Vec<CourseOption>,
}

impl Track {
    /// The course bound to a slot at `index`, if in range.
    #[must_use]
    pub fn course_at(&self, index: usize) -> Option<&CourseOption> {
        self.courses.get(index)
    }

    #[must_use]
    pub fn contains(&self, id: &CourseId) -> bool {
        self.courses.iter().any(|c| &c.id == id)
    }
}

// =============================================================================
// PROGRAM TREE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(alias = "courses")]
    pub slots: Vec<Slot>,
}

impl Semester {
    /// Sum of the credits of the core courses in this semester.
    #[must_use]
    pub fn core_credits(&self) -> u32 {
        self.slots
            .iter()
            .filter_map(|s| match s {
                Slot::Core(c) => Some(c.credits),
                _ => None,
            })
            .fold(0u32, u32::saturating_add)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Year {
    pub id: String,
    pub label: String,
    pub semesters: Vec<Semester>,
}

/// A degree program: years, semesters and the slots in each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
    pub department: String,
    pub years: Vec<Year>,
}

impl Program {
    /// Semesters in grid order (years in order, semesters in order).
    pub fn semesters(&self) -> impl Iterator<Item = &Semester> {
        self.years.iter().flat_map(|y| y.semesters.iter())
    }

    /// All slots in grid order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.semesters().flat_map(|s| s.slots.iter())
    }

    /// Find a slot by id.
    #[must_use]
    pub fn slot(&self, id: &SlotId) -> Option<&Slot> {
        self.slots().find(|s| s.id() == id)
    }

    /// Number of slots in the grid.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.semesters().map(|s| s.slots.len()).sum()
    }

    /// Longest semester column, never fewer than [`MIN_GRID_ROWS`].
    #[must_use]
    pub fn max_rows(&self) -> usize {
        self.semesters()
            .map(|s| s.slots.len())
            .max()
            .unwrap_or(0)
            .max(MIN_GRID_ROWS)
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// The complete, immutable catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub programs: Vec<Program>,
    #[serde(default)]
    pub minors: Vec<Track>,
    #[serde(default)]
    pub honors: Vec<Track>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn program(&self, id: &ProgramId) -> Option<&Program> {
        self.programs.iter().find(|p| &p.id == id)
    }

    /// Lookup that surfaces a miss as `ProgramNotFound`.
    pub fn require_program(&self, id: &ProgramId) -> Result<&Program, FlowsheetError> {
        self.program(id)
            .ok_or_else(|| FlowsheetError::ProgramNotFound(id.clone()))
    }

    /// The pool for one track kind.
    #[must_use]
    pub fn tracks(&self, kind: TrackKind) -> &[Track] {
        match kind {
            TrackKind::Minor => &self.minors,
            TrackKind::Honors => &self.honors,
        }
    }

    #[must_use]
    pub fn track(&self, kind: TrackKind, id: &TrackId) -> Option<&Track> {
        self.tracks(kind).iter().find(|t| &t.id == id)
    }

    /// Programs grouped by department, departments sorted by name.
    #[must_use]
    pub fn programs_by_department(&self) -> BTreeMap<&str, Vec<&Program>> {
        let mut grouped: BTreeMap<&str, Vec<&Program>> = BTreeMap::new();
        for program in &self.programs {
            grouped
                .entry(program.department.as_str())
                .or_default()
                .push(program);
        }
        grouped
    }
}

// =============================================================================
// TESTS
// =============================================================================
