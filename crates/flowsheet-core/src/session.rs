//! # Session Module
//!
//! The single controller of one user's flowsheet: open program, selection
//! state and the active-slot inputs (hover and focus).
//!
//! - The catalog is shared read-only (`Arc<Catalog>`)
//! - Opening a program discards every selection and the active slot
//! - Every derived output is recomputed from Catalog + Selections on demand;
//!   [`Session::view`] computes all of them from one effective list so a
//!   host never renders a mix of two states

use crate::catalog::{Catalog, Program};
use crate::conflict::ConflictEngine;
use crate::formats::SelectionSnapshot;
use crate::linkage::Linkage;
use crate::metrics::ProgramMetrics;
use crate::relations::{self, Connection, Relationships};
use crate::resolver::{EffectiveCourse, Resolver};
use crate::status::{self, CourseStatus};
use crate::{CourseId, FlowsheetError, ProgramId, Selections, SlotId, TrackId, TrackKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

// =============================================================================
// VIEW
// =============================================================================

/// One slot as rendered: its effective content and display state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseView {
    pub semester_id: String,
    pub course: EffectiveCourse,
    pub status: CourseStatus,
}

/// Every output of the engine for the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowsheetView {
    pub program: ProgramId,
    pub program_name: String,
    pub version: u64,
    pub active_slot: Option<SlotId>,
    pub minor: Option<TrackId>,
    pub honors: Option<TrackId>,
    pub courses: Vec<CourseView>,
    pub taken: BTreeSet<CourseId>,
    pub disabled_minors: BTreeSet<TrackId>,
    pub disabled_honors: BTreeSet<TrackId>,
    pub disabled_options: BTreeSet<CourseId>,
    pub relationships: Relationships,
    pub connections: Vec<Connection>,
    pub metrics: ProgramMetrics,
}

// =============================================================================
// SESSION
// =============================================================================

#[derive(Debug, Clone)]
pub struct Session {
    catalog: Arc<Catalog>,
    program: Option<ProgramId>,
    selections: Selections,
    hovered: Option<SlotId>,
    focused: Option<SlotId>,
}

impl Session {
    /// Create a session with no program open.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            program: None,
            selections: Selections::new(),
            hovered: None,
            focused: None,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn program_id(&self) -> Option<&ProgramId> {
        self.program.as_ref()
    }

    /// The open program, if any.
    #[must_use]
    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref().and_then(|id| self.catalog.program(id))
    }

    /// The open program, or `NoProgramOpen`.
    pub fn require_program(&self) -> Result<&Program, FlowsheetError> {
        self.program().ok_or(FlowsheetError::NoProgramOpen)
    }

    #[must_use]
    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Switch to another program, discarding all selection and active-slot
    /// state. Reopening the current program also resets.
    pub fn open_program(&mut self, id: &ProgramId) -> Result<(), FlowsheetError> {
        self.catalog.require_program(id)?;
        self.program = Some(id.clone());
        self.selections.reset();
        self.hovered = None;
        self.focused = None;
        tracing::info!(program = %id, "program opened");
        Ok(())
    }

    /// Choose an elective option (and its linked pair). Returns whether the
    /// choice was applied.
    ///
    /// An option in [`Session::disabled_options`] is refused; the slot's own
    /// current selection is never in that set, so re-choosing it is allowed.
    pub fn apply_choice(
        &mut self,
        slot: &SlotId,
        option: &CourseId,
    ) -> Result<bool, FlowsheetError> {
        let Some(id) = &self.program else {
            return Err(FlowsheetError::NoProgramOpen);
        };
        let program = self.catalog.require_program(id)?;
        if self.disabled_options().contains(option) {
            tracing::debug!(slot = %slot, option = %option, "disabled option refused");
            return Ok(false);
        }
        Ok(Linkage::apply_choice(program, slot, option, &mut self.selections))
    }

    /// Clear the choice of one elective slot.
    pub fn clear_choice(&mut self, slot: &SlotId) -> Result<bool, FlowsheetError> {
        self.require_program()?;
        Ok(self.selections.clear_choice(slot))
    }

    /// Set or clear the active track of one kind.
    ///
    /// Unknown ids are rejected, and so are tracks disabled by the taken set
    /// unless the track is already the active one. Clearing always applies.
    pub fn select_track(
        &mut self,
        kind: TrackKind,
        id: Option<TrackId>,
    ) -> Result<bool, FlowsheetError> {
        self.require_program()?;
        if let Some(track_id) = &id {
            if self.catalog.track(kind, track_id).is_none() {
                tracing::debug!(track = %track_id, "unknown {kind} rejected");
                return Ok(false);
            }
            let current = self.selections.track(kind) == Some(track_id);
            if !current && self.disabled_tracks(kind).contains(track_id) {
                tracing::debug!(track = %track_id, "disabled {kind} refused");
                return Ok(false);
            }
        }
        self.selections.set_track(kind, id);
        Ok(true)
    }

    pub fn select_minor(&mut self, id: Option<TrackId>) -> Result<bool, FlowsheetError> {
        self.select_track(TrackKind::Minor, id)
    }

    pub fn select_honors(&mut self, id: Option<TrackId>) -> Result<bool, FlowsheetError> {
        self.select_track(TrackKind::Honors, id)
    }

    /// Drop every choice but keep the program open.
    pub fn reset_selections(&mut self) {
        self.selections.reset();
    }

    /// Set the hovered slot (`None` when the pointer leaves).
    pub fn hover(&mut self, slot: Option<SlotId>) {
        self.hovered = slot;
    }

    /// Focus a slot; focusing the focused slot again clears it.
    pub fn toggle_focus(&mut self, slot: SlotId) {
        if self.focused.as_ref() == Some(&slot) {
            self.focused = None;
        } else {
            self.focused = Some(slot);
        }
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    /// Hovered slot if any, else the focused slot.
    #[must_use]
    pub fn active_slot(&self) -> Option<&SlotId> {
        self.hovered.as_ref().or(self.focused.as_ref())
    }

    // =========================================================================
    // DERIVED OUTPUTS
    // =========================================================================

    /// The Effective Course List of the open program (empty if none).
    #[must_use]
    pub fn effective_courses(&self) -> Vec<EffectiveCourse> {
        match self.program() {
            Some(program) => Resolver::resolve(&self.catalog, program.slots(), &self.selections),
            None => Vec::new(),
        }
    }

    #[must_use]
    pub fn taken_base_set(&self) -> BTreeSet<CourseId> {
        match self.program() {
            Some(program) => ConflictEngine::taken_base_set(program.slots(), &self.selections),
            None => BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn disabled_minors(&self) -> BTreeSet<TrackId> {
        ConflictEngine::disabled_minors(&self.catalog.minors, &self.taken_base_set())
    }

    #[must_use]
    pub fn disabled_honors(&self) -> BTreeSet<TrackId> {
        ConflictEngine::disabled_honors(&self.catalog.honors, &self.taken_base_set())
    }

    fn disabled_tracks(&self, kind: TrackKind) -> BTreeSet<TrackId> {
        match kind {
            TrackKind::Minor => self.disabled_minors(),
            TrackKind::Honors => self.disabled_honors(),
        }
    }

    #[must_use]
    pub fn disabled_options(&self) -> BTreeSet<CourseId> {
        match self.program() {
            Some(program) => ConflictEngine::disabled_options(
                &self.catalog,
                program.slots(),
                &self.taken_base_set(),
                &self.selections,
            ),
            None => BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn relationships(&self) -> Relationships {
        relations::relationships(self.active_slot(), &self.effective_courses())
    }

    /// Display state of one slot.
    #[must_use]
    pub fn status_of(&self, slot: &SlotId) -> CourseStatus {
        let effective = self.effective_courses();
        let rel = relations::relationships(self.active_slot(), &effective);
        effective
            .iter()
            .find(|c| &c.id == slot)
            .map(|c| status::classify(c, self.active_slot(), &rel))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn connections(&self) -> Vec<Connection> {
        let effective = self.effective_courses();
        let rel = relations::relationships(self.active_slot(), &effective);
        relations::connections(self.active_slot(), &rel, &effective)
    }

    pub fn metrics(&self) -> Result<ProgramMetrics, FlowsheetError> {
        let program = self.require_program()?;
        Ok(ProgramMetrics::compute(program, &self.effective_courses()))
    }

    /// All outputs from a single resolution pass.
    pub fn view(&self) -> Result<FlowsheetView, FlowsheetError> {
        let program = self.require_program()?;
        let active = self.active_slot();

        let effective = Resolver::resolve(&self.catalog, program.slots(), &self.selections);
        let taken = ConflictEngine::taken_base_set(program.slots(), &self.selections);
        let rel = relations::relationships(active, &effective);

        let semester_ids = program
            .semesters()
            .flat_map(|s| std::iter::repeat_n(s.id.as_str(), s.slots.len()));
        let courses = effective
            .iter()
            .zip(semester_ids)
            .map(|(course, semester_id)| CourseView {
                semester_id: semester_id.to_string(),
                course: course.clone(),
                status: status::classify(course, active, &rel),
            })
            .collect();

        Ok(FlowsheetView {
            program: program.id.clone(),
            program_name: program.name.clone(),
            version: self.selections.version(),
            active_slot: active.cloned(),
            minor: self.selections.minor().cloned(),
            honors: self.selections.honors().cloned(),
            courses,
            disabled_minors: ConflictEngine::disabled_minors(&self.catalog.minors, &taken),
            disabled_honors: ConflictEngine::disabled_honors(&self.catalog.honors, &taken),
            disabled_options: ConflictEngine::disabled_options(
                &self.catalog,
                program.slots(),
                &taken,
                &self.selections,
            ),
            connections: relations::connections(active, &rel, &effective),
            metrics: ProgramMetrics::compute(program, &effective),
            relationships: rel,
            taken,
        })
    }

    // =========================================================================
    // SNAPSHOTS
    // =========================================================================

    /// Capture the open program and its selections.
    #[must_use]
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            program: self.program.clone(),
            selections: self.selections.clone(),
        }
    }

    /// Replace program and selections with a snapshot's. The active slot is
    /// cleared.
    pub fn restore(&mut self, snapshot: SelectionSnapshot) -> Result<(), FlowsheetError> {
        if let Some(id) = &snapshot.program {
            self.catalog.require_program(id)?;
        }
        self.program = snapshot.program;
        self.selections = snapshot.selections;
        self.hovered = None;
        self.focused = None;
        tracing::debug!(version = self.selections.version(), "selections restored");
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        Course, CourseOption, ElectiveSlot, Semester, Slot, Track, TrackSlot, Year,
    };

    fn catalog() -> Arc<Catalog> {
        let program = Program {
            id: ProgramId::from("p"),
            name: "Program".to_string(),
            department: "Dept".to_string(),
            years: vec![Year {
                id: "y1".to_string(),
                label: "Year 1".to_string(),
                semesters: vec![Semester {
                    id: "s1".to_string(),
                    label: "Fall".to_string(),
                    slots: vec![
                        Slot::Core(Course::new("A", "A 100", "Alpha", 3)),
                        Slot::Core(Course::new("B", "B 200", "Beta", 3).with_prereqs(["A"])),
                        Slot::Elective(ElectiveSlot {
                            id: CourseId::from("E1"),
                            label: "Elective".to_string(),
                            credits: 3,
                            options: vec![CourseOption::new("O1", "O 1", "Option", 3)],
                            linked_slot_id: None,
                        }),
                        Slot::Minor(TrackSlot {
                            id: CourseId::from("MS1"),
                            index: Some(0),
                            label: None,
                        }),
                    ],
                }],
            }],
        };
        Arc::new(Catalog {
            programs: vec![program],
            minors: vec![Track {
                id: TrackId::from("sp"),
                name: "Signals".to_string(),
                department: "EE".to_string(),
                courses: vec![CourseOption::new("M1", "EL 1", "Signals", 2)],
            }],
            honors: Vec::new(),
        })
    }

    fn open_session() -> Session {
        let mut session = Session::new(catalog());
        session.open_program(&ProgramId::from("p")).expect("open");
        session
    }

    #[test]
    fn unknown_program_is_an_error() {
        let mut session = Session::new(catalog());
        let err = session
            .open_program(&ProgramId::from("nope"))
            .expect_err("missing");
        assert!(matches!(err, FlowsheetError::ProgramNotFound(_)));
        assert!(session.program().is_none());
    }

    #[test]
    fn choices_need_an_open_program() {
        let mut session = Session::new(catalog());
        let err = session
            .apply_choice(&CourseId::from("E1"), &CourseId::from("O1"))
            .expect_err("no program");
        assert!(matches!(err, FlowsheetError::NoProgramOpen));
        assert!(session.view().is_err());
        assert!(session.effective_courses().is_empty());
    }

    #[test]
    fn reopening_resets_everything() {
        let mut session = open_session();
        session
            .apply_choice(&CourseId::from("E1"), &CourseId::from("O1"))
            .expect("choice");
        session.select_minor(Some(TrackId::from("sp"))).expect("minor");
        session.toggle_focus(CourseId::from("A"));
        session.hover(Some(CourseId::from("B")));

        session.open_program(&ProgramId::from("p")).expect("reopen");

        assert!(session.selections().is_empty());
        assert!(session.active_slot().is_none());
        assert!(session.effective_courses().iter().skip(2).all(|c| !c.is_resolved()));
    }

    #[test]
    fn reset_keeps_program_and_focus() {
        let mut session = open_session();
        session
            .apply_choice(&CourseId::from("E1"), &CourseId::from("O1"))
            .expect("choice");
        session.toggle_focus(CourseId::from("A"));

        session.reset_selections();

        assert!(session.selections().is_empty());
        assert_eq!(session.program_id(), Some(&ProgramId::from("p")));
        assert_eq!(session.active_slot(), Some(&CourseId::from("A")));
    }

    #[test]
    fn unknown_minor_is_rejected() {
        let mut session = open_session();
        assert!(!session.select_minor(Some(TrackId::from("ghost"))).expect("call"));
        assert!(session.select_minor(Some(TrackId::from("sp"))).expect("call"));
        assert!(session.select_minor(None).expect("call"));
        assert!(session.selections().minor().is_none());
    }

    #[test]
    fn hover_wins_over_focus() {
        let mut session = open_session();
        session.toggle_focus(CourseId::from("A"));
        assert_eq!(session.active_slot(), Some(&CourseId::from("A")));

        session.hover(Some(CourseId::from("B")));
        assert_eq!(session.active_slot(), Some(&CourseId::from("B")));

        session.hover(None);
        session.toggle_focus(CourseId::from("A"));
        assert!(session.active_slot().is_none());
    }

    #[test]
    fn statuses_follow_active_slot() {
        let mut session = open_session();
        session.toggle_focus(CourseId::from("B"));

        assert_eq!(session.status_of(&CourseId::from("B")), CourseStatus::Active);
        assert_eq!(session.status_of(&CourseId::from("A")), CourseStatus::Prereq);
        assert_eq!(session.status_of(&CourseId::from("E1")), CourseStatus::Default);
        assert_eq!(session.connections().len(), 1);
    }

    #[test]
    fn view_matches_individual_outputs() {
        let mut session = open_session();
        session.select_minor(Some(TrackId::from("sp"))).expect("minor");
        session.toggle_focus(CourseId::from("A"));

        let view = session.view().expect("view");

        assert_eq!(view.courses.len(), 4);
        assert!(view.courses.iter().all(|c| c.semester_id == "s1"));
        assert_eq!(view.taken, session.taken_base_set());
        assert_eq!(view.disabled_options, session.disabled_options());
        assert_eq!(view.disabled_minors, session.disabled_minors());
        assert_eq!(view.relationships, session.relationships());
        assert_eq!(view.metrics, session.metrics().expect("metrics"));
        assert_eq!(view.minor, Some(TrackId::from("sp")));
    }

    #[test]
    fn snapshot_restores_selections() {
        let mut session = open_session();
        session
            .apply_choice(&CourseId::from("E1"), &CourseId::from("O1"))
            .expect("choice");
        let snapshot = session.snapshot();

        let mut other = Session::new(catalog());
        other.restore(snapshot).expect("restore");

        assert_eq!(other.effective_courses(), session.effective_courses());
        assert_eq!(other.selections(), session.selections());
    }

    #[test]
    fn restore_rejects_unknown_program() {
        let mut session = Session::new(catalog());
        let snapshot = SelectionSnapshot {
            program: Some(ProgramId::from("gone")),
            selections: Selections::new(),
        };
        assert!(session.restore(snapshot).is_err());
    }
}
