//! # Scenario Tier Tests (T0-T4)
//!
//! End-to-end behaviour of a session over a small two-semester catalog.
//!
//! ## Tiers
//! - T0: Identity and substitution
//! - T1: Linkage
//! - T2: Conflicts
//! - T3: Relationships and status
//! - T4: Reset and snapshots

#![allow(clippy::panic)]

use flowsheet_core::{
    Catalog, CatalogValidator, Course, CourseId, CourseOption, CourseStatus, EffectiveContent,
    ElectiveSlot, FlowsheetError, Program, ProgramId, Semester, Session, Slot, Track, TrackId,
    TrackSlot, Year, snapshot_from_bytes, snapshot_to_bytes,
};
use std::sync::Arc;

// =============================================================================
// FIXTURE
// =============================================================================

fn id(s: &str) -> CourseId {
    CourseId::from(s)
}

fn elective(slot: &str, linked: Option<&str>, options: Vec<CourseOption>) -> Slot {
    Slot::Elective(ElectiveSlot {
        id: id(slot),
        label: "Professional Elective".to_string(),
        credits: 3,
        options,
        linked_slot_id: linked.map(id),
    })
}

fn track_slot(slot: &str, index: usize) -> TrackSlot {
    TrackSlot {
        id: id(slot),
        index: Some(index),
        label: None,
    }
}

/// Two semesters:
/// - Fall: core A, elective lecture LEC (linked to LAB), elective E1, minor MS1
/// - Spring: core B (requires A), elective lab LAB, elective E2, minor MS2, honors HS1
fn catalog() -> Arc<Catalog> {
    let fall = Semester {
        id: "y2s1".to_string(),
        label: "Semester III".to_string(),
        slots: vec![
            Slot::Core(Course::new("A", "CS 201", "Data Structures", 4)),
            elective(
                "LEC",
                Some("LAB"),
                vec![
                    CourseOption::new("VLSI", "EL 301", "VLSI Design", 3).linked_to("VLSI-L"),
                    CourseOption::new("EMB", "EL 302", "Embedded Systems", 3).linked_to("EMB-L"),
                ],
            ),
            elective(
                "E1",
                None,
                vec![
                    CourseOption::new("X", "CS 310", "Compilers", 3).with_mutex(["Y"]),
                    CourseOption::new("Z", "CS 311", "Databases", 3),
                ],
            ),
            Slot::Minor(track_slot("MS1", 0)),
        ],
    };
    let spring = Semester {
        id: "y2s2".to_string(),
        label: "Semester IV".to_string(),
        slots: vec![
            Slot::Core(Course::new("B", "CS 202", "Algorithms", 4).with_prereqs(["A"])),
            elective(
                "LAB",
                None,
                vec![
                    CourseOption::new("VLSI-L", "EL 301L", "VLSI Lab", 1),
                    CourseOption::new("EMB-L", "EL 302L", "Embedded Lab", 1),
                ],
            ),
            elective(
                "E2",
                None,
                vec![
                    CourseOption::new("Y", "CS 320", "Interpreters", 3),
                    CourseOption::new("W", "CS 321", "Networks", 3).with_prereqs(["E1"]),
                ],
            ),
            Slot::Minor(track_slot("MS2", 1)),
            Slot::Honors(track_slot("HS1", 0)),
        ],
    };

    Arc::new(Catalog {
        programs: vec![Program {
            id: ProgramId::from("cse"),
            name: "Computer Engineering".to_string(),
            department: "Computer Engineering".to_string(),
            years: vec![Year {
                id: "y2".to_string(),
                label: "Year 2".to_string(),
                semesters: vec![fall, spring],
            }],
        }],
        minors: vec![
            Track {
                id: TrackId::from("sp"),
                name: "Signal Processing".to_string(),
                department: "Electronics".to_string(),
                courses: vec![
                    CourseOption::new("R5EL2203T", "EL 2203", "Signals and Systems", 3),
                    CourseOption::new("R5EL2204T", "EL 2204", "Digital Signal Processing", 3)
                        .with_prereqs(["R5EL2203T"]),
                ],
            },
            Track {
                id: TrackId::from("ds"),
                name: "Data Science".to_string(),
                department: "Computer Engineering".to_string(),
                courses: vec![
                    CourseOption::new("DS1", "DS 101", "Statistics", 3),
                    CourseOption::new("DS2", "DS 102", "Machine Learning", 3).with_mutex(["Z"]),
                ],
            },
        ],
        honors: vec![Track {
            id: TrackId::from("ai"),
            name: "Artificial Intelligence".to_string(),
            department: "Computer Engineering".to_string(),
            courses: vec![CourseOption::new("AI1", "AI 401", "Search", 4).with_mutex(["Y"])],
        }],
    })
}

fn session() -> Session {
    let mut session = Session::new(catalog());
    session.open_program(&ProgramId::from("cse")).expect("open");
    session
}

// =============================================================================
// TIER T0: IDENTITY AND SUBSTITUTION
// =============================================================================

mod t0_identity {
    use super::*;

    /// T0.1: The fixture is a valid catalog.
    #[test]
    fn fixture_validates_cleanly() {
        let warnings = CatalogValidator::validate(&catalog()).expect("valid");
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    /// T0.2: Slot ids survive every substitution.
    #[test]
    fn slot_ids_never_change() {
        let mut s = session();
        let before: Vec<_> = s.effective_courses().into_iter().map(|c| c.id).collect();

        s.apply_choice(&id("E1"), &id("X")).expect("choice");
        s.select_minor(Some(TrackId::from("sp"))).expect("minor");
        s.select_honors(Some(TrackId::from("ai"))).expect("honors");

        let after: Vec<_> = s.effective_courses().into_iter().map(|c| c.id).collect();
        assert_eq!(before, after);
    }

    /// T0.3: Substituted content carries the option id.
    #[test]
    fn substitution_keeps_original_id() {
        let mut s = session();
        s.apply_choice(&id("E1"), &id("X")).expect("choice");

        let effective = s.effective_courses();
        let e1 = effective.iter().find(|c| c.id == id("E1")).expect("E1");
        match &e1.content {
            EffectiveContent::Substituted {
                original_id,
                content,
            } => {
                assert_eq!(original_id, &id("X"));
                assert_eq!(content.code, "CS 310");
            }
            other => panic!("expected substitution, got {other:?}"),
        }
    }

    /// T0.4: Unselected slots show placeholders with generated labels.
    #[test]
    fn placeholders_before_any_choice() {
        let s = session();
        let effective = s.effective_courses();
        let labels: Vec<_> = effective
            .iter()
            .filter(|c| !c.is_resolved())
            .map(|c| c.display_code().to_string())
            .collect();
        assert!(labels.contains(&"Minor Slot 1".to_string()));
        assert!(labels.contains(&"Minor Slot 2".to_string()));
        assert!(labels.contains(&"Honors I".to_string()));
    }
}

// =============================================================================
// TIER T1: LINKAGE
// =============================================================================

mod t1_linkage {
    use super::*;

    /// T1.1: Choosing a lecture fills its lab in the same transition.
    #[test]
    fn lecture_choice_fills_lab() {
        let mut s = session();
        let before = s.selections().version();

        assert!(s.apply_choice(&id("LEC"), &id("EMB")).expect("choice"));

        assert_eq!(s.selections().version(), before + 1);
        assert_eq!(s.selections().choice(&id("LEC")), Some(&id("EMB")));
        assert_eq!(s.selections().choice(&id("LAB")), Some(&id("EMB-L")));
    }

    /// T1.2: Switching the lecture switches the lab.
    #[test]
    fn switching_lecture_switches_lab() {
        let mut s = session();
        s.apply_choice(&id("LEC"), &id("EMB")).expect("choice");
        s.apply_choice(&id("LEC"), &id("VLSI")).expect("choice");
        assert_eq!(s.selections().choice(&id("LAB")), Some(&id("VLSI-L")));
    }

    /// T1.3: An option from another slot is rejected.
    #[test]
    fn foreign_option_is_rejected() {
        let mut s = session();
        assert!(!s.apply_choice(&id("E1"), &id("Y")).expect("call"));
        assert!(s.selections().choices().is_empty());
    }
}

// =============================================================================
// TIER T2: CONFLICTS
// =============================================================================

mod t2_conflicts {
    use super::*;

    /// T2.1: Selecting X disables Y in another slot, X stays selectable.
    #[test]
    fn mutex_across_elective_slots() {
        let mut s = session();
        s.apply_choice(&id("E1"), &id("X")).expect("choice");

        let disabled = s.disabled_options();
        assert!(disabled.contains(&id("Y")));
        assert!(!disabled.contains(&id("X")));
    }

    /// T2.2: The reverse selection disables X.
    #[test]
    fn mutex_is_symmetric() {
        let mut s = session();
        s.apply_choice(&id("E2"), &id("Y")).expect("choice");
        assert!(s.disabled_options().contains(&id("X")));
    }

    /// T2.3: A taken course disables a minor declaring a conflict with it.
    #[test]
    fn taken_course_disables_minor() {
        let mut s = session();
        assert!(s.disabled_minors().is_empty());

        s.apply_choice(&id("E1"), &id("Z")).expect("choice");
        let disabled = s.disabled_minors();
        assert!(disabled.contains(&TrackId::from("ds")));
        assert!(!disabled.contains(&TrackId::from("sp")));
    }

    /// T2.4: Taken courses and disabled honors use the same rule.
    #[test]
    fn taken_course_disables_honors() {
        let mut s = session();
        s.apply_choice(&id("E2"), &id("Y")).expect("choice");
        assert!(s.disabled_honors().contains(&TrackId::from("ai")));
    }

    /// T2.5: Active honors courses block conflicting elective options.
    #[test]
    fn active_honors_disables_options() {
        let mut s = session();
        s.select_honors(Some(TrackId::from("ai"))).expect("honors");
        assert!(s.disabled_options().contains(&id("Y")));
    }

    /// T2.6: The taken set ignores placeholders and track content.
    #[test]
    fn taken_set_is_pre_substitution() {
        let mut s = session();
        s.select_minor(Some(TrackId::from("sp"))).expect("minor");
        let taken: Vec<_> = s.taken_base_set().into_iter().collect();
        assert_eq!(taken, vec![id("A"), id("B")]);
    }

    /// T2.7: A disabled option cannot be committed in another slot.
    #[test]
    fn disabled_option_is_refused() {
        let mut s = session();
        s.apply_choice(&id("E1"), &id("X")).expect("choice");
        assert!(s.disabled_options().contains(&id("Y")));
        let before = s.selections().version();

        assert!(!s.apply_choice(&id("E2"), &id("Y")).expect("call"));

        assert_eq!(s.selections().version(), before);
        assert!(s.selections().choice(&id("E2")).is_none());
        assert!(!s.taken_base_set().contains(&id("Y")));
    }

    /// T2.8: The slot's own selection can be chosen again.
    #[test]
    fn own_selection_can_be_rechosen() {
        let mut s = session();
        s.apply_choice(&id("E2"), &id("Y")).expect("choice");
        assert!(s.apply_choice(&id("E2"), &id("Y")).expect("call"));
        assert!(s.apply_choice(&id("E2"), &id("W")).expect("call"));
    }

    /// T2.9: A minor overlapping the taken set cannot be activated.
    #[test]
    fn disabled_minor_is_refused() {
        let mut s = session();
        s.apply_choice(&id("E1"), &id("Z")).expect("choice");
        assert!(s.disabled_minors().contains(&TrackId::from("ds")));

        assert!(!s.select_minor(Some(TrackId::from("ds"))).expect("call"));

        assert!(s.selections().minor().is_none());
        assert!(s.select_minor(Some(TrackId::from("sp"))).expect("call"));
    }

    /// T2.10: A disabled honors track is refused the same way.
    #[test]
    fn disabled_honors_is_refused() {
        let mut s = session();
        s.apply_choice(&id("E2"), &id("Y")).expect("choice");

        assert!(!s.select_honors(Some(TrackId::from("ai"))).expect("call"));
        assert!(s.selections().honors().is_none());
    }

    /// T2.11: An active track blocks conflicting options and stays selectable.
    #[test]
    fn active_honors_refuses_conflicting_option() {
        let mut s = session();
        s.select_honors(Some(TrackId::from("ai"))).expect("honors");

        assert!(!s.apply_choice(&id("E2"), &id("Y")).expect("call"));
        assert!(s.select_honors(Some(TrackId::from("ai"))).expect("call"));
        assert!(s.select_honors(None).expect("clear"));
        assert!(s.apply_choice(&id("E2"), &id("Y")).expect("call"));
    }
}

// =============================================================================
// TIER T3: RELATIONSHIPS AND STATUS
// =============================================================================

mod t3_relationships {
    use super::*;

    /// T3.1: Core chain A -> B, seen from both ends.
    #[test]
    fn core_chain() {
        let mut s = session();
        s.hover(Some(id("B")));
        let rel = s.relationships();
        assert!(rel.prereq_ids.contains(&id("A")));
        assert!(rel.postreq_ids.is_empty());
        assert_eq!(s.status_of(&id("A")), CourseStatus::Prereq);

        s.hover(Some(id("A")));
        assert!(s.relationships().postreq_ids.contains(&id("B")));
        assert_eq!(s.status_of(&id("B")), CourseStatus::Postreq);
    }

    /// T3.2: Minor prerequisites resolve through original ids.
    #[test]
    fn minor_indirection() {
        let mut s = session();
        s.select_minor(Some(TrackId::from("sp"))).expect("minor");

        s.hover(Some(id("MS2")));
        assert!(s.relationships().prereq_ids.contains(&id("R5EL2203T")));
        assert_eq!(s.status_of(&id("MS1")), CourseStatus::Prereq);
        assert_eq!(s.status_of(&id("MS2")), CourseStatus::Active);

        s.hover(Some(id("MS1")));
        assert!(s.relationships().postreq_ids.contains(&id("MS2")));
        assert_eq!(s.status_of(&id("MS2")), CourseStatus::Postreq);
    }

    /// T3.3: A prerequisite naming a slot follows whatever fills that slot.
    #[test]
    fn slot_named_prerequisite() {
        let mut s = session();
        s.apply_choice(&id("E2"), &id("W")).expect("choice");
        s.hover(Some(id("E1")));
        assert!(s.relationships().postreq_ids.contains(&id("E2")));
    }

    /// T3.4: Connections point from prerequisite slot to active slot.
    #[test]
    fn connections_use_slot_ids() {
        let mut s = session();
        s.select_minor(Some(TrackId::from("sp"))).expect("minor");
        s.toggle_focus(id("MS2"));

        let edges = s.connections();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, id("MS1"));
        assert_eq!(edges[0].to, id("MS2"));
    }
}

// =============================================================================
// TIER T4: RESET AND SNAPSHOTS
// =============================================================================

mod t4_reset {
    use super::*;

    /// T4.1: Switching program wipes every selection and the active slot.
    #[test]
    fn program_switch_is_complete_reset() {
        let mut s = session();
        s.apply_choice(&id("LEC"), &id("VLSI")).expect("choice");
        s.select_minor(Some(TrackId::from("sp"))).expect("minor");
        s.select_honors(Some(TrackId::from("ai"))).expect("honors");
        s.toggle_focus(id("A"));

        s.open_program(&ProgramId::from("cse")).expect("reopen");

        assert!(s.selections().is_empty());
        assert!(s.active_slot().is_none());
        assert!(s.relationships().is_empty());
        assert!(s.disabled_options().is_empty());
    }

    /// T4.2: A snapshot blob reproduces the same view.
    #[test]
    fn snapshot_blob_restores_view() {
        let mut s = session();
        s.apply_choice(&id("LEC"), &id("EMB")).expect("choice");
        s.select_minor(Some(TrackId::from("sp"))).expect("minor");

        let blob = snapshot_to_bytes(&s.snapshot()).expect("encode");
        let mut restored = Session::new(catalog());
        restored
            .restore(snapshot_from_bytes(&blob).expect("decode"))
            .expect("restore");

        assert_eq!(restored.view().expect("view"), s.view().expect("view"));
    }

    /// T4.3: A corrupted blob is refused.
    #[test]
    fn corrupted_blob_is_refused() {
        let mut blob = snapshot_to_bytes(&session().snapshot()).expect("encode");
        blob[1] ^= 0xFF;
        assert!(matches!(
            snapshot_from_bytes(&blob),
            Err(FlowsheetError::SerializationError(_))
        ));
    }
}
