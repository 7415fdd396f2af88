//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use flowsheet::api::{
    ChoiceRequest, HealthResponse, ProgramsResponse, RestoreRequest, SlotRequest,
    SnapshotResponse, TrackRequest, TransitionResponse,
};
use flowsheet_core::{Catalog, Course, Program, ProgramId, Semester, Slot, Track, TrackId, Year};

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

// =============================================================================
// REQUEST TESTS
// =============================================================================

#[test]
fn test_choice_request_option_defaults_to_clear() {
    let request: ChoiceRequest = serde_json::from_str(r#"{"slot_id": "pe1"}"#).unwrap();
    assert_eq!(request.slot_id, "pe1");
    assert!(request.option_id.is_none());

    let request: ChoiceRequest =
        serde_json::from_str(r#"{"slot_id": "pe1", "option_id": "R5CO2011T"}"#).unwrap();
    assert_eq!(request.option_id.as_deref(), Some("R5CO2011T"));
}

#[test]
fn test_choice_request_requires_slot() {
    let result: Result<ChoiceRequest, _> = serde_json::from_str(r#"{"option_id": "x"}"#);
    assert!(result.is_err());
}

#[test]
fn test_track_and_slot_requests_accept_null() {
    let track: TrackRequest = serde_json::from_str(r#"{"track_id": null}"#).unwrap();
    assert!(track.track_id.is_none());
    let slot: SlotRequest = serde_json::from_str("{}").unwrap();
    assert!(slot.slot_id.is_none());
}

#[test]
fn test_restore_request_decodes_base64() {
    let request = RestoreRequest {
        data: "RkxTSAE=".to_string(),
    };
    assert_eq!(request.decode().unwrap(), b"FLSH\x01".to_vec());

    let bad = RestoreRequest {
        data: "not base64!".to_string(),
    };
    assert!(bad.decode().is_err());
}

// =============================================================================
// RESPONSE TESTS
// =============================================================================

#[test]
fn test_transition_response_constructors() {
    let ok = TransitionResponse::success(true, 4, Some("pe1".to_string()));
    assert!(ok.success);
    assert_eq!(ok.version, 4);
    assert!(ok.error.is_none());

    let err = TransitionResponse::error("No program is open");
    assert!(!err.success);
    assert!(!err.applied);
    assert_eq!(err.error.as_deref(), Some("No program is open"));
}

#[test]
fn test_snapshot_response_is_base64() {
    let response = SnapshotResponse::success(b"FLSH\x01", 2);
    assert_eq!(response.data.as_deref(), Some("RkxTSAE="));
    assert_eq!(response.version, Some(2));

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"success\":true"));
}

#[test]
fn test_programs_response_from_catalog() {
    let program = |id: &str, department: &str| Program {
        id: ProgramId::from(id),
        name: id.to_uppercase(),
        department: department.to_string(),
        years: vec![Year {
            id: "y1".to_string(),
            label: "First Year".to_string(),
            semesters: vec![Semester {
                id: "s1".to_string(),
                label: "Semester I".to_string(),
                slots: vec![Slot::Core(Course::new("c1", "C 1", "Course", 3))],
            }],
        }],
    };
    let catalog = Catalog {
        programs: vec![
            program("me", "Mechanical"),
            program("ce", "Computer"),
            program("it", "Computer"),
        ],
        minors: vec![Track {
            id: TrackId::from("m1"),
            name: "Minor".to_string(),
            department: "Civil".to_string(),
            courses: Vec::new(),
        }],
        honors: Vec::new(),
    };

    let response = ProgramsResponse::from(&catalog);

    let departments: Vec<_> = response.departments.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(departments, vec!["Computer", "Mechanical"]);
    assert_eq!(response.departments[0].programs.len(), 2);
    assert_eq!(response.departments[0].programs[0].slot_count, 1);
    assert_eq!(response.minors[0].course_count, 0);
    assert!(response.honors.is_empty());
}
