//! # API Endpoint Handlers
//!
//! Reads take the session's read lock; every transition holds the write
//! lock for its whole duration, so a linked choice is never observed half
//! applied.

use super::{
    AppState,
    types::{
        ChoiceRequest, FlowsheetResponse, HealthResponse, OpenProgramRequest, ProgramsResponse,
        RestoreRequest, SlotRequest, SnapshotResponse, TrackRequest, TransitionResponse,
    },
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use flowsheet_core::{
    CourseId, FlowsheetError, ProgramId, Session, SlotId, TrackId, TrackKind, snapshot_from_bytes,
    snapshot_to_bytes,
};

/// HTTP status for an engine error.
fn error_status(err: &FlowsheetError) -> StatusCode {
    match err {
        FlowsheetError::ProgramNotFound(_) => StatusCode::NOT_FOUND,
        FlowsheetError::NoProgramOpen => StatusCode::CONFLICT,
        FlowsheetError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FlowsheetError::SerializationError(_)
        | FlowsheetError::DeserializationError(_)
        | FlowsheetError::InvalidCatalog(_)
        | FlowsheetError::PrerequisiteCycle { .. } => StatusCode::BAD_REQUEST,
        FlowsheetError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn transition_error(err: &FlowsheetError) -> (StatusCode, Json<TransitionResponse>) {
    (error_status(err), Json(TransitionResponse::error(err.to_string())))
}

fn transition_ok(session: &Session, applied: bool) -> (StatusCode, Json<TransitionResponse>) {
    (
        StatusCode::OK,
        Json(TransitionResponse::success(
            applied,
            session.selections().version(),
            session.active_slot().map(ToString::to_string),
        )),
    )
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// CATALOG HANDLERS
// =============================================================================

/// Programs grouped by department, plus the track pools.
pub async fn programs_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    (StatusCode::OK, Json(ProgramsResponse::from(session.catalog())))
}

/// Open a program, discarding every selection.
pub async fn open_program_handler(
    State(state): State<AppState>,
    Json(request): Json<OpenProgramRequest>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    match session.open_program(&ProgramId::new(request.program_id)) {
        Ok(()) => transition_ok(&session, true),
        Err(e) => transition_error(&e),
    }
}

// =============================================================================
// FLOWSHEET HANDLER
// =============================================================================

/// Every derived output of the current state.
pub async fn flowsheet_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    match session.view() {
        Ok(view) => (StatusCode::OK, Json(FlowsheetResponse::success(view))),
        Err(e) => (error_status(&e), Json(FlowsheetResponse::error(e.to_string()))),
    }
}

// =============================================================================
// SELECTION HANDLERS
// =============================================================================

/// Choose an elective option (and its linked pair), or clear the slot.
pub async fn choice_handler(
    State(state): State<AppState>,
    Json(request): Json<ChoiceRequest>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    let slot = SlotId::new(request.slot_id);

    match request.option_id {
        Some(option) => match session.apply_choice(&slot, &CourseId::new(option.as_str())) {
            Ok(true) => transition_ok(&session, true),
            Ok(false) => transition_error(&FlowsheetError::Rejected(format!(
                "option {} is not available in slot {}",
                option, slot
            ))),
            Err(e) => transition_error(&e),
        },
        None => match session.clear_choice(&slot) {
            Ok(applied) => transition_ok(&session, applied),
            Err(e) => transition_error(&e),
        },
    }
}

async fn select_track(
    state: AppState,
    kind: TrackKind,
    request: TrackRequest,
) -> (StatusCode, Json<TransitionResponse>) {
    let mut session = state.session.write().await;
    let id = request.track_id.map(TrackId::new);

    match session.select_track(kind, id.clone()) {
        Ok(true) => transition_ok(&session, true),
        Ok(false) => transition_error(&FlowsheetError::Rejected(format!(
            "{} {} is unknown or disabled",
            kind,
            id.as_ref().map_or("", TrackId::as_str)
        ))),
        Err(e) => transition_error(&e),
    }
}

/// Select or clear the active minor.
pub async fn minor_handler(
    State(state): State<AppState>,
    Json(request): Json<TrackRequest>,
) -> impl IntoResponse {
    select_track(state, TrackKind::Minor, request).await
}

/// Select or clear the active honors track.
pub async fn honors_handler(
    State(state): State<AppState>,
    Json(request): Json<TrackRequest>,
) -> impl IntoResponse {
    select_track(state, TrackKind::Honors, request).await
}

/// Drop every choice and track, keeping the program open.
pub async fn reset_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = state.session.write().await;
    if let Err(e) = session.require_program().map(|_| ()) {
        return transition_error(&e);
    }
    session.reset_selections();
    transition_ok(&session, true)
}

// =============================================================================
// ACTIVE SLOT HANDLERS
// =============================================================================

/// Set or clear the hovered slot.
pub async fn hover_handler(
    State(state): State<AppState>,
    Json(request): Json<SlotRequest>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.hover(request.slot_id.map(SlotId::new));
    transition_ok(&session, true)
}

/// Toggle focus on a slot; `null` clears focus.
pub async fn focus_handler(
    State(state): State<AppState>,
    Json(request): Json<SlotRequest>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    match request.slot_id {
        Some(slot) => session.toggle_focus(SlotId::new(slot)),
        None => session.clear_focus(),
    }
    transition_ok(&session, true)
}

// =============================================================================
// SNAPSHOT HANDLERS
// =============================================================================

/// Export the selection state as a base64 blob.
pub async fn snapshot_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    match snapshot_to_bytes(&session.snapshot()) {
        Ok(data) => (
            StatusCode::OK,
            Json(SnapshotResponse::success(&data, session.selections().version())),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SnapshotResponse::error(format!("Snapshot failed: {}", e))),
        ),
    }
}

/// Restore a selection state exported by [`snapshot_handler`].
pub async fn restore_handler(
    State(state): State<AppState>,
    Json(request): Json<RestoreRequest>,
) -> impl IntoResponse {
    let data = match request.decode() {
        Ok(data) => data,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(TransitionResponse::error(format!("Invalid base64: {}", e))),
            );
        }
    };

    let snapshot = match snapshot_from_bytes(&data) {
        Ok(snapshot) => snapshot,
        Err(e) => return transition_error(&e),
    };

    let mut session = state.session.write().await;
    match session.restore(snapshot) {
        Ok(()) => transition_ok(&session, true),
        Err(e) => transition_error(&e),
    }
}
