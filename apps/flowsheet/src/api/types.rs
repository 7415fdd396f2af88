//! # API Request/Response Types
//!
//! JSON structures for the HTTP API. The engine's [`FlowsheetView`] is
//! serialized as it is.

use flowsheet_core::{Catalog, FlowsheetView, Program, Track};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// PROGRAMS RESPONSE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub id: String,
    pub name: String,
    pub slot_count: usize,
}

impl From<&Program> for ProgramSummary {
    fn from(program: &Program) -> Self {
        Self {
            id: program.id.to_string(),
            name: program.name.clone(),
            slot_count: program.slot_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentJson {
    pub name: String,
    pub programs: Vec<ProgramSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSummary {
    pub id: String,
    pub name: String,
    pub department: String,
    pub course_count: usize,
}

impl From<&Track> for TrackSummary {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.to_string(),
            name: track.name.clone(),
            department: track.department.clone(),
            course_count: track.courses.len(),
        }
    }
}

/// Programs grouped by department, plus both track pools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramsResponse {
    pub departments: Vec<DepartmentJson>,
    pub minors: Vec<TrackSummary>,
    pub honors: Vec<TrackSummary>,
}

impl From<&Catalog> for ProgramsResponse {
    fn from(catalog: &Catalog) -> Self {
        Self {
            departments: catalog
                .programs_by_department()
                .into_iter()
                .map(|(name, programs)| DepartmentJson {
                    name: name.to_string(),
                    programs: programs.into_iter().map(ProgramSummary::from).collect(),
                })
                .collect(),
            minors: catalog.minors.iter().map(TrackSummary::from).collect(),
            honors: catalog.honors.iter().map(TrackSummary::from).collect(),
        }
    }
}

// =============================================================================
// TRANSITION REQUESTS
// =============================================================================

/// Open a program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenProgramRequest {
    pub program_id: String,
}

/// Choose an elective option; `option_id: null` clears the slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceRequest {
    pub slot_id: String,
    #[serde(default)]
    pub option_id: Option<String>,
}

/// Select a Minor or Honors track; `track_id: null` clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRequest {
    #[serde(default)]
    pub track_id: Option<String>,
}

/// Hover or focus a slot; `slot_id: null` clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRequest {
    #[serde(default)]
    pub slot_id: Option<String>,
}

/// Result of any state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionResponse {
    pub success: bool,
    /// Whether the transition changed anything.
    pub applied: bool,
    pub version: u64,
    pub active_slot: Option<String>,
    pub error: Option<String>,
}

impl TransitionResponse {
    pub fn success(applied: bool, version: u64, active_slot: Option<String>) -> Self {
        Self {
            success: true,
            applied,
            version,
            active_slot,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            applied: false,
            version: 0,
            active_slot: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// FLOWSHEET RESPONSE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowsheetResponse {
    pub success: bool,
    pub view: Option<FlowsheetView>,
    pub error: Option<String>,
}

impl FlowsheetResponse {
    pub fn success(view: FlowsheetView) -> Self {
        Self {
            success: true,
            view: Some(view),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            view: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// SNAPSHOT REQUEST/RESPONSE
// =============================================================================

/// Snapshot export response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub success: bool,
    pub data: Option<String>, // Base64 encoded
    pub version: Option<u64>,
    pub error: Option<String>,
}

impl SnapshotResponse {
    pub fn success(data: &[u8], version: u64) -> Self {
        Self {
            success: true,
            data: Some(base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                data,
            )),
            version: Some(version),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            version: None,
            error: Some(msg.into()),
        }
    }
}

/// Snapshot restore request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreRequest {
    /// Base64 encoded snapshot blob.
    pub data: String,
}

impl RestoreRequest {
    /// Decode the base64 payload.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &self.data)
    }
}
