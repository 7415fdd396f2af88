//! # Flowsheet HTTP API Module
//!
//! REST API over one shared [`Session`].
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /programs` - Programs by department, Minor and Honors pools
//! - `POST /program` - Open a program
//! - `GET /flowsheet` - Effective courses, statuses, conflicts, relationships
//! - `POST /choice` - Choose or clear an elective option
//! - `POST /minor`, `POST /honors` - Select or clear a track
//! - `POST /reset` - Drop every selection, keep the program
//! - `POST /hover`, `POST /focus` - Active slot inputs
//! - `GET /snapshot`, `POST /snapshot` - Export or restore selections
//!
//! ## Configuration (Environment Variables)
//!
//! - `FLOWSHEET_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all
//!   (default: localhost only)
//! - `FLOWSHEET_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

pub use middleware::{
    DEFAULT_RATE_LIMIT, create_rate_limiter, get_rate_limit_from_env, parse_rate_limit,
};
pub use types::{
    ChoiceRequest, DepartmentJson, FlowsheetResponse, HealthResponse, OpenProgramRequest,
    ProgramSummary, ProgramsResponse, RestoreRequest, SlotRequest, SnapshotResponse, TrackRequest,
    TrackSummary, TransitionResponse,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use flowsheet_core::{FlowsheetError, Session};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (256 KB); the largest body is a snapshot.
const MAX_REQUEST_BODY: usize = 256 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: one session for every client.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
}

impl AppState {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// CORS layer from `FLOWSHEET_CORS_ORIGINS`.
///
/// - `*`: any origin
/// - unset, or no valid entry: localhost only
/// - otherwise: the comma-separated origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("FLOWSHEET_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!("CORS: allowing ALL origins (FLOWSHEET_CORS_ORIGINS=*)");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: allowing origin {}", origin);
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: invalid origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect();

            if allowed.is_empty() {
                tracing::warn!("CORS: no valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => build_localhost_cors(),
    }
}

/// CORS layer for local front ends only.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner): tracing, CORS, body limit, rate
/// limiting (if enabled).
pub fn create_router(state: AppState) -> Router {
    let rate_limit = get_rate_limit_from_env();

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/programs", get(handlers::programs_handler))
        .route("/program", post(handlers::open_program_handler))
        .route("/flowsheet", get(handlers::flowsheet_handler))
        .route("/choice", post(handlers::choice_handler))
        .route("/minor", post(handlers::minor_handler))
        .route("/honors", post(handlers::honors_handler))
        .route("/reset", post(handlers::reset_handler))
        .route("/hover", post(handlers::hover_handler))
        .route("/focus", post(handlers::focus_handler))
        .route(
            "/snapshot",
            get(handlers::snapshot_handler).post(handlers::restore_handler),
        );

    if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        router = router.layer(axum_middleware::from_fn_with_state(
            create_rate_limiter(rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer())
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

/// Bind `addr` and serve until Ctrl+C.
pub async fn run_server(addr: &str, session: Session) -> Result<(), FlowsheetError> {
    let router = create_router(AppState::new(session));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| FlowsheetError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Flowsheet HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FlowsheetError::IoError(format!("Server error: {}", e)))
}
