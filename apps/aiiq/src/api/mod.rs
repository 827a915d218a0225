//! # AI-IQ HTTP API Module
//!
//! JSON-over-HTTP adapter for the survey session, built on axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /survey` - Survey definition and answer scale
//! - `POST /survey/score` - Score a form (stored when name and email are given)
//! - `GET /submissions` - List stored submissions (gated)
//! - `GET /submissions/{id}` - One submission with chart and text answers (gated)
//! - `DELETE /submissions/{id}` - Delete a submission (gated)
//! - `GET /summary` - Aggregate results (gated)
//!
//! ## Configuration (Environment Variables)
//!
//! - `AIIQ_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `AIIQ_PASSWORD`: Results password (also `[general] password` in the config file)

mod auth;
mod handlers;
mod types;

pub use auth::password_matches;
pub use handlers::{
    delete_handler, health_handler, list_handler, score_handler, show_handler, summary_handler,
    survey_handler,
};
pub use types::{
    ApiError, DeleteResponse, ErrorResponse, HealthResponse, SubmissionDetailResponse,
    SubmissionListResponse, SubmissionRow, SubmitRequest, SubmitResponse, SummaryResponse,
    SurveyResponse, TextResponseJson,
};

use aiiq_core::{AiIqError, Survey};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body (256 KB). A full form is a few KB.
const MAX_BODY_SIZE: usize = 256 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// The survey session. Writers hold the lock across the whole store cycle.
    pub survey: Arc<RwLock<Survey>>,
    /// Results password; `None` locks the gated routes.
    pub password: Option<Arc<str>>,
}

impl AppState {
    #[must_use]
    pub fn new(survey: Survey, password: Option<String>) -> Self {
        Self {
            survey: Arc::new(RwLock::new(survey)),
            password: password
                .filter(|p| !p.trim().is_empty())
                .map(Arc::from),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Localhost origins allowed when `AIIQ_CORS_ORIGINS` is unset.
const LOCAL_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:8080",
];

/// CORS policy from `AIIQ_CORS_ORIGINS`: `*` allows any origin, a
/// comma-separated list allows those, unset means localhost only.
fn build_cors_layer() -> CorsLayer {
    let configured = std::env::var("AIIQ_CORS_ORIGINS").ok();

    if configured.as_deref() == Some("*") {
        tracing::warn!("CORS: any origin allowed (AIIQ_CORS_ORIGINS=*)");
        return CorsLayer::permissive();
    }

    let origins = configured
        .as_deref()
        .map(parse_origins)
        .unwrap_or_default();

    if origins.is_empty() {
        if configured.is_some() {
            tracing::warn!("CORS: AIIQ_CORS_ORIGINS has no valid origin, using localhost");
        }
        return cors_for(parse_origins(&LOCAL_ORIGINS.join(",")));
    }
    cors_for(origins)
}

fn parse_origins(list: &str) -> Vec<HeaderValue> {
    list.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin, error = %e, "CORS: skipping invalid origin");
                None
            }
        })
        .collect()
}

fn cors_for(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Password gate - results routes only
pub fn create_router(state: AppState) -> Router {
    if state.password.is_none() {
        tracing::warn!(
            "No results password configured - /submissions and /summary are locked. \
             Set [general] password or AIIQ_PASSWORD to enable them."
        );
    }

    let gated = Router::new()
        .route("/submissions", get(handlers::list_handler))
        .route(
            "/submissions/{id}",
            get(handlers::show_handler).delete(handlers::delete_handler),
        )
        .route("/summary", get(handlers::summary_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::password_gate,
        ));

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/survey", get(handlers::survey_handler))
        .route("/survey/score", post(handlers::score_handler))
        .merge(gated)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer()),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(
    addr: &str,
    survey: Survey,
    password: Option<String>,
) -> Result<(), AiIqError> {
    let state = AppState::new(survey, password);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AiIqError::Io(format!("Bind {} failed: {}", addr, e)))?;

    tracing::info!("AI-IQ survey server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| AiIqError::Io(format!("Server error: {}", e)))
}
