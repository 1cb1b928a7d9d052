//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON API under `/api`, a health check, and the static landing site as the
//! fallback. Every error response carries a `{code, message, retryable}`
//! body built from the error's [`ErrorCode`].

pub mod blobs;
pub mod capability;
pub mod claims;
pub mod labs;

use std::path::PathBuf;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::{ErrorBody, ErrorCode};
use crate::state::AppState;
use crate::studio::SubmitBlocked;

// =============================================================================
// ERRORS
// =============================================================================

/// Request-level failures that never reach a service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("unknown studio '{0}'")]
    UnknownStudio(String),

    #[error("malformed multipart body: {0}")]
    BadMultipart(String),

    #[error("not found")]
    NotFound,
}

impl ErrorCode for RequestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownStudio(_) => "E_UNKNOWN_STUDIO",
            Self::BadMultipart(_) => "E_BAD_MULTIPART",
            Self::NotFound => "E_NOT_FOUND",
        }
    }
}

pub(crate) fn request_error_status(err: &RequestError) -> StatusCode {
    match err {
        RequestError::UnknownStudio(_) | RequestError::NotFound => StatusCode::NOT_FOUND,
        RequestError::BadMultipart(_) => StatusCode::BAD_REQUEST,
    }
}

/// Status for a refused submit: 409 while pending, 428 behind a closed
/// gate, 422 for validation failures.
pub(crate) fn submit_blocked_status(err: &SubmitBlocked) -> StatusCode {
    match err {
        SubmitBlocked::Pending => StatusCode::CONFLICT,
        SubmitBlocked::CapabilityMissing => StatusCode::PRECONDITION_REQUIRED,
        SubmitBlocked::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// JSON error response from any [`ErrorCode`] error.
pub(crate) fn error_response(status: StatusCode, err: &impl ErrorCode) -> Response {
    (status, Json(ErrorBody::from_error(err))).into_response()
}

pub(crate) fn request_error(err: &RequestError) -> Response {
    error_response(request_error_status(err), err)
}

pub(crate) fn blocked_response(err: &SubmitBlocked) -> Response {
    error_response(submit_blocked_status(err), err)
}

// =============================================================================
// ROUTER
// =============================================================================

fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/capability", get(capability::status))
        .route("/api/capability/key", post(capability::select_key).delete(capability::clear_key))
        .route("/api/labs/services", get(labs::services))
        .route("/api/labs/marketing", post(labs::marketing))
        .route("/api/labs/slogan/options", get(labs::slogan_options))
        .route("/api/labs/video/jobs", post(labs::start_video_job))
        .route("/api/labs/video/jobs/{id}", get(labs::video_job).delete(labs::cancel_video_job))
        .route("/api/labs/{studio}", post(labs::run_studio))
        .route("/api/claims", post(claims::submit_claim))
        .route("/api/blobs/{id}", get(blobs::download).delete(blobs::revoke))
        .layer(body_limit)
        .layer(cors)
        .with_state(state)
}

/// Full application router: API plus, when configured, the static site.
pub fn app(state: AppState, website_dir: Option<PathBuf>) -> Router {
    let router = api_routes(state);
    let router = match website_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => router,
    };
    router.layer(CompressionLayer::new()).layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
