//! Blob routes: serve and revoke generated media.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use super::{RequestError, request_error};
use crate::state::AppState;

/// `GET /api/blobs/{id}`: raw bytes with their stored MIME type.
pub async fn download(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let Some(blob) = state.blobs.get(id).await else {
        return request_error(&RequestError::NotFound);
    };
    (
        [(CONTENT_TYPE, blob.mime_type.clone()), (CACHE_CONTROL, "private, max-age=3600".to_owned())],
        blob.bytes.clone(),
    )
        .into_response()
}

/// `DELETE /api/blobs/{id}`: revoke a handle.
pub async fn revoke(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    if state.blobs.remove(id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        request_error(&RequestError::NotFound)
    }
}
