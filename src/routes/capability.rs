//! Capability routes: credential presence, selection and clearing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use super::error_response;
use crate::credentials::CredentialError;
use crate::state::AppState;
use crate::view::GateStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityStatus {
    pub ready: bool,
    pub status: GateStatus,
}

impl CapabilityStatus {
    #[must_use]
    pub fn from_presence(present: bool) -> Self {
        let status = if present { GateStatus::Ready } else { GateStatus::NeedsCredential };
        Self { ready: present, status }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectKeyBody {
    pub api_key: String,
}

/// `GET /api/capability`: whether gated studios may generate.
pub async fn status(State(state): State<AppState>) -> Json<CapabilityStatus> {
    Json(CapabilityStatus::from_presence(state.credentials.is_present()))
}

/// `POST /api/capability/key`: select the API key used for every
/// upstream call from now on.
pub async fn select_key(State(state): State<AppState>, Json(body): Json<SelectKeyBody>) -> Response {
    match state.credentials.select(&body.api_key) {
        Ok(()) => {
            tracing::info!("api key selected");
            Json(CapabilityStatus::from_presence(true)).into_response()
        }
        Err(e) => error_response(credential_status(&e), &e),
    }
}

/// `DELETE /api/capability/key`: forget the selected key.
pub async fn clear_key(State(state): State<AppState>) -> Response {
    match state.credentials.clear() {
        Ok(()) => {
            tracing::info!("api key cleared");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(credential_status(&e), &e),
    }
}

pub(crate) fn credential_status(err: &CredentialError) -> StatusCode {
    match err {
        CredentialError::EmptyKey => StatusCode::UNPROCESSABLE_ENTITY,
        CredentialError::SelectionRequired => StatusCode::PRECONDITION_REQUIRED,
        CredentialError::StoreUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
