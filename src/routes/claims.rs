//! Claim intake route.
//!
//! One multipart POST feeds two independent consumers: the AI analysis
//! (shown to the user) and the submission side channel (delivered to the
//! business). They run concurrently and neither failure masks the other.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use super::{RequestError, blocked_response, request_error};
use crate::error::{ErrorBody, ErrorCode};
use crate::prompt::fields;
use crate::services::submission::{ClaimIntake, SubmissionError};
use crate::state::AppState;
use crate::studio::{ClaimStudio, RequestLifecycle, StudioForm, StudioOutput, StudioView};
use crate::upload::EncodedFile;

const FILE_FIELD: &str = "file";
const INTAKE_FIELDS: [&str; 5] = [
    fields::HOMEOWNER_NAME,
    fields::PROPERTY_ADDRESS,
    fields::PHONE_NUMBER,
    fields::CONTRACTOR_INFO,
    fields::CLAIMS_INFO,
];

/// Side-channel result as reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOutcome {
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl From<Result<(), SubmissionError>> for DeliveryOutcome {
    fn from(outcome: Result<(), SubmissionError>) -> Self {
        match outcome {
            Ok(()) => Self { delivered: true, error: None },
            Err(e) => Self { delivered: false, error: Some(ErrorBody::from_error(&e)) },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub analysis: RequestLifecycle<StudioOutput>,
    pub submission: DeliveryOutcome,
}

/// Whether a multipart text part belongs to the intake form.
#[must_use]
pub fn is_intake_field(name: &str) -> bool {
    INTAKE_FIELDS.contains(&name)
}

async fn read_form(mut multipart: Multipart) -> Result<StudioForm, RequestError> {
    let mut form = StudioForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RequestError::BadMultipart(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        if name == FILE_FIELD {
            let display_name = field.file_name().unwrap_or("upload").to_owned();
            let mime_type = field.content_type().unwrap_or_default().to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| RequestError::BadMultipart(e.to_string()))?;
            if !bytes.is_empty() {
                form.reference_image = Some(EncodedFile::from_bytes(&bytes, &mime_type, &display_name));
            }
        } else if is_intake_field(&name) {
            let value = field
                .text()
                .await
                .map_err(|e| RequestError::BadMultipart(e.to_string()))?;
            form.fields.set(&name, value);
        }
    }
    Ok(form)
}

/// `POST /api/claims`: analyze and forward a restoration claim.
pub async fn submit_claim(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(e) => return request_error(&e),
    };
    let intake = ClaimIntake::from_fields(&form.fields, form.reference_image.clone());

    let mut view = StudioView::new(ClaimStudio, state.gateway.capability());
    view.load_form(form);
    if let Err(blocked) = view.check_submit() {
        return blocked_response(&blocked);
    }

    let (analysis, delivery) = tokio::join!(view.submit(&state.gateway), state.submitter.submit(&intake));
    let analysis = match analysis {
        Ok(lifecycle) => lifecycle.clone(),
        Err(blocked) => return blocked_response(&blocked),
    };
    if let Err(e) = &delivery {
        tracing::warn!(code = e.error_code(), "claim delivery did not complete");
    }

    let body = ClaimResponse { analysis, submission: DeliveryOutcome::from(delivery) };
    (StatusCode::OK, Json(body)).into_response()
}

#[cfg(test)]
#[path = "claims_test.rs"]
mod tests;
