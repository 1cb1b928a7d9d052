//! Creative-labs routes: studio submissions, marketing copy, video jobs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{RequestError, blocked_response, error_response, request_error};
use crate::error::ErrorCode;
use crate::gateway::{ContentKind, Gateway, GatewayError, Persona};
use crate::prompt::{AssetType, SLOGAN_OPTIONS, SloganOptions};
use crate::state::AppState;
use crate::studio::{
    GraphicStudio, ImageEditStudio, RequestLifecycle, SloganStudio, StudioForm, StudioKind, StudioView,
    ValidationError, VideoStudio,
};
use crate::view::router::{LabsService, ServiceCard, catalogue};

/// Studio addressed by `POST /api/labs/{studio}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudioRoute {
    Graphic(AssetType),
    Slogan,
    Video,
    Edit,
}

/// Resolve a path segment to a studio.
#[must_use]
pub fn parse_studio(slug: &str) -> Option<StudioRoute> {
    match slug {
        "video" => return Some(StudioRoute::Video),
        "edit" => return Some(StudioRoute::Edit),
        _ => {}
    }
    let service = LabsService::STUDIOS.into_iter().find(|s| s.slug() == slug)?;
    match service.asset_type()? {
        AssetType::Slogan => Some(StudioRoute::Slogan),
        asset if asset.is_graphic() => Some(StudioRoute::Graphic(asset)),
        _ => None,
    }
}

/// Map a terminal studio state to its HTTP status. Gateway failures are 502.
pub(crate) fn lifecycle_status<T>(state: &RequestLifecycle<T>) -> StatusCode {
    match state {
        RequestLifecycle::Failed(body) if body.code == GatewayError::CapabilityMissing.error_code() => {
            StatusCode::PRECONDITION_REQUIRED
        }
        RequestLifecycle::Failed(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    }
}

async fn run<K: StudioKind>(kind: K, gateway: &Gateway, form: StudioForm) -> Response {
    let mut view = StudioView::new(kind, gateway.capability());
    view.load_form(form);
    view.activate().await;
    match view.submit(gateway).await {
        Ok(state) => (lifecycle_status(state), Json(state)).into_response(),
        Err(blocked) => {
            tracing::info!(error = %blocked, "studio submit refused");
            blocked_response(&blocked)
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/labs/services`: Labs menu catalogue.
pub async fn services() -> Json<&'static [ServiceCard]> {
    Json(catalogue())
}

/// `GET /api/labs/slogan/options`: preset industry and tone tags.
pub async fn slogan_options() -> Json<SloganOptions> {
    Json(SLOGAN_OPTIONS)
}

/// `POST /api/labs/{studio}`: validate, compose, generate.
pub async fn run_studio(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(form): Json<StudioForm>,
) -> Response {
    let Some(route) = parse_studio(&slug) else {
        return request_error(&RequestError::UnknownStudio(slug));
    };
    let gateway = state.gateway.as_ref();
    match route {
        StudioRoute::Graphic(asset) => match GraphicStudio::new(asset) {
            Some(kind) => run(kind, gateway, form).await,
            None => request_error(&RequestError::UnknownStudio(slug)),
        },
        StudioRoute::Slogan => run(SloganStudio, gateway, form).await,
        StudioRoute::Video => run(VideoStudio, gateway, form).await,
        StudioRoute::Edit => run(ImageEditStudio, gateway, form).await,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingBody {
    pub topic: String,
    pub kind: ContentKind,
    #[serde(default)]
    pub persona: Persona,
}

#[derive(Debug, Serialize)]
pub struct MarketingResponse {
    pub text: String,
}

fn marketing_status(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::CapabilityMissing => StatusCode::PRECONDITION_REQUIRED,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// `POST /api/labs/marketing`: free-form copy in a persona's tone.
pub async fn marketing(State(state): State<AppState>, Json(body): Json<MarketingBody>) -> Response {
    if body.topic.trim().is_empty() {
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, &ValidationError::MissingField { label: "Topic" });
    }
    match state
        .gateway
        .generate_marketing_content(body.topic.trim(), body.kind, body.persona)
        .await
    {
        Ok(text) => Json(MarketingResponse { text }).into_response(),
        Err(e) => error_response(marketing_status(&e), &e),
    }
}

#[derive(Debug, Serialize)]
pub struct JobCreated {
    pub id: Uuid,
}

/// `POST /api/labs/video/jobs`: start a background video generation.
pub async fn start_video_job(State(state): State<AppState>, Json(form): Json<StudioForm>) -> Response {
    match state.jobs.start(state.gateway.clone(), form).await {
        Ok(id) => (StatusCode::ACCEPTED, Json(JobCreated { id })).into_response(),
        Err(blocked) => blocked_response(&blocked),
    }
}

/// `GET /api/labs/video/jobs/{id}`: job lifecycle state.
pub async fn video_job(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.jobs.get(id).await {
        Some(snapshot) => Json(snapshot).into_response(),
        None => request_error(&RequestError::NotFound),
    }
}

/// `DELETE /api/labs/video/jobs/{id}`: cancel a running job.
pub async fn cancel_video_job(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.jobs.cancel(id).await {
        Some(cancelled) => Json(serde_json::json!({ "cancelled": cancelled })).into_response(),
        None => request_error(&RequestError::NotFound),
    }
}

#[cfg(test)]
#[path = "labs_test.rs"]
mod tests;
