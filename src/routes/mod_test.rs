use std::sync::Arc;

use serde_json::Value;

use super::*;
use crate::gateway::mock::MockApi;
use crate::state::test_helpers::{serve, test_app_state};
use crate::studio::ValidationError;

#[test]
fn blocked_submits_map_to_statuses() {
    assert_eq!(submit_blocked_status(&SubmitBlocked::Pending), StatusCode::CONFLICT);
    assert_eq!(submit_blocked_status(&SubmitBlocked::CapabilityMissing), StatusCode::PRECONDITION_REQUIRED);
    assert_eq!(
        submit_blocked_status(&SubmitBlocked::Invalid(ValidationError::MissingReferenceImage)),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[test]
fn request_errors_map_to_statuses() {
    assert_eq!(request_error_status(&RequestError::NotFound), StatusCode::NOT_FOUND);
    assert_eq!(request_error_status(&RequestError::UnknownStudio("x".into())), StatusCode::NOT_FOUND);
    assert_eq!(request_error_status(&RequestError::BadMultipart("eof".into())), StatusCode::BAD_REQUEST);
    assert_eq!(RequestError::BadMultipart("eof".into()).error_code(), "E_BAD_MULTIPART");
}

#[test]
fn credential_errors_map_to_statuses() {
    use crate::credentials::CredentialError;
    assert_eq!(capability::credential_status(&CredentialError::EmptyKey), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        capability::credential_status(&CredentialError::StoreUnavailable),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn healthz_is_ok() {
    let base = serve(test_app_state(Arc::new(MockApi::new()), false)).await;
    let response = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn capability_select_and_clear() {
    let base = serve(test_app_state(Arc::new(MockApi::new()), false)).await;
    let client = reqwest::Client::new();

    let status: Value = client.get(format!("{base}/api/capability")).send().await.unwrap().json().await.unwrap();
    assert_eq!(status["ready"], false);
    assert_eq!(status["status"], "needs_credential");

    let blank = client
        .post(format!("{base}/api/capability/key"))
        .json(&serde_json::json!({ "apiKey": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(blank.status().as_u16(), 422);
    let body: Value = blank.json().await.unwrap();
    assert_eq!(body["code"], "E_EMPTY_KEY");

    let selected = client
        .post(format!("{base}/api/capability/key"))
        .json(&serde_json::json!({ "apiKey": "live-key" }))
        .send()
        .await
        .unwrap();
    assert_eq!(selected.status().as_u16(), 200);
    let status: Value = client.get(format!("{base}/api/capability")).send().await.unwrap().json().await.unwrap();
    assert_eq!(status["ready"], true);

    let cleared = client.delete(format!("{base}/api/capability/key")).send().await.unwrap();
    assert_eq!(cleared.status().as_u16(), 204);
    let status: Value = client.get(format!("{base}/api/capability")).send().await.unwrap().json().await.unwrap();
    assert_eq!(status["ready"], false);
}

#[tokio::test]
async fn blobs_download_and_revoke() {
    let state = test_app_state(Arc::new(MockApi::new()), false);
    let id = state.blobs.insert("video/mp4", vec![1, 2, 3]).await;
    let base = serve(state).await;
    let client = reqwest::Client::new();

    let response = client.get(format!("{base}/api/blobs/{id}")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()["content-type"], "video/mp4");
    assert_eq!(response.bytes().await.unwrap().as_ref(), &[1, 2, 3]);

    let revoked = client.delete(format!("{base}/api/blobs/{id}")).send().await.unwrap();
    assert_eq!(revoked.status().as_u16(), 204);
    let gone = client.get(format!("{base}/api/blobs/{id}")).send().await.unwrap();
    assert_eq!(gone.status().as_u16(), 404);
    let body: Value = gone.json().await.unwrap();
    assert_eq!(body["code"], "E_NOT_FOUND");
}
