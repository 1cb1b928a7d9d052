use std::time::Duration;

use super::*;
use crate::gateway::GenerationResult;
use crate::gateway::mock::{MockApi, gateway};
use crate::prompt::fields;
use crate::studio::ValidationError;
use crate::studio::kinds::DEFAULT_VIDEO_MOTION;
use crate::upload::EncodedFile;

fn photo_form(motion: &str) -> StudioForm {
    let mut form = StudioForm {
        reference_image: Some(EncodedFile::from_bytes(b"jpeg", "image/jpeg", "grandma.jpg")),
        ..StudioForm::default()
    };
    form.fields.set(fields::MOTION, motion);
    form
}

async fn settle(jobs: &VideoJobs, id: Uuid) -> JobSnapshot {
    for _ in 0..200 {
        let snapshot = jobs.get(id).await.unwrap();
        if !snapshot.state.is_pending() {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job {id} never settled");
}

#[tokio::test]
async fn job_runs_to_success() {
    let api = Arc::new(MockApi::new().video_done_after(Some(2)));
    let gw = Arc::new(gateway(api.clone(), true));
    let jobs = VideoJobs::default();

    let id = jobs.start(gw, photo_form("Slow zoom on the porch")).await.unwrap();
    let snapshot = settle(&jobs, id).await;
    let RequestLifecycle::Succeeded(StudioOutput::Single(GenerationResult::Video(video))) = snapshot.state else {
        panic!("expected a finished video");
    };
    assert_eq!(video.mime_type, "video/mp4");
    assert_eq!(api.video_requests.lock().unwrap()[0].prompt, "Slow zoom on the porch");
}

#[tokio::test]
async fn blank_motion_uses_studio_default() {
    let api = Arc::new(MockApi::new());
    let gw = Arc::new(gateway(api.clone(), true));
    let jobs = VideoJobs::default();

    let id = jobs.start(gw, photo_form("  ")).await.unwrap();
    settle(&jobs, id).await;
    assert_eq!(api.video_requests.lock().unwrap()[0].prompt, DEFAULT_VIDEO_MOTION);
}

#[tokio::test]
async fn cancel_stops_polling_and_fails_job() {
    let api = Arc::new(MockApi::new().video_done_after(None));
    let gw = Arc::new(gateway(api.clone(), true));
    let jobs = VideoJobs::default();

    let id = jobs.start(gw, photo_form("wave")).await.unwrap();
    assert_eq!(jobs.cancel(id).await, Some(true));

    let snapshot = jobs.get(id).await.unwrap();
    assert!(matches!(&snapshot.state, RequestLifecycle::Failed(body) if body.code == "E_CANCELLED"));

    let polls_after_cancel = api.poll_count();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(api.poll_count() <= polls_after_cancel + 1);
    assert_eq!(jobs.cancel(id).await, Some(false));
}

#[tokio::test]
async fn closed_gate_registers_nothing() {
    let api = Arc::new(MockApi::new());
    let gw = Arc::new(gateway(api.clone(), false));
    let jobs = VideoJobs::default();

    assert_eq!(jobs.start(gw, photo_form("wave")).await.unwrap_err(), SubmitBlocked::CapabilityMissing);
    assert!(jobs.is_empty().await);
    assert!(api.video_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_photo_is_invalid() {
    let gw = Arc::new(gateway(Arc::new(MockApi::new()), true));
    let jobs = VideoJobs::default();
    let err = jobs.start(gw, StudioForm::default()).await.unwrap_err();
    assert_eq!(err, SubmitBlocked::Invalid(ValidationError::MissingReferenceImage));
}

#[tokio::test]
async fn unknown_job_is_none() {
    let jobs = VideoJobs::default();
    assert!(jobs.get(Uuid::new_v4()).await.is_none());
    assert!(jobs.cancel(Uuid::new_v4()).await.is_none());
}

#[tokio::test]
async fn oldest_job_is_evicted_at_capacity() {
    let gw = Arc::new(gateway(Arc::new(MockApi::new()), true));
    let jobs = VideoJobs::new(1);
    let first = jobs.start(Arc::clone(&gw), photo_form("a")).await.unwrap();
    let second = jobs.start(gw, photo_form("b")).await.unwrap();
    assert_eq!(jobs.len().await, 1);
    assert!(jobs.get(first).await.is_none());
    assert!(jobs.get(second).await.is_some());
}

#[test]
fn snapshot_serializes_flat() {
    let snapshot = JobSnapshot { id: Uuid::nil(), state: RequestLifecycle::Pending };
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["state"], "pending");
    assert_eq!(json["id"], Uuid::nil().to_string());
}
