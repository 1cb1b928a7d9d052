//! Scripted `GenerativeApi` for tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use super::types::{
    ApiError, GenerateRequest, GenerateResponse, GenerativeApi, InlineData, Part, VideoBytes, VideoOperation,
    VideoRequest,
};
use super::{Gateway, video::PollPolicy};
use crate::config::ModelIds;
use crate::credentials::CredentialStore;
use crate::services::blobs::BlobStore;

pub const MOCK_VIDEO_URI: &str = "https://files.test/video.mp4";

pub struct MockApi {
    content: Mutex<VecDeque<Result<GenerateResponse, ApiError>>>,
    pub requests: Mutex<Vec<GenerateRequest>>,
    pub video_requests: Mutex<Vec<VideoRequest>>,
    /// Poll on which the video job reports done; `None` never finishes.
    done_after: Option<usize>,
    video_uri: Option<String>,
    pub polls: Mutex<usize>,
    content_delay: Option<Duration>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            content: Mutex::new(VecDeque::new()),
            requests: Mutex::new(vec![]),
            video_requests: Mutex::new(vec![]),
            done_after: Some(1),
            video_uri: Some(MOCK_VIDEO_URI.to_owned()),
            polls: Mutex::new(0),
            content_delay: None,
        }
    }

    pub fn push(self, response: Result<GenerateResponse, ApiError>) -> Self {
        self.content.lock().unwrap().push_back(response);
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.push(Ok(GenerateResponse { parts: vec![Part::text(text)] }))
    }

    pub fn image(self, mime_type: &str, data: &str) -> Self {
        self.push(Ok(GenerateResponse {
            parts: vec![Part::InlineData(InlineData { mime_type: mime_type.into(), data: data.into() })],
        }))
    }

    pub fn error(self, status: u16) -> Self {
        self.push(Err(ApiError::ApiResponse { status, body: "upstream failure".into() }))
    }

    pub fn video_done_after(mut self, polls: Option<usize>) -> Self {
        self.done_after = polls;
        self
    }

    pub fn video_uri(mut self, uri: Option<&str>) -> Self {
        self.video_uri = uri.map(str::to_owned);
        self
    }

    pub fn content_delay(mut self, delay: Duration) -> Self {
        self.content_delay = Some(delay);
        self
    }

    pub fn content_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn poll_count(&self) -> usize {
        *self.polls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl GenerativeApi for MockApi {
    async fn generate_content(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.content_delay {
            tokio::time::sleep(delay).await;
        }
        self.content
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::ApiRequest("no scripted response".into())))
    }

    async fn start_video(&self, request: &VideoRequest) -> Result<VideoOperation, ApiError> {
        self.video_requests.lock().unwrap().push(request.clone());
        Ok(VideoOperation { name: "models/veo/operations/test".into(), ..VideoOperation::default() })
    }

    async fn poll_video(&self, operation_name: &str) -> Result<VideoOperation, ApiError> {
        let count = {
            let mut polls = self.polls.lock().unwrap();
            *polls += 1;
            *polls
        };
        let done = self.done_after.is_some_and(|n| count >= n);
        Ok(VideoOperation {
            name: operation_name.to_owned(),
            done,
            video_uri: if done { self.video_uri.clone() } else { None },
            error: None,
        })
    }

    async fn download_video(&self, _uri: &str) -> Result<VideoBytes, ApiError> {
        Ok(VideoBytes { mime_type: "video/mp4".into(), bytes: vec![0, 0, 0, 24] })
    }
}

/// Millisecond-scale polling for tests.
pub fn fast_poll() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(2),
        max_interval: Duration::from_millis(2),
        backoff: 1.0,
        timeout: Duration::from_millis(200),
    }
}

/// Gateway over `api` with the capability gate open or closed.
pub fn gateway(api: Arc<MockApi>, key_selected: bool) -> Gateway {
    let store = Arc::new(CredentialStore::new(key_selected.then(|| "test-key".to_owned())));
    Gateway::new(api, store, ModelIds::default(), fast_poll(), Arc::new(BlobStore::default()))
}
