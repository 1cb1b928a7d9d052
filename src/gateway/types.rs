//! Provider wire-neutral request/response types and the raw API error.
//!
//! `GenerativeApi` is the seam between the gateway's capability operations
//! and the HTTP client. Tests swap in a mock; production uses
//! [`super::gemini::GeminiClient`].

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::prompt::AspectRatio;
use crate::upload::EncodedFile;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by a single upstream call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No API key has been selected.
    #[error("no API key selected")]
    MissingCredential,

    /// The HTTP request failed before a response arrived.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// CONTENT PARTS
// =============================================================================

/// Inline binary payload (base64) plus its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl InlineData {
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

impl From<&EncodedFile> for InlineData {
    fn from(file: &EncodedFile) -> Self {
        Self { mime_type: file.mime_type.clone(), data: file.data.clone() }
    }
}

/// One part of a content request or response. Serializes to the provider's
/// single-key object form (`{"text": ..}` / `{"inlineData": {..}}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Text(String),
    InlineData(InlineData),
}

impl Part {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

impl From<&EncodedFile> for Part {
    fn from(file: &EncodedFile) -> Self {
        Self::InlineData(file.into())
    }
}

// =============================================================================
// CONTENT GENERATION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: AspectRatio,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub model: String,
    pub parts: Vec<Part>,
    pub system_instruction: Option<String>,
    pub image_config: Option<ImageConfig>,
}

impl GenerateRequest {
    #[must_use]
    pub fn new(model: &str, parts: Vec<Part>) -> Self {
        Self { model: model.to_owned(), parts, system_instruction: None, image_config: None }
    }

    #[must_use]
    pub fn with_system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    #[must_use]
    pub fn with_image_config(mut self, config: ImageConfig) -> Self {
        self.image_config = Some(config);
        self
    }
}

/// Parts of the first candidate, in response order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    pub parts: Vec<Part>,
}

impl GenerateResponse {
    /// Concatenated text parts, `None` when there is no non-blank text.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::InlineData(_) => None,
            })
            .collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }

    #[must_use]
    pub fn first_image(&self) -> Option<&InlineData> {
        self.parts.iter().find_map(|p| match p {
            Part::InlineData(data) => Some(data),
            Part::Text(_) => None,
        })
    }
}

// =============================================================================
// VIDEO GENERATION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRequest {
    pub model: String,
    pub prompt: String,
    pub image: InlineData,
    pub aspect_ratio: AspectRatio,
    pub resolution: String,
}

/// Snapshot of a long-running video job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoOperation {
    pub name: String,
    pub done: bool,
    /// Output reference, present only on a completed job.
    pub video_uri: Option<String>,
    /// Upstream error message for a job that finished unsuccessfully.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoBytes {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

// =============================================================================
// API TRAIT
// =============================================================================

/// Raw provider calls. Enables mocking in tests.
#[async_trait::async_trait]
pub trait GenerativeApi: Send + Sync {
    /// Single request/response content generation (text, vision, image).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails, the response is
    /// malformed, or no key is selected.
    async fn generate_content(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError>;

    /// Submit a video job.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the job cannot be submitted.
    async fn start_video(&self, request: &VideoRequest) -> Result<VideoOperation, ApiError>;

    /// Fetch the current state of a submitted job.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the status request fails.
    async fn poll_video(&self, operation_name: &str) -> Result<VideoOperation, ApiError>;

    /// Fetch the finished video bytes.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the download fails.
    async fn download_video(&self, uri: &str) -> Result<VideoBytes, ApiError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
