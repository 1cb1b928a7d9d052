//! Gemini REST client.
//!
//! Thin HTTP wrapper over `models/{model}:generateContent`,
//! `models/{model}:predictLongRunning` and the operations endpoint. Body
//! building and response parsing are pure functions for testability. The key
//! is read from the credential store on every request, so a key selected at
//! runtime takes effect without rebuilding the client.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};

use super::types::{
    ApiError, GenerateRequest, GenerateResponse, GenerativeApi, InlineData, Part, VideoBytes, VideoOperation,
    VideoRequest,
};
use crate::config::GatewayConfig;
use crate::credentials::CredentialStore;

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_VIDEO_MIME: &str = "video/mp4";

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialStore>,
}

impl GeminiClient {
    /// Build a client for the configured base URL and timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &GatewayConfig, credentials: Arc<CredentialStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone(), credentials })
    }

    fn api_key(&self) -> Result<String, ApiError> {
        self.credentials.api_key().ok_or(ApiError::MissingCredential)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<String, ApiError> {
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, self.api_key()?)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::ApiRequest(e.to_string()))?;
        read_text(response).await
    }
}

async fn read_text(response: reqwest::Response) -> Result<String, ApiError> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::ApiRequest(e.to_string()))?;
    if !(200..300).contains(&status) {
        return Err(ApiError::ApiResponse { status, body: text });
    }
    Ok(text)
}

#[async_trait::async_trait]
impl GenerativeApi for GeminiClient {
    async fn generate_content(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        let text = self.post_json(&url, &generate_body(request)).await?;
        parse_generate_response(&text)
    }

    async fn start_video(&self, request: &VideoRequest) -> Result<VideoOperation, ApiError> {
        let url = format!("{}/models/{}:predictLongRunning", self.base_url, request.model);
        let text = self.post_json(&url, &video_body(request)).await?;
        parse_operation(&text)
    }

    async fn poll_video(&self, operation_name: &str) -> Result<VideoOperation, ApiError> {
        let url = format!("{}/{}", self.base_url, operation_name.trim_start_matches('/'));
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, self.api_key()?)
            .send()
            .await
            .map_err(|e| ApiError::ApiRequest(e.to_string()))?;
        parse_operation(&read_text(response).await?)
    }

    async fn download_video(&self, uri: &str) -> Result<VideoBytes, ApiError> {
        let response = self
            .http
            .get(uri)
            .header(API_KEY_HEADER, self.api_key()?)
            .send()
            .await
            .map_err(|e| ApiError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::ApiResponse { status, body });
        }
        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("video/"))
            .unwrap_or(DEFAULT_VIDEO_MIME)
            .to_owned();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::ApiRequest(e.to_string()))?;
        Ok(VideoBytes { mime_type, bytes: bytes.to_vec() })
    }
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

fn generate_body(request: &GenerateRequest) -> Value {
    let mut body = json!({
        "contents": [{ "role": "user", "parts": request.parts }],
    });
    if let Some(system) = &request.system_instruction {
        body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
    }
    if let Some(config) = &request.image_config {
        body["generationConfig"] = json!({
            "responseModalities": ["TEXT", "IMAGE"],
            "imageConfig": config,
        });
    }
    body
}

fn video_body(request: &VideoRequest) -> Value {
    json!({
        "instances": [{
            "prompt": request.prompt,
            "image": {
                "bytesBase64Encoded": request.image.data,
                "mimeType": request.image.mime_type,
            },
        }],
        "parameters": {
            "aspectRatio": request.aspect_ratio,
            "resolution": request.resolution,
            "sampleCount": 1,
        },
    })
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerateResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Deserialize)]
struct WireCandidate {
    content: Option<WireContent>,
}

#[derive(Deserialize)]
struct WireContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
    /// Reasoning summaries; never surfaced as output.
    #[serde(default)]
    thought: bool,
}

fn parse_generate_response(json: &str) -> Result<GenerateResponse, ApiError> {
    let api: WireGenerateResponse = serde_json::from_str(json).map_err(|e| ApiError::ApiParse(e.to_string()))?;

    let parts = api
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.thought)
        .filter_map(|p| match (p.inline_data, p.text) {
            (Some(data), _) => Some(Part::InlineData(data)),
            (None, Some(text)) => Some(Part::Text(text)),
            (None, None) => None,
        })
        .collect();

    Ok(GenerateResponse { parts })
}

#[derive(Deserialize)]
struct WireOperation {
    name: String,
    #[serde(default)]
    done: bool,
    response: Option<WireOperationResponse>,
    error: Option<WireStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOperationResponse {
    generate_video_response: Option<WireVideoResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireVideoResponse {
    #[serde(default)]
    generated_samples: Vec<WireSample>,
}

#[derive(Deserialize)]
struct WireSample {
    video: Option<WireVideo>,
}

#[derive(Deserialize)]
struct WireVideo {
    uri: Option<String>,
}

#[derive(Deserialize)]
struct WireStatus {
    #[serde(default)]
    message: String,
}

fn parse_operation(json: &str) -> Result<VideoOperation, ApiError> {
    let op: WireOperation = serde_json::from_str(json).map_err(|e| ApiError::ApiParse(e.to_string()))?;

    let video_uri = op
        .response
        .and_then(|r| r.generate_video_response)
        .and_then(|r| r.generated_samples.into_iter().next())
        .and_then(|s| s.video)
        .and_then(|v| v.uri)
        .filter(|uri| !uri.is_empty());

    Ok(VideoOperation { name: op.name, done: op.done, video_uri, error: op.error.map(|e| e.message) })
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
