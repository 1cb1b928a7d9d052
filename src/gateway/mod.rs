//! Generation gateway: the only boundary to the generative AI provider.
//!
//! DESIGN
//! ======
//! One method per capability, each independently callable and failable.
//! Request construction, response unwrapping and failure translation live
//! here; transport lives behind [`GenerativeApi`]. Nothing is retried
//! automatically: a failure is surfaced and the user decides to try again.
//!
//! Gated operations (pro graphics, video) re-check the capability provider
//! on every call. A closed gate fails with
//! [`GatewayError::CapabilityMissing`] before any upstream request.

pub mod gemini;
#[cfg(test)]
pub mod mock;
pub mod persona;
pub mod types;
pub mod video;

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::ModelIds;
use crate::credentials::CredentialProvider;
use crate::error::ErrorCode;
use crate::prompt::{AspectRatio, AssetType, SloganBrief, compose};
use crate::services::blobs::{BlobStore, blob_url};
use crate::upload::EncodedFile;

pub use persona::{ContentKind, Persona};
pub use types::{ApiError, GenerativeApi};
use types::{GenerateRequest, ImageConfig, InlineData, Part, VideoRequest};
use video::PollPolicy;

const PRO_IMAGE_SIZE: &str = "2K";
const VIDEO_RESOLUTION: &str = "720p";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Claim analysis errored or returned no text.
    #[error("claim analysis failed: {0}")]
    Analysis(String),

    /// A text or image generation call errored or returned nothing usable.
    #[error("generation failed: {message}")]
    Generation { message: String, retryable: bool },

    /// The image model answered with text only.
    #[error("no image generated; the model returned only text")]
    NoImageReturned,

    /// The video job failed or finished without an output reference.
    #[error("video generation failed: {0}")]
    VideoGeneration(String),

    #[error("video generation did not finish within {secs}s")]
    VideoTimedOut { secs: u64 },

    #[error("video generation cancelled")]
    Cancelled,

    /// A gated operation was invoked without a selected key.
    #[error("select an API key to use this studio")]
    CapabilityMissing,
}

impl GatewayError {
    fn from_api(err: &ApiError) -> Self {
        match err {
            ApiError::MissingCredential => Self::CapabilityMissing,
            other => Self::Generation { message: other.to_string(), retryable: other.retryable() },
        }
    }

    fn empty(what: &str) -> Self {
        Self::Generation { message: format!("the model returned no {what}"), retryable: true }
    }
}

impl ErrorCode for GatewayError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Analysis(_) => "E_ANALYSIS",
            Self::Generation { .. } => "E_GENERATION",
            Self::NoImageReturned => "E_NO_IMAGE_RETURNED",
            Self::VideoGeneration(_) => "E_VIDEO_GENERATION",
            Self::VideoTimedOut { .. } => "E_VIDEO_TIMEOUT",
            Self::Cancelled => "E_CANCELLED",
            Self::CapabilityMissing => "E_CAPABILITY_MISSING",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Generation { retryable, .. } => *retryable,
            Self::Analysis(_) | Self::NoImageReturned | Self::VideoGeneration(_) | Self::VideoTimedOut { .. } => true,
            Self::Cancelled | Self::CapabilityMissing => false,
        }
    }
}

// =============================================================================
// RESULTS
// =============================================================================

const DEFAULT_IMAGE_STEM: &str = "image";
const EDITED_IMAGE_STEM: &str = "edited-image";
const VIDEO_STEM: &str = "video";

/// File extension for a MIME type; unknown types fall back to their subtype.
#[must_use]
pub fn extension_for(mime_type: &str) -> &str {
    let essence = mime_type.split(';').next().unwrap_or_default().trim();
    match essence {
        "image/jpeg" => "jpg",
        "image/svg+xml" => "svg",
        "video/quicktime" => "mov",
        other => match other.split_once('/') {
            Some((_, sub)) if !sub.is_empty() && sub.chars().all(|c| c.is_ascii_alphanumeric()) => sub,
            _ => "bin",
        },
    }
}

/// Suggested file name for a download: `stem` lower-cased with runs of
/// other characters collapsed to `-`, plus the MIME extension.
#[must_use]
pub fn download_name(stem: &str, mime_type: &str) -> String {
    let mut slug = String::with_capacity(stem.len());
    for c in stem.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { DEFAULT_IMAGE_STEM } else { slug };
    format!("{slug}.{}", extension_for(mime_type))
}

/// A generated image, addressable directly by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub mime_type: String,
    pub data_uri: String,
    pub download_name: String,
}

impl ImageResult {
    /// Rename the suggested download after `stem`.
    #[must_use]
    pub fn named(mut self, stem: &str) -> Self {
        self.download_name = download_name(stem, &self.mime_type);
        self
    }
}

impl From<&InlineData> for ImageResult {
    fn from(data: &InlineData) -> Self {
        Self {
            mime_type: data.mime_type.clone(),
            data_uri: data.data_uri(),
            download_name: download_name(DEFAULT_IMAGE_STEM, &data.mime_type),
        }
    }
}

/// A downloaded video held in the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResult {
    pub blob_id: Uuid,
    pub url: String,
    pub mime_type: String,
    pub download_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationResult {
    Image(ImageResult),
    Text { text: String },
    Video(VideoResult),
}

impl GenerationResult {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

// =============================================================================
// GATEWAY
// =============================================================================

pub struct Gateway {
    api: Arc<dyn GenerativeApi>,
    capability: Arc<dyn CredentialProvider>,
    models: ModelIds,
    video_poll: PollPolicy,
    blobs: Arc<BlobStore>,
}

impl Gateway {
    #[must_use]
    pub fn new(
        api: Arc<dyn GenerativeApi>,
        capability: Arc<dyn CredentialProvider>,
        models: ModelIds,
        video_poll: PollPolicy,
        blobs: Arc<BlobStore>,
    ) -> Self {
        Self { api, capability, models, video_poll, blobs }
    }

    #[must_use]
    pub fn capability(&self) -> Arc<dyn CredentialProvider> {
        Arc::clone(&self.capability)
    }

    async fn ensure_capability(&self) -> Result<(), GatewayError> {
        if self.capability.has_credential().await { Ok(()) } else { Err(GatewayError::CapabilityMissing) }
    }

    /// Analyze a claim narrative with an optional supporting document.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Analysis`] if the call errors or yields no
    /// text. Callers show a fallback message instead of the raw detail.
    pub async fn analyze_claim(&self, narrative: &str, file: Option<&EncodedFile>) -> Result<String, GatewayError> {
        let mut parts: Vec<Part> = file.map(Part::from).into_iter().collect();
        parts.push(Part::text(claim_analysis_prompt(narrative)));
        let request = GenerateRequest::new(&self.models.analysis, parts);

        let response = self.api.generate_content(&request).await.map_err(|e| {
            tracing::warn!(error = %e, "claim analysis request failed");
            GatewayError::Analysis(e.to_string())
        })?;
        response.text().ok_or_else(|| {
            tracing::warn!("claim analysis returned no text");
            GatewayError::Analysis("no text returned".into())
        })
    }

    /// Free-form marketing copy in the chosen persona's tone.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Generation`] if the call errors or yields no
    /// text.
    pub async fn generate_marketing_content(
        &self,
        topic: &str,
        kind: ContentKind,
        persona: Persona,
    ) -> Result<String, GatewayError> {
        let request = GenerateRequest::new(&self.models.marketing, vec![Part::text(kind.prompt(topic))])
            .with_system(persona.system_instruction());
        self.generate_text(&request).await
    }

    /// Slogans from a structured brief. Always uses the Grok persona.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Generation`] if the call errors or yields no
    /// text.
    pub async fn generate_grok_slogans(&self, brief: &SloganBrief) -> Result<String, GatewayError> {
        let composition = compose(AssetType::Slogan, &brief.to_fields(), AspectRatio::Square, false);
        let text = composition
            .prompts()
            .first()
            .map(|p| p.text.clone())
            .unwrap_or_default();
        let request = GenerateRequest::new(&self.models.marketing, vec![Part::text(text)])
            .with_system(Persona::Grok.system_instruction());
        self.generate_text(&request).await
    }

    async fn generate_text(&self, request: &GenerateRequest) -> Result<String, GatewayError> {
        let response = self.api.generate_content(request).await.map_err(|e| {
            tracing::warn!(error = %e, model = %request.model, "text generation failed");
            GatewayError::from_api(&e)
        })?;
        response.text().ok_or_else(|| GatewayError::empty("text"))
    }

    /// Single-turn image edit.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NoImageReturned`] when the response carries
    /// only text, or [`GatewayError::Generation`] when the call errors.
    pub async fn edit_image(&self, image: &EncodedFile, instruction: &str) -> Result<ImageResult, GatewayError> {
        let request = GenerateRequest::new(&self.models.image_edit, vec![Part::from(image), Part::text(instruction)]);
        self.generate_image(&request)
            .await
            .map(|image| image.named(EDITED_IMAGE_STEM))
    }

    /// High-resolution marketing graphic. Gated on the capability provider.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CapabilityMissing`] when no key is selected,
    /// [`GatewayError::NoImageReturned`] on a text-only response, or
    /// [`GatewayError::Generation`] when the call errors.
    pub async fn generate_pro_graphics(
        &self,
        prompt_text: &str,
        asset_tag: &str,
        image: Option<&EncodedFile>,
        aspect_ratio: AspectRatio,
    ) -> Result<ImageResult, GatewayError> {
        self.ensure_capability().await?;

        let mut parts: Vec<Part> = image.map(Part::from).into_iter().collect();
        parts.push(Part::text(pro_graphics_prompt(prompt_text, asset_tag)));
        let request = GenerateRequest::new(&self.models.graphics, parts).with_image_config(ImageConfig {
            aspect_ratio,
            image_size: Some(PRO_IMAGE_SIZE.to_owned()),
        });
        tracing::info!(asset = %asset_tag, ratio = %aspect_ratio, "generating graphic");
        self.generate_image(&request).await
    }

    async fn generate_image(&self, request: &GenerateRequest) -> Result<ImageResult, GatewayError> {
        let response = self.api.generate_content(request).await.map_err(|e| {
            tracing::warn!(error = %e, model = %request.model, "image generation failed");
            GatewayError::from_api(&e)
        })?;
        match response.first_image() {
            Some(image) => Ok(ImageResult::from(image)),
            None => {
                tracing::warn!(model = %request.model, "image model returned text only");
                Err(GatewayError::NoImageReturned)
            }
        }
    }

    /// Animate a still image. Submits the job, polls until done, downloads
    /// the result into the blob store. Gated on the capability provider.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CapabilityMissing`] when no key is selected,
    /// [`GatewayError::VideoTimedOut`] or [`GatewayError::Cancelled`] when
    /// polling stops early, or [`GatewayError::VideoGeneration`] when the job
    /// fails or finishes without an output reference.
    pub async fn generate_video(
        &self,
        image: &EncodedFile,
        motion: &str,
        cancel: &CancellationToken,
    ) -> Result<VideoResult, GatewayError> {
        self.ensure_capability().await?;

        let request = VideoRequest {
            model: self.models.video.clone(),
            prompt: motion.to_owned(),
            image: InlineData::from(image),
            aspect_ratio: AspectRatio::Wide,
            resolution: VIDEO_RESOLUTION.to_owned(),
        };
        let operation = self.api.start_video(&request).await.map_err(|e| match e {
            ApiError::MissingCredential => GatewayError::CapabilityMissing,
            other => GatewayError::VideoGeneration(other.to_string()),
        })?;
        tracing::info!(operation = %operation.name, "video job submitted");

        let finished = video::wait_for_completion(self.api.as_ref(), operation, &self.video_poll, cancel).await?;
        if let Some(message) = finished.error {
            return Err(GatewayError::VideoGeneration(message));
        }
        let uri = finished
            .video_uri
            .ok_or_else(|| GatewayError::VideoGeneration("job finished without a video".into()))?;

        let video = self
            .api
            .download_video(&uri)
            .await
            .map_err(|e| GatewayError::VideoGeneration(e.to_string()))?;
        let blob_id = self.blobs.insert(&video.mime_type, video.bytes).await;
        tracing::info!(%blob_id, "video stored");
        let download_name = download_name(VIDEO_STEM, &video.mime_type);
        Ok(VideoResult { blob_id, url: blob_url(blob_id), mime_type: video.mime_type, download_name })
    }
}

// =============================================================================
// PROMPTS
// =============================================================================

fn claim_analysis_prompt(narrative: &str) -> String {
    format!(
        "You are a professional insurance and claim estimation assistant for \"Estimate Reliance\". \
         Analyze this claim submission.\n\
         If it's a document, summarize the key points, cost estimates if visible, and missing information.\n\
         If it's a description, provide professional reassurance and next steps for the estimate process.\n\
         \n\
         User input: {narrative}"
    )
}

fn pro_graphics_prompt(prompt_text: &str, asset_tag: &str) -> String {
    format!(
        "Create a high-quality professional {asset_tag} design. Description: {prompt_text}. \
         Ensure text is legible and the design is suitable for print or digital marketing."
    )
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
