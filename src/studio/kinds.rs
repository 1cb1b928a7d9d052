//! Per-asset studio configurations.

use tokio_util::sync::CancellationToken;

use super::{AssetRequest, StudioForm, StudioKind, StudioOutput, ValidationError, validate_table};
use crate::gateway::{Gateway, GatewayError, GenerationResult};
use crate::prompt::fields::{self, INSTRUCTION};
use crate::prompt::{AspectRatio, AssetType, ComposedPrompt, Composition, FieldValues, SloganBrief};
use crate::upload::EncodedFile;

/// Motion text pre-filled in the video studio form.
pub const DEFAULT_VIDEO_MOTION: &str = "Cinematic, slow motion animation";

const GRAPHICS_FAILURE: &str = "Generation failed. Ensure paid API key is active.";
const CLAIM_FAILURE: &str = "An error occurred while processing your claim.";
const SLOGAN_FAILURE: &str = "Slogan generation failed. Please try again.";
const VIDEO_FAILURE: &str = "Generation failed. Ensure you have selected a valid paid API key.";
const EDIT_FAILURE: &str = "Healing failed. Please try again.";

fn missing_composition() -> GatewayError {
    GatewayError::Generation { message: "nothing to generate".into(), retryable: false }
}

/// Failures the user can act on keep their own message; anything else gets
/// the studio's generic text.
fn specific_or(err: &GatewayError, fallback: &str) -> String {
    match err {
        GatewayError::NoImageReturned
        | GatewayError::CapabilityMissing
        | GatewayError::VideoTimedOut { .. }
        | GatewayError::Cancelled => err.to_string(),
        _ => fallback.to_owned(),
    }
}

// =============================================================================
// GRAPHICS
// =============================================================================

/// Logo, business card, yard sign, banner or flyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicStudio {
    asset: AssetType,
}

impl GraphicStudio {
    /// `None` for asset types that are not rendered as graphics.
    #[must_use]
    pub fn new(asset: AssetType) -> Option<Self> {
        asset.is_graphic().then_some(Self { asset })
    }

    #[must_use]
    pub fn asset(&self) -> AssetType {
        self.asset
    }
}

async fn render(
    gateway: &Gateway,
    prompt: &ComposedPrompt,
    image: Option<&EncodedFile>,
) -> Result<GenerationResult, GatewayError> {
    let stem = match prompt.aux.side {
        Some(side) => format!("{} {}", prompt.aux.asset_tag, side.as_str()),
        None => prompt.aux.asset_tag.to_owned(),
    };
    gateway
        .generate_pro_graphics(&prompt.text, prompt.aux.asset_tag, image, prompt.aux.aspect_ratio)
        .await
        .map(|result| GenerationResult::Image(result.named(&stem)))
}

#[async_trait::async_trait]
impl StudioKind for GraphicStudio {
    fn name(&self) -> &'static str {
        self.asset.tag()
    }

    fn requires_capability(&self) -> bool {
        true
    }

    fn validate(&self, form: &StudioForm) -> Result<(), ValidationError> {
        validate_table(self.asset, form)
    }

    fn prepare(&self, form: &StudioForm) -> AssetRequest {
        AssetRequest::composed(self.asset, form)
    }

    async fn invoke(
        &self,
        gateway: &Gateway,
        request: AssetRequest,
        _cancel: &CancellationToken,
    ) -> Result<StudioOutput, GatewayError> {
        let image = request.reference_image.as_ref();
        match request.composition {
            Some(Composition::Single(prompt)) => Ok(StudioOutput::Single(render(gateway, &prompt, image).await?)),
            Some(Composition::Pair { back, front }) => {
                let (back, front) =
                    futures::try_join!(render(gateway, &back, image), render(gateway, &front, image))?;
                Ok(StudioOutput::Pair { back, front })
            }
            None => Err(missing_composition()),
        }
    }

    fn failure_message(&self, err: &GatewayError) -> String {
        specific_or(err, GRAPHICS_FAILURE)
    }
}

// =============================================================================
// CLAIM
// =============================================================================

/// Restoration claim intake analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClaimStudio;

#[async_trait::async_trait]
impl StudioKind for ClaimStudio {
    fn name(&self) -> &'static str {
        AssetType::Claim.tag()
    }

    fn requires_capability(&self) -> bool {
        false
    }

    fn validate(&self, form: &StudioForm) -> Result<(), ValidationError> {
        if form.fields.is_blank(fields::CLAIMS_INFO) && form.reference_image.is_none() {
            return Err(ValidationError::MissingClaimInput);
        }
        Ok(())
    }

    fn prepare(&self, form: &StudioForm) -> AssetRequest {
        AssetRequest::composed(AssetType::Claim, form)
    }

    async fn invoke(
        &self,
        gateway: &Gateway,
        request: AssetRequest,
        _cancel: &CancellationToken,
    ) -> Result<StudioOutput, GatewayError> {
        let Some(Composition::Single(prompt)) = request.composition else {
            return Err(missing_composition());
        };
        let text = gateway
            .analyze_claim(&prompt.text, request.reference_image.as_ref())
            .await?;
        Ok(StudioOutput::Single(GenerationResult::text(text)))
    }

    fn failure_message(&self, _err: &GatewayError) -> String {
        CLAIM_FAILURE.to_owned()
    }
}

// =============================================================================
// SLOGANS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SloganStudio;

#[async_trait::async_trait]
impl StudioKind for SloganStudio {
    fn name(&self) -> &'static str {
        AssetType::Slogan.tag()
    }

    fn requires_capability(&self) -> bool {
        false
    }

    fn validate(&self, form: &StudioForm) -> Result<(), ValidationError> {
        validate_table(AssetType::Slogan, form)
    }

    fn prepare(&self, form: &StudioForm) -> AssetRequest {
        AssetRequest::composed(AssetType::Slogan, form)
    }

    async fn invoke(
        &self,
        gateway: &Gateway,
        request: AssetRequest,
        _cancel: &CancellationToken,
    ) -> Result<StudioOutput, GatewayError> {
        let brief = SloganBrief::from_fields(&request.fields);
        let text = gateway.generate_grok_slogans(&brief).await?;
        Ok(StudioOutput::Single(GenerationResult::text(text)))
    }

    fn failure_message(&self, err: &GatewayError) -> String {
        specific_or(err, SLOGAN_FAILURE)
    }
}

// =============================================================================
// VIDEO
// =============================================================================

/// Animate a still photo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoStudio;

#[async_trait::async_trait]
impl StudioKind for VideoStudio {
    fn name(&self) -> &'static str {
        AssetType::Video.tag()
    }

    fn requires_capability(&self) -> bool {
        true
    }

    fn initial_form(&self) -> StudioForm {
        StudioForm {
            fields: FieldValues::new().with(fields::MOTION, DEFAULT_VIDEO_MOTION),
            ..StudioForm::default()
        }
    }

    fn validate(&self, form: &StudioForm) -> Result<(), ValidationError> {
        validate_table(AssetType::Video, form)
    }

    fn prepare(&self, form: &StudioForm) -> AssetRequest {
        AssetRequest::composed(AssetType::Video, form)
    }

    async fn invoke(
        &self,
        gateway: &Gateway,
        request: AssetRequest,
        cancel: &CancellationToken,
    ) -> Result<StudioOutput, GatewayError> {
        let (Some(image), Some(Composition::Single(prompt))) = (request.reference_image, request.composition) else {
            return Err(missing_composition());
        };
        let video = gateway.generate_video(&image, &prompt.text, cancel).await?;
        Ok(StudioOutput::Single(GenerationResult::Video(video)))
    }

    fn failure_message(&self, err: &GatewayError) -> String {
        specific_or(err, VIDEO_FAILURE)
    }
}

// =============================================================================
// IMAGE EDIT
// =============================================================================

/// Single-turn photo edit ("heal") from a free-text instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageEditStudio;

#[async_trait::async_trait]
impl StudioKind for ImageEditStudio {
    fn name(&self) -> &'static str {
        "Image Edit"
    }

    fn requires_capability(&self) -> bool {
        false
    }

    fn validate(&self, form: &StudioForm) -> Result<(), ValidationError> {
        if form.reference_image.is_none() {
            return Err(ValidationError::MissingReferenceImage);
        }
        if form.fields.is_blank(INSTRUCTION) {
            return Err(ValidationError::MissingInstruction);
        }
        Ok(())
    }

    fn prepare(&self, form: &StudioForm) -> AssetRequest {
        AssetRequest {
            asset_type: None,
            fields: form.fields.clone(),
            reference_image: form.reference_image.clone(),
            aspect_ratio: form.aspect_ratio.unwrap_or(AspectRatio::Square),
            composition: None,
        }
    }

    async fn invoke(
        &self,
        gateway: &Gateway,
        request: AssetRequest,
        _cancel: &CancellationToken,
    ) -> Result<StudioOutput, GatewayError> {
        let Some(image) = request.reference_image else {
            return Err(missing_composition());
        };
        let result = gateway
            .edit_image(&image, request.fields.trimmed(INSTRUCTION))
            .await?;
        Ok(StudioOutput::Single(GenerationResult::Image(result)))
    }

    fn failure_message(&self, err: &GatewayError) -> String {
        specific_or(err, EDIT_FAILURE)
    }
}
