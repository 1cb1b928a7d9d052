//! Studio views: one reusable submission pipeline, many thin configurations.
//!
//! DESIGN
//! ======
//! Every studio runs validate -> compose -> invoke -> render through the same
//! [`StudioView`]. A [`StudioKind`] supplies only the asset-specific pieces.
//! Submit is blocked while a request is pending, while the capability gate
//! is closed (for gated kinds) and while validation fails; a blocked submit
//! never reaches the gateway.

pub mod kinds;
pub mod lifecycle;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::credentials::{CredentialError, CredentialProvider};
use crate::error::{ErrorBody, ErrorCode};
use crate::gateway::{Gateway, GatewayError, GenerationResult};
use crate::prompt::fields::{self, FieldDescriptor};
use crate::prompt::{AspectRatio, AssetType, CardSide, Composition, FieldValues, compose};
use crate::upload::{EncodedFile, ReadError};
use crate::view::{CapabilityGate, GateStatus};

pub use kinds::{ClaimStudio, GraphicStudio, ImageEditStudio, SloganStudio, VideoStudio};
pub use lifecycle::{RequestLifecycle, Submission, Ticket};

// =============================================================================
// FORM AND REQUEST
// =============================================================================

/// Current form state of a studio.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudioForm {
    pub fields: FieldValues,
    pub reference_image: Option<EncodedFile>,
    pub aspect_ratio: Option<AspectRatio>,
}

/// Snapshot built fresh from the form on every submit; dropped once the
/// request completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub asset_type: Option<AssetType>,
    pub fields: FieldValues,
    pub reference_image: Option<EncodedFile>,
    pub aspect_ratio: AspectRatio,
    pub composition: Option<Composition>,
}

impl AssetRequest {
    /// Resolve the ratio and compose prompts from the asset's field table.
    #[must_use]
    pub fn composed(asset_type: AssetType, form: &StudioForm) -> Self {
        let aspect_ratio = asset_type.resolve_aspect_ratio(form.aspect_ratio);
        let composition = compose(asset_type, &form.fields, aspect_ratio, form.reference_image.is_some());
        Self {
            asset_type: Some(asset_type),
            fields: form.fields.clone(),
            reference_image: form.reference_image.clone(),
            aspect_ratio,
            composition: Some(composition),
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudioOutput {
    Single(GenerationResult),
    /// Business card: both sides succeed or the submission fails.
    Pair { back: GenerationResult, front: GenerationResult },
}

#[derive(Serialize)]
struct LabeledResult<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    side: Option<&'static str>,
    #[serde(flatten)]
    result: &'a GenerationResult,
}

impl StudioOutput {
    /// Results in display order, tagged with their card side when paired.
    #[must_use]
    pub fn results(&self) -> Vec<(Option<CardSide>, &GenerationResult)> {
        match self {
            Self::Single(result) => vec![(None, result)],
            Self::Pair { back, front } => vec![(Some(CardSide::Back), back), (Some(CardSide::Front), front)],
        }
    }
}

impl Serialize for StudioOutput {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let labeled: Vec<LabeledResult<'_>> = self
            .results()
            .into_iter()
            .map(|(side, result)| LabeledResult { side: side.map(CardSide::as_str), result })
            .collect();
        labeled.serialize(serializer)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{label} is required")]
    MissingField { label: &'static str },

    #[error("a reference image is required")]
    MissingReferenceImage,

    #[error("describe the claim or attach a document")]
    MissingClaimInput,

    #[error("an edit instruction is required")]
    MissingInstruction,

    #[error("the reference image could not be read: {message}")]
    UnreadableReferenceImage { code: &'static str, message: String },
}

impl From<ReadError> for ValidationError {
    fn from(err: ReadError) -> Self {
        Self::UnreadableReferenceImage { code: err.error_code(), message: err.to_string() }
    }
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "E_MISSING_FIELD",
            Self::MissingReferenceImage => "E_MISSING_REFERENCE_IMAGE",
            Self::MissingClaimInput => "E_MISSING_CLAIM_INPUT",
            Self::MissingInstruction => "E_MISSING_INSTRUCTION",
            Self::UnreadableReferenceImage { code, .. } => code,
        }
    }
}

/// Why the submit control is disabled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitBlocked {
    #[error("a request is already in progress")]
    Pending,

    #[error("select an API key to use this studio")]
    CapabilityMissing,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl ErrorCode for SubmitBlocked {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Pending => "E_PENDING",
            Self::CapabilityMissing => "E_CAPABILITY_MISSING",
            Self::Invalid(e) => e.error_code(),
        }
    }
}

/// Check the required fields of `asset_type`'s table, then its reference
/// image requirement.
///
/// # Errors
///
/// Returns the first missing field, or
/// [`ValidationError::MissingReferenceImage`].
pub fn validate_table(asset_type: AssetType, form: &StudioForm) -> Result<(), ValidationError> {
    let missing: Vec<&FieldDescriptor> = fields::missing_required(asset_type, &form.fields);
    if let Some(first) = missing.first() {
        return Err(ValidationError::MissingField { label: first.label });
    }
    if asset_type.requires_reference_image() && form.reference_image.is_none() {
        return Err(ValidationError::MissingReferenceImage);
    }
    Ok(())
}

// =============================================================================
// STUDIO KIND
// =============================================================================

/// Asset-specific pieces of a studio.
#[async_trait::async_trait]
pub trait StudioKind: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the studio sits behind the capability gate.
    fn requires_capability(&self) -> bool;

    fn initial_form(&self) -> StudioForm {
        StudioForm::default()
    }

    /// # Errors
    ///
    /// Returns the reason the form cannot be submitted.
    fn validate(&self, form: &StudioForm) -> Result<(), ValidationError>;

    fn prepare(&self, form: &StudioForm) -> AssetRequest;

    /// # Errors
    ///
    /// Returns the gateway failure for this request.
    async fn invoke(
        &self,
        gateway: &Gateway,
        request: AssetRequest,
        cancel: &CancellationToken,
    ) -> Result<StudioOutput, GatewayError>;

    /// User-facing text for a failure. Raw detail is logged, not shown.
    fn failure_message(&self, err: &GatewayError) -> String {
        err.to_string()
    }
}

// =============================================================================
// STUDIO VIEW
// =============================================================================

pub struct StudioView<K: StudioKind> {
    kind: K,
    gate: Option<CapabilityGate>,
    pub form: StudioForm,
    submission: Submission<StudioOutput>,
    cancel: CancellationToken,
}

impl<K: StudioKind> StudioView<K> {
    #[must_use]
    pub fn new(kind: K, capability: Arc<dyn CredentialProvider>) -> Self {
        let gate = kind.requires_capability().then(|| CapabilityGate::new(capability));
        let form = kind.initial_form();
        Self { kind, gate, form, submission: Submission::new(), cancel: CancellationToken::new() }
    }

    #[must_use]
    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Query the capability provider; ungated studios are always ready.
    pub async fn activate(&mut self) -> GateStatus {
        match &mut self.gate {
            Some(gate) => gate.activate().await,
            None => GateStatus::Ready,
        }
    }

    /// The gate's call-to-action: run the selection flow and re-query.
    ///
    /// # Errors
    ///
    /// Returns the flow's [`CredentialError`].
    pub async fn acquire_capability(&mut self) -> Result<GateStatus, CredentialError> {
        match &mut self.gate {
            Some(gate) => gate.acquire().await,
            None => Ok(GateStatus::Ready),
        }
    }

    #[must_use]
    pub fn gate_status(&self) -> GateStatus {
        self.gate.as_ref().map_or(GateStatus::Ready, CapabilityGate::status)
    }

    /// `false` when the view renders the acquisition call-to-action instead.
    #[must_use]
    pub fn shows_form(&self) -> bool {
        self.gate.as_ref().is_none_or(CapabilityGate::is_open)
    }

    /// Replace the form with one submitted whole. Fields left blank keep the
    /// kind's initial values.
    pub fn load_form(&mut self, form: StudioForm) {
        let defaults = self.kind.initial_form();
        self.form = form;
        for (name, value) in defaults.fields.iter() {
            if self.form.fields.is_blank(name) {
                self.form.fields.set(name, value);
            }
        }
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.form.fields.set(name, value);
    }

    pub fn select_file(&mut self, file: EncodedFile) {
        self.form.reference_image = Some(file);
    }

    #[must_use]
    pub fn state(&self) -> &RequestLifecycle<StudioOutput> {
        self.submission.state()
    }

    /// Why submit is disabled, if it is.
    ///
    /// # Errors
    ///
    /// Returns the first blocking reason.
    pub fn check_submit(&self) -> Result<(), SubmitBlocked> {
        if self.submission.state().is_pending() {
            return Err(SubmitBlocked::Pending);
        }
        if !self.shows_form() {
            return Err(SubmitBlocked::CapabilityMissing);
        }
        self.kind.validate(&self.form)?;
        if let Some(image) = &self.form.reference_image {
            image.decode().map_err(ValidationError::from)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.check_submit().is_ok()
    }

    /// Move to `Pending` and build the request. The caller invokes the
    /// gateway and reports back through [`StudioView::finish`].
    ///
    /// # Errors
    ///
    /// Returns [`SubmitBlocked`] when submit is disabled.
    pub fn begin_submit(&mut self) -> Result<(Ticket, AssetRequest, CancellationToken), SubmitBlocked> {
        self.check_submit()?;
        let ticket = self.submission.begin().ok_or(SubmitBlocked::Pending)?;
        self.cancel = CancellationToken::new();
        tracing::info!(studio = self.kind.name(), "submission started");
        Ok((ticket, self.kind.prepare(&self.form), self.cancel.clone()))
    }

    /// Apply a gateway outcome. Returns `false` for a stale ticket.
    pub fn finish(&mut self, ticket: Ticket, outcome: Result<StudioOutput, GatewayError>) -> bool {
        let outcome = outcome.map_err(|err| {
            tracing::warn!(studio = self.kind.name(), error = %err, "submission failed");
            ErrorBody { code: err.error_code(), message: self.kind.failure_message(&err), retryable: err.retryable() }
        });
        self.submission.complete(ticket, outcome)
    }

    /// Validate, compose, invoke and record the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitBlocked`] without calling the gateway when submit is
    /// disabled.
    pub async fn submit(&mut self, gateway: &Gateway) -> Result<&RequestLifecycle<StudioOutput>, SubmitBlocked> {
        let (ticket, request, cancel) = self.begin_submit()?;
        let outcome = self.kind.invoke(gateway, request, &cancel).await;
        self.finish(ticket, outcome);
        Ok(self.state())
    }

    /// Abandon the pending request; its completion will be discarded.
    pub fn cancel(&mut self) -> bool {
        self.cancel.cancel();
        self.submission.cancel(ErrorBody::from_error(&GatewayError::Cancelled))
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
