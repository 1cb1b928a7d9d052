//! Claim-intake submission side channel.
//!
//! DESIGN
//! ======
//! A claim is forwarded to the business independently of the AI analysis.
//! Three delivery modes share one parameter set (`template_params`):
//! EmailJS receives it as JSON, a form webhook receives it as a multipart
//! body with the raw file, and Resend renders it into the HTML template.
//! EmailJS and Resend carry the file inline, so files above the configured
//! threshold are replaced by a `file_note` instead of failing the send.

use std::collections::BTreeMap;
use std::time::Duration;

use resend_rs::Resend;
use resend_rs::types::{CreateAttachment, CreateEmailBaseOptions};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::config::{DeliveryTarget, SubmissionConfig};
use crate::error::ErrorCode;
use crate::prompt::FieldValues;
use crate::prompt::fields;
use crate::upload::EncodedFile;

const CLAIM_TEMPLATE: &str = include_str!("../../templates/claim_submission.html");
const EMAIL_SUBJECT: &str = "New Restoration Claim Submission";
const NOT_PROVIDED: &str = "Not provided";
const DEFAULT_ATTACHMENT_TYPE: &str = "application/octet-stream";
const SEND_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission channel is not configured")]
    NotConfigured,

    #[error("submission rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("submission request failed: {0}")]
    Transport(String),

    #[error("email delivery failed: {0}")]
    Email(String),

    #[error("attachment could not be prepared: {0}")]
    Attachment(String),
}

impl ErrorCode for SubmissionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "E_SUBMISSION_NOT_CONFIGURED",
            Self::Rejected { .. } => "E_SUBMISSION_REJECTED",
            Self::Transport(_) => "E_SUBMISSION_TRANSPORT",
            Self::Email(_) => "E_SUBMISSION_EMAIL",
            Self::Attachment(_) => "E_SUBMISSION_ATTACHMENT",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Rejected { status, .. } => *status == 429 || *status >= 500,
            Self::Transport(_) | Self::Email(_) => true,
            Self::NotConfigured | Self::Attachment(_) => false,
        }
    }
}

// =============================================================================
// INTAKE
// =============================================================================

/// The claim form as the business receives it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimIntake {
    pub homeowner_name: String,
    pub property_address: String,
    pub phone_number: String,
    pub contractor_info: String,
    pub claims_info: String,
    #[serde(skip)]
    pub file: Option<EncodedFile>,
}

impl ClaimIntake {
    #[must_use]
    pub fn from_fields(values: &FieldValues, file: Option<EncodedFile>) -> Self {
        Self {
            homeowner_name: values.trimmed(fields::HOMEOWNER_NAME).to_owned(),
            property_address: values.trimmed(fields::PROPERTY_ADDRESS).to_owned(),
            phone_number: values.trimmed(fields::PHONE_NUMBER).to_owned(),
            contractor_info: values.trimmed(fields::CONTRACTOR_INFO).to_owned(),
            claims_info: values.trimmed(fields::CLAIMS_INFO).to_owned(),
            file,
        }
    }
}

fn or_not_provided(value: &str) -> String {
    if value.trim().is_empty() { NOT_PROVIDED.to_owned() } else { value.to_owned() }
}

/// Attachment decision for inline delivery modes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Inline<'a> {
    None,
    Attach(&'a EncodedFile),
    TooLarge { note: String },
}

fn inline_attachment(file: Option<&EncodedFile>, max_bytes: usize) -> Inline<'_> {
    let Some(file) = file else {
        return Inline::None;
    };
    let size = file.approximate_size();
    if size <= max_bytes {
        return Inline::Attach(file);
    }
    #[allow(clippy::cast_precision_loss)]
    let kib = size as f64 / 1024.0;
    Inline::TooLarge {
        note: format!(
            "File \"{}\" ({kib:.1}KB) was uploaded but exceeds email attachment limit. \
             Please contact submitter for the file.",
            file.display_name
        ),
    }
}

/// Template parameters shared by every delivery mode.
#[must_use]
pub fn template_params(
    intake: &ClaimIntake,
    recipient: Option<&str>,
    max_attachment_bytes: usize,
    submitted_at: &str,
) -> BTreeMap<&'static str, String> {
    let file_name = intake.file.as_ref().map(|f| f.display_name.as_str());
    let mut params = BTreeMap::from([
        ("to_email", recipient.unwrap_or_default().to_owned()),
        ("from_name", or_not_provided(&intake.homeowner_name)),
        ("client_name", or_not_provided(&intake.homeowner_name)),
        ("property_address", or_not_provided(&intake.property_address)),
        ("phone_number", or_not_provided(&intake.phone_number)),
        ("contractor_info", or_not_provided(&intake.contractor_info)),
        ("task_details", or_not_provided(&intake.claims_info)),
        ("submission_date", submitted_at.to_owned()),
        ("file_attached", if file_name.is_some() { "Yes" } else { "No" }.to_owned()),
        ("file_name", file_name.unwrap_or("None").to_owned()),
    ]);

    match inline_attachment(intake.file.as_ref(), max_attachment_bytes) {
        Inline::None => {}
        Inline::Attach(file) => {
            params.insert("attachment", file.data.clone());
            params.insert("attachment_name", file.display_name.clone());
            params.insert("attachment_type", mime_or_default(&file.mime_type).to_owned());
        }
        Inline::TooLarge { note } => {
            params.insert("file_note", note);
        }
    }
    params
}

fn mime_or_default(mime: &str) -> &str {
    if mime.trim().is_empty() { DEFAULT_ATTACHMENT_TYPE } else { mime }
}

/// Labeled text parts of the webhook form, in submission order.
#[must_use]
pub fn webhook_fields(intake: &ClaimIntake, submitted_at: &str) -> Vec<(&'static str, String)> {
    vec![
        ("Client Name", intake.homeowner_name.clone()),
        ("Property Address", intake.property_address.clone()),
        ("Phone Number", intake.phone_number.clone()),
        ("Contractor Info", intake.contractor_info.clone()),
        ("Task Details", intake.claims_info.clone()),
        ("Submission Date", submitted_at.to_owned()),
    ]
}

/// EmailJS REST payload.
#[must_use]
pub fn emailjs_body(
    service_id: &str,
    template_id: &str,
    public_key: &str,
    params: &BTreeMap<&'static str, String>,
) -> Value {
    json!({
        "service_id": service_id,
        "template_id": template_id,
        "user_id": public_key,
        "template_params": params,
    })
}

// =============================================================================
// TEMPLATE
// =============================================================================

#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Fill the HTML email template. Every value is escaped.
#[must_use]
pub fn render_claim_template(params: &BTreeMap<&'static str, String>) -> String {
    let value = |key: &str| escape_html(params.get(key).map_or("", String::as_str));
    CLAIM_TEMPLATE
        .replace("{{SUBMISSION_DATE}}", &value("submission_date"))
        .replace("{{CLIENT_NAME}}", &value("client_name"))
        .replace("{{PROPERTY_ADDRESS}}", &value("property_address"))
        .replace("{{PHONE_NUMBER}}", &value("phone_number"))
        .replace("{{CONTRACTOR_INFO}}", &value("contractor_info"))
        .replace("{{TASK_DETAILS}}", &value("task_details"))
        .replace("{{FILE_ATTACHED}}", &value("file_attached"))
        .replace("{{FILE_NAME}}", &value("file_name"))
        .replace("{{FILE_NOTE}}", &value("file_note"))
}

fn submitted_at() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::now_utc().unix_timestamp().to_string())
}

// =============================================================================
// SUBMITTER
// =============================================================================

/// Delivers claim intakes to the configured target.
pub struct Submitter {
    http: reqwest::Client,
    config: Option<SubmissionConfig>,
}

impl Submitter {
    /// `None` builds a submitter that rejects every send with
    /// [`SubmissionError::NotConfigured`].
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::Transport`] if the HTTP client fails to
    /// build.
    pub fn new(config: Option<SubmissionConfig>) -> Result<Self, SubmissionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn mode(&self) -> Option<&'static str> {
        self.config.as_ref().map(|c| c.target.mode_name())
    }

    /// Forward one intake.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::NotConfigured`] without a target,
    /// [`SubmissionError::Rejected`] on a non-2xx answer, or the transport
    /// failure of the chosen mode.
    pub async fn submit(&self, intake: &ClaimIntake) -> Result<(), SubmissionError> {
        let config = self.config.as_ref().ok_or(SubmissionError::NotConfigured)?;
        let submitted_at = submitted_at();
        let outcome = match &config.target {
            DeliveryTarget::EmailJs { api_url, service_id, template_id, public_key, recipient } => {
                let params = template_params(intake, recipient.as_deref(), config.max_attachment_bytes, &submitted_at);
                let body = emailjs_body(service_id, template_id, public_key, &params);
                self.send_emailjs(api_url, &body).await
            }
            DeliveryTarget::Multipart { webhook_url } => self.send_webhook(webhook_url, intake, &submitted_at).await,
            DeliveryTarget::Resend { api_key, from, recipient } => {
                let params = template_params(intake, Some(recipient), config.max_attachment_bytes, &submitted_at);
                send_resend(api_key, from, recipient, intake, &params, config.max_attachment_bytes).await
            }
        };
        match &outcome {
            Ok(()) => tracing::info!(mode = config.target.mode_name(), "claim submission delivered"),
            Err(e) => tracing::warn!(mode = config.target.mode_name(), error = %e, "claim submission failed"),
        }
        outcome
    }

    async fn send_emailjs(&self, api_url: &str, body: &Value) -> Result<(), SubmissionError> {
        let response = self
            .http
            .post(api_url)
            .json(body)
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;
        check_status(response).await
    }

    async fn send_webhook(&self, url: &str, intake: &ClaimIntake, submitted_at: &str) -> Result<(), SubmissionError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in webhook_fields(intake, submitted_at) {
            form = form.text(name, value);
        }
        if let Some(file) = &intake.file {
            let bytes = file.decode().map_err(|e| SubmissionError::Attachment(e.to_string()))?;
            let part = reqwest::multipart::Part::bytes(bytes)
                .file_name(file.display_name.clone())
                .mime_str(mime_or_default(&file.mime_type))
                .map_err(|e| SubmissionError::Attachment(e.to_string()))?;
            form = form.part("attachment", part);
        }

        let response = self
            .http
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;
        check_status(response).await
    }
}

async fn check_status(response: reqwest::Response) -> Result<(), SubmissionError> {
    let status = response.status().as_u16();
    if (200..300).contains(&status) {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(SubmissionError::Rejected { status, body })
}

async fn send_resend(
    api_key: &str,
    from: &str,
    recipient: &str,
    intake: &ClaimIntake,
    params: &BTreeMap<&'static str, String>,
    max_attachment_bytes: usize,
) -> Result<(), SubmissionError> {
    let resend = Resend::new(api_key);
    let html = render_claim_template(params);
    let mut email = CreateEmailBaseOptions::new(from, [recipient], EMAIL_SUBJECT).with_html(&html);

    if let Inline::Attach(file) = inline_attachment(intake.file.as_ref(), max_attachment_bytes) {
        let bytes = file.decode().map_err(|e| SubmissionError::Attachment(e.to_string()))?;
        let attachment = CreateAttachment::from_content(bytes)
            .with_filename(&file.display_name)
            .with_content_type(mime_or_default(&file.mime_type));
        email = email.with_attachment(attachment);
    }

    resend
        .emails
        .send(email)
        .await
        .map_err(|e| SubmissionError::Email(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
#[path = "submission_test.rs"]
mod tests;
