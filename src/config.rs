//! Typed configuration parsed from environment variables.
//!
//! Every parser takes a lookup function instead of reading the process
//! environment directly, so tests can feed a plain map.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ErrorCode;
use crate::gateway::video::PollPolicy;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_MARKETING_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_IMAGE_EDIT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_GRAPHICS_MODEL: &str = "gemini-3-pro-image-preview";
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";

pub const DEFAULT_VIDEO_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_VIDEO_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_VIDEO_POLL_BACKOFF: f64 = 1.0;

pub const DEFAULT_EMAILJS_API_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";
pub const DEFAULT_MAX_ATTACHMENT_BYTES: usize = 50 * 1024;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A value required by the selected configuration is absent.
    #[error("missing required config: env var {var} not set")]
    Missing { var: String },

    /// A value is present but malformed.
    #[error("config parse failed: {0}")]
    Parse(String),
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "E_CONFIG_MISSING",
            Self::Parse(_) => "E_CONFIG_PARSE",
        }
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub website_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub gateway: GatewayConfig,
}

impl AppConfig {
    /// Build the application config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when a numeric value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Build the application config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when a numeric value is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            website_dir: non_empty(&lookup, "WEBSITE_DIR").map(PathBuf::from),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            gateway: GatewayConfig::from_lookup(&lookup)?,
        })
    }
}

// =============================================================================
// GATEWAY CONFIG
// =============================================================================

/// Model identifier per gateway capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelIds {
    pub analysis: String,
    pub marketing: String,
    pub image_edit: String,
    pub graphics: String,
    pub video: String,
}

impl Default for ModelIds {
    fn default() -> Self {
        Self {
            analysis: DEFAULT_ANALYSIS_MODEL.to_owned(),
            marketing: DEFAULT_MARKETING_MODEL.to_owned(),
            image_edit: DEFAULT_IMAGE_EDIT_MODEL.to_owned(),
            graphics: DEFAULT_GRAPHICS_MODEL.to_owned(),
            video: DEFAULT_VIDEO_MODEL.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Initial credential. `None` leaves the capability gate closed until a
    /// key is selected at runtime.
    pub api_key: Option<String>,
    pub base_url: String,
    pub models: ModelIds,
    pub timeouts: HttpTimeouts,
    pub video_poll: PollPolicy,
}

impl GatewayConfig {
    /// Optional:
    /// - `GEMINI_API_KEY` (falls back to `API_KEY`)
    /// - `GEMINI_BASE_URL`
    /// - `GEMINI_{ANALYSIS,MARKETING,IMAGE_EDIT,GRAPHICS,VIDEO}_MODEL`
    /// - `GEMINI_REQUEST_TIMEOUT_SECS`: default 120
    /// - `GEMINI_CONNECT_TIMEOUT_SECS`: default 10
    /// - `VIDEO_POLL_INTERVAL_SECS`: default 5
    /// - `VIDEO_POLL_MAX_INTERVAL_SECS`: defaults to the interval
    /// - `VIDEO_POLL_BACKOFF`: default 1.0 (fixed interval)
    /// - `VIDEO_TIMEOUT_SECS`: default 600
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = non_empty(lookup, "GEMINI_API_KEY").or_else(|| non_empty(lookup, "API_KEY"));
        let base_url = non_empty(lookup, "GEMINI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let defaults = ModelIds::default();
        let models = ModelIds {
            analysis: non_empty(lookup, "GEMINI_ANALYSIS_MODEL").unwrap_or(defaults.analysis),
            marketing: non_empty(lookup, "GEMINI_MARKETING_MODEL").unwrap_or(defaults.marketing),
            image_edit: non_empty(lookup, "GEMINI_IMAGE_EDIT_MODEL").unwrap_or(defaults.image_edit),
            graphics: non_empty(lookup, "GEMINI_GRAPHICS_MODEL").unwrap_or(defaults.graphics),
            video: non_empty(lookup, "GEMINI_VIDEO_MODEL").unwrap_or(defaults.video),
        };

        let timeouts = HttpTimeouts {
            request_secs: parse_or(lookup, "GEMINI_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_or(lookup, "GEMINI_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        let interval_secs = parse_or(lookup, "VIDEO_POLL_INTERVAL_SECS", DEFAULT_VIDEO_POLL_INTERVAL_SECS)?;
        let max_interval_secs = parse_or(lookup, "VIDEO_POLL_MAX_INTERVAL_SECS", interval_secs)?;
        let backoff = parse_or(lookup, "VIDEO_POLL_BACKOFF", DEFAULT_VIDEO_POLL_BACKOFF)?;
        if !backoff.is_finite() || backoff < 1.0 {
            return Err(ConfigError::Parse(format!("VIDEO_POLL_BACKOFF must be >= 1.0, got {backoff}")));
        }
        if interval_secs == 0 {
            return Err(ConfigError::Parse("VIDEO_POLL_INTERVAL_SECS must be positive".into()));
        }
        let video_poll = PollPolicy {
            interval: Duration::from_secs(interval_secs),
            max_interval: Duration::from_secs(max_interval_secs.max(interval_secs)),
            backoff,
            timeout: Duration::from_secs(parse_or(lookup, "VIDEO_TIMEOUT_SECS", DEFAULT_VIDEO_TIMEOUT_SECS)?),
        };

        Ok(Self { api_key, base_url, models, timeouts, video_poll })
    }
}

// =============================================================================
// SUBMISSION CONFIG
// =============================================================================

/// Where claim-intake submissions are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    /// EmailJS REST send endpoint with template parameters.
    EmailJs {
        api_url: String,
        service_id: String,
        template_id: String,
        public_key: String,
        recipient: Option<String>,
    },
    /// Formspree-style form webhook receiving a multipart body.
    Multipart { webhook_url: String },
    /// Transactional email through Resend.
    Resend { api_key: String, from: String, recipient: String },
}

impl DeliveryTarget {
    #[must_use]
    pub fn mode_name(&self) -> &'static str {
        match self {
            Self::EmailJs { .. } => "emailjs",
            Self::Multipart { .. } => "multipart",
            Self::Resend { .. } => "resend",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionConfig {
    pub target: DeliveryTarget,
    /// Decoded attachment size above which inline delivery modes replace the
    /// file with a note.
    pub max_attachment_bytes: usize,
}

impl SubmissionConfig {
    /// Build the submission config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the selected mode lacks a
    /// required value, or [`ConfigError::Parse`] for an unknown mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Required per `SUBMISSION_MODE`:
    /// - `emailjs` (default): `EMAILJS_SERVICE_ID`, `EMAILJS_TEMPLATE_ID`,
    ///   `EMAILJS_PUBLIC_KEY`; optional `RECIPIENT_EMAIL`, `EMAILJS_API_URL`
    /// - `multipart`: `SUBMISSION_WEBHOOK_URL`
    /// - `resend`: `RESEND_API_KEY`, `RESEND_FROM`, `RECIPIENT_EMAIL`
    ///
    /// Optional: `SUBMISSION_MAX_ATTACHMENT_BYTES` (default 51200).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the selected mode lacks a
    /// required value, or [`ConfigError::Parse`] for an unknown mode.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mode = non_empty(&lookup, "SUBMISSION_MODE").unwrap_or_else(|| "emailjs".to_owned());
        let target = match mode.as_str() {
            "emailjs" => DeliveryTarget::EmailJs {
                api_url: non_empty(&lookup, "EMAILJS_API_URL").unwrap_or_else(|| DEFAULT_EMAILJS_API_URL.to_owned()),
                service_id: required(&lookup, "EMAILJS_SERVICE_ID")?,
                template_id: required(&lookup, "EMAILJS_TEMPLATE_ID")?,
                public_key: required(&lookup, "EMAILJS_PUBLIC_KEY")?,
                recipient: non_empty(&lookup, "RECIPIENT_EMAIL"),
            },
            "multipart" => DeliveryTarget::Multipart { webhook_url: required(&lookup, "SUBMISSION_WEBHOOK_URL")? },
            "resend" => DeliveryTarget::Resend {
                api_key: required(&lookup, "RESEND_API_KEY")?,
                from: required(&lookup, "RESEND_FROM")?,
                recipient: required(&lookup, "RECIPIENT_EMAIL")?,
            },
            other => {
                return Err(ConfigError::Parse(format!(
                    "unknown SUBMISSION_MODE '{other}' (expected 'emailjs', 'multipart' or 'resend')"
                )));
            }
        };
        let max_attachment_bytes = parse_or(&lookup, "SUBMISSION_MAX_ATTACHMENT_BYTES", DEFAULT_MAX_ATTACHMENT_BYTES)?;
        Ok(Self { target, max_attachment_bytes })
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    non_empty(lookup, key).ok_or_else(|| ConfigError::Missing { var: key.to_owned() })
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError> {
    match non_empty(lookup, key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::Parse(format!("invalid {key}: {raw}"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
