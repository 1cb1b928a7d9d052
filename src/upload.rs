//! Upload encoder: user file to inline base64 payload.
//!
//! The MIME type is always the one the caller reports for the original file
//! (the browser's `File.type`); content is never sniffed.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed data URI")]
    MalformedDataUri,
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

impl ErrorCode for ReadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E_READ_IO",
            Self::MalformedDataUri => "E_READ_DATA_URI",
            Self::InvalidBase64(_) => "E_READ_BASE64",
        }
    }
}

/// An uploaded file held inline as base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedFile {
    pub mime_type: String,
    pub data: String,
    #[serde(default)]
    pub display_name: String,
}

impl EncodedFile {
    #[must_use]
    pub fn from_bytes(bytes: &[u8], mime_type: &str, display_name: &str) -> Self {
        let mime_type = if mime_type.trim().is_empty() { FALLBACK_MIME_TYPE } else { mime_type.trim() };
        Self { mime_type: mime_type.to_owned(), data: BASE64.encode(bytes), display_name: display_name.to_owned() }
    }

    /// Parse a `data:<mime>;base64,<payload>` URI as produced by a browser
    /// `FileReader.readAsDataURL`.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::MalformedDataUri`] when the URI lacks the
    /// `data:` prefix, the `;base64` marker or the comma separator, and
    /// [`ReadError::InvalidBase64`] when the payload does not decode.
    pub fn from_data_uri(uri: &str, display_name: &str) -> Result<Self, ReadError> {
        let rest = uri.strip_prefix("data:").ok_or(ReadError::MalformedDataUri)?;
        let (meta, payload) = rest.split_once(',').ok_or(ReadError::MalformedDataUri)?;
        let mime_type = meta.strip_suffix(";base64").ok_or(ReadError::MalformedDataUri)?;
        BASE64
            .decode(payload)
            .map_err(|e| ReadError::InvalidBase64(e.to_string()))?;
        let mime_type = if mime_type.is_empty() { FALLBACK_MIME_TYPE } else { mime_type };
        Ok(Self { mime_type: mime_type.to_owned(), data: payload.to_owned(), display_name: display_name.to_owned() })
    }

    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decode the payload back to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::InvalidBase64`] when the payload is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, ReadError> {
        BASE64
            .decode(&self.data)
            .map_err(|e| ReadError::InvalidBase64(e.to_string()))
    }

    /// Decoded size estimated from the base64 length (3 bytes per 4 chars).
    #[must_use]
    pub fn approximate_size(&self) -> usize {
        self.data.len() * 3 / 4
    }
}

/// Read a file from disk and encode it.
///
/// # Errors
///
/// Returns [`ReadError::Io`] if the file cannot be read. Nothing is returned
/// on failure, so callers keep whatever file they held before.
pub async fn encode_file(path: &Path, mime_type: &str) -> Result<EncodedFile, ReadError> {
    let display_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ReadError::Io { name: display_name.clone(), source })?;
    Ok(EncodedFile::from_bytes(&bytes, mime_type, &display_name))
}

#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;
