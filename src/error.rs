//! Grepable error codes shared by every error enum in the crate.
//!
//! The HTTP layer turns any `ErrorCode` into a `{code, message, retryable}`
//! body, so a client can decide whether to offer "try again" without
//! parsing messages.

use serde::Serialize;

/// Grepable error code and retryable flag for structured error bodies.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Serialized form of an [`ErrorCode`] error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl ErrorBody {
    pub fn from_error(err: &impl ErrorCode) -> Self {
        Self { code: err.error_code(), message: err.to_string(), retryable: err.retryable() }
    }
}
