//! Process-wide API credential (the "capability state").
//!
//! The store is the single source of truth for whether generation is
//! possible. Views never hold their own copy of the flag: they query a
//! [`CredentialProvider`] on activation.

use std::sync::RwLock;

use crate::error::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("API key must not be empty")]
    EmptyKey,
    #[error("no API key selected; select a key to continue")]
    SelectionRequired,
    #[error("credential store is unavailable")]
    StoreUnavailable,
}

impl ErrorCode for CredentialError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyKey => "E_EMPTY_KEY",
            Self::SelectionRequired => "E_SELECTION_REQUIRED",
            Self::StoreUnavailable => "E_CREDENTIAL_STORE",
        }
    }
}

/// Presence check plus the external acquisition flow.
#[async_trait::async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn has_credential(&self) -> bool;

    /// Launch the external key-selection flow. Resolves when the flow
    /// returns; callers re-query [`CredentialProvider::has_credential`].
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] when the flow cannot complete.
    async fn open_selection(&self) -> Result<(), CredentialError>;
}

/// In-memory credential slot read on every gateway request.
#[derive(Debug, Default)]
pub struct CredentialStore {
    key: RwLock<Option<String>>,
}

impl CredentialStore {
    #[must_use]
    pub fn new(initial: Option<String>) -> Self {
        let key = initial
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty());
        Self { key: RwLock::new(key) }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.key.read().map(|k| k.is_some()).unwrap_or(false)
    }

    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        self.key.read().ok().and_then(|k| k.clone())
    }

    /// Replace the current key.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::EmptyKey`] for a blank key; the previous key
    /// is kept. Returns [`CredentialError::StoreUnavailable`] when the lock
    /// is poisoned.
    pub fn select(&self, key: &str) -> Result<(), CredentialError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialError::EmptyKey);
        }
        let mut slot = self.key.write().map_err(|_| CredentialError::StoreUnavailable)?;
        *slot = Some(key.to_owned());
        Ok(())
    }

    /// Forget the current key.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::StoreUnavailable`] when the lock is poisoned.
    pub fn clear(&self) -> Result<(), CredentialError> {
        let mut slot = self.key.write().map_err(|_| CredentialError::StoreUnavailable)?;
        *slot = None;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CredentialProvider for CredentialStore {
    async fn has_credential(&self) -> bool {
        self.is_present()
    }

    /// Server-side the selection happens through `POST /api/capability/key`,
    /// so this only reports whether that flow has already run.
    async fn open_selection(&self) -> Result<(), CredentialError> {
        if self.is_present() { Ok(()) } else { Err(CredentialError::SelectionRequired) }
    }
}

#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;
