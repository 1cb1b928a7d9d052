//! Capability gate for studios that need a selected API key.
//!
//! Advisory only: it decides whether a view renders its form or the
//! acquisition call-to-action. The provider is injected and queried once
//! per activation; the gateway re-checks on every gated call.

use std::sync::Arc;

use serde::Serialize;

use crate::credentials::{CredentialError, CredentialProvider};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    /// Not yet activated.
    #[default]
    Unknown,
    Ready,
    NeedsCredential,
}

pub struct CapabilityGate {
    provider: Arc<dyn CredentialProvider>,
    status: GateStatus,
}

impl CapabilityGate {
    #[must_use]
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self { provider, status: GateStatus::Unknown }
    }

    #[must_use]
    pub fn status(&self) -> GateStatus {
        self.status
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == GateStatus::Ready
    }

    /// Query the provider. Called when the owning view becomes active.
    pub async fn activate(&mut self) -> GateStatus {
        self.status = if self.provider.has_credential().await { GateStatus::Ready } else { GateStatus::NeedsCredential };
        self.status
    }

    /// Run the external selection flow, then re-query.
    ///
    /// # Errors
    ///
    /// Returns the flow's [`CredentialError`]; the status is refreshed
    /// either way.
    pub async fn acquire(&mut self) -> Result<GateStatus, CredentialError> {
        let outcome = self.provider.open_selection().await;
        let status = self.activate().await;
        if let Err(e) = &outcome {
            tracing::info!(error = %e, "credential selection did not complete");
        }
        outcome.map(|()| status)
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
