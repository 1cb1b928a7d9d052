//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Every field is `Arc`-wrapped so cloning per request is cheap. The
//! credential store is shared by the gateway (which reads the key on every
//! upstream call) and the capability routes (which select or clear it).

use std::sync::Arc;

use crate::config::{AppConfig, ModelIds};
use crate::credentials::{CredentialProvider, CredentialStore};
use crate::gateway::video::PollPolicy;
use crate::gateway::{Gateway, GenerativeApi};
use crate::services::blobs::BlobStore;
use crate::services::submission::Submitter;
use crate::services::video_jobs::VideoJobs;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub credentials: Arc<CredentialStore>,
    pub blobs: Arc<BlobStore>,
    pub jobs: Arc<VideoJobs>,
    /// Claim-intake side channel. Unconfigured submitters refuse every send.
    pub submitter: Arc<Submitter>,
    pub max_upload_bytes: usize,
}

impl AppState {
    #[must_use]
    pub fn new(
        api: Arc<dyn GenerativeApi>,
        credentials: Arc<CredentialStore>,
        config: &AppConfig,
        submitter: Submitter,
    ) -> Self {
        Self::assemble(
            api,
            credentials,
            config.gateway.models.clone(),
            config.gateway.video_poll.clone(),
            submitter,
            config.max_upload_bytes,
        )
    }

    fn assemble(
        api: Arc<dyn GenerativeApi>,
        credentials: Arc<CredentialStore>,
        models: ModelIds,
        video_poll: PollPolicy,
        submitter: Submitter,
        max_upload_bytes: usize,
    ) -> Self {
        let blobs = Arc::new(BlobStore::default());
        let gateway = Gateway::new(api, Arc::clone(&credentials) as Arc<dyn CredentialProvider>, models, video_poll, Arc::clone(&blobs));
        Self {
            gateway: Arc::new(gateway),
            credentials,
            blobs,
            jobs: Arc::new(VideoJobs::default()),
            submitter: Arc::new(submitter),
            max_upload_bytes,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
