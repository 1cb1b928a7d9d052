use std::sync::Arc;

use estimate_reliance::config::{AppConfig, SubmissionConfig};
use estimate_reliance::credentials::CredentialStore;
use estimate_reliance::gateway::gemini::GeminiClient;
use estimate_reliance::routes;
use estimate_reliance::services::submission::Submitter;
use estimate_reliance::state::AppState;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env().expect("invalid configuration");
    let credentials = Arc::new(CredentialStore::new(config.gateway.api_key.clone()));
    if !credentials.is_present() {
        tracing::warn!("no API key configured; gated studios stay locked until one is selected");
    }
    let client = GeminiClient::new(&config.gateway, Arc::clone(&credentials)).expect("gemini client init failed");

    // The side channel is optional: without it claims are still analyzed.
    let submission = match SubmissionConfig::from_env() {
        Ok(submission) => {
            tracing::info!(mode = submission.target.mode_name(), "claim submission enabled");
            Some(submission)
        }
        Err(e) => {
            tracing::warn!(error = %e, "claim submission disabled");
            None
        }
    };
    let submitter = Submitter::new(submission).expect("submission client init failed");

    let state = AppState::new(Arc::new(client), credentials, &config, submitter);
    let app = routes::app(state, config.website_dir.clone());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "estimate-reliance listening");
    axum::serve(listener, app).await.expect("server failed");
}
