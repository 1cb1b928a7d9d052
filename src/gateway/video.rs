//! Long-running video job polling.
//!
//! DESIGN
//! ======
//! A submitted job is polled until it reports done. The loop is bounded by
//! an overall timeout and stops early when the caller's cancellation token
//! fires. Intervals grow geometrically by `backoff` up to `max_interval`; a
//! backoff of 1.0 keeps the fixed interval.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::GatewayError;
use super::types::{GenerativeApi, VideoOperation};

/// Timing parameters for the polling loop.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_interval: Duration,
    pub backoff: f64,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_interval: Duration::from_secs(5),
            backoff: 1.0,
            timeout: Duration::from_secs(600),
        }
    }
}

impl PollPolicy {
    /// Grow `current` by `backoff`, clamped to `[interval, max_interval]`.
    /// Products too large for a `Duration` saturate at `max_interval`.
    #[must_use]
    pub fn next_interval(&self, current: Duration) -> Duration {
        Duration::try_from_secs_f64(current.as_secs_f64() * self.backoff)
            .map_or(self.max_interval, |next| next.min(self.max_interval))
            .max(self.interval)
    }
}

/// Poll `operation` until it reports done.
///
/// Returns the completed operation; the caller inspects it for an output
/// reference.
///
/// # Errors
///
/// - [`GatewayError::Cancelled`] when `cancel` fires first.
/// - [`GatewayError::VideoTimedOut`] when the job is still running at the
///   deadline.
/// - [`GatewayError::VideoGeneration`] when a status request fails.
pub async fn wait_for_completion(
    api: &dyn GenerativeApi,
    mut operation: VideoOperation,
    policy: &PollPolicy,
    cancel: &CancellationToken,
) -> Result<VideoOperation, GatewayError> {
    let deadline = Instant::now() + policy.timeout;
    let mut interval = policy.interval;
    let mut polls: u32 = 0;

    while !operation.done {
        if cancel.is_cancelled() {
            return Err(GatewayError::Cancelled);
        }
        let now = Instant::now();
        if now >= deadline {
            tracing::warn!(operation = %operation.name, polls, "video job timed out");
            return Err(GatewayError::VideoTimedOut { secs: policy.timeout.as_secs() });
        }

        tokio::select! {
            () = cancel.cancelled() => return Err(GatewayError::Cancelled),
            () = tokio::time::sleep(interval.min(deadline - now)) => {}
        }

        let next = tokio::select! {
            () = cancel.cancelled() => return Err(GatewayError::Cancelled),
            result = api.poll_video(&operation.name) => result,
        };
        operation = next.map_err(|e| {
            tracing::warn!(error = %e, "video status request failed");
            GatewayError::VideoGeneration(e.to_string())
        })?;
        polls += 1;
        tracing::debug!(operation = %operation.name, polls, done = operation.done, "polled video job");
        interval = policy.next_interval(interval);
    }

    Ok(operation)
}

#[cfg(test)]
#[path = "video_test.rs"]
mod tests;
