//! Generic async-submission state machine.
//!
//! DESIGN
//! ======
//! `Idle -> Pending -> Succeeded | Failed`, and from either terminal state
//! back to `Pending` on resubmit (the new request supersedes the old result,
//! nothing accumulates). Every `begin` hands out a [`Ticket`] carrying the
//! submission generation; `complete` ignores tickets from an older
//! generation, so a late completion can never overwrite newer state.

use serde::Serialize;

use crate::error::ErrorBody;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum RequestLifecycle<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(ErrorBody),
}

impl<T> RequestLifecycle<T> {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Proof that a request was started at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct Submission<T> {
    state: RequestLifecycle<T>,
    generation: u64,
}

impl<T> Default for Submission<T> {
    fn default() -> Self {
        Self { state: RequestLifecycle::Idle, generation: 0 }
    }
}

impl<T> Submission<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &RequestLifecycle<T> {
        &self.state
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Move to `Pending`. Returns `None` while a request is already pending.
    pub fn begin(&mut self) -> Option<Ticket> {
        if self.state.is_pending() {
            return None;
        }
        self.generation += 1;
        self.state = RequestLifecycle::Pending;
        Some(Ticket(self.generation))
    }

    /// Apply a completion. Returns `false` (and changes nothing) for a stale
    /// ticket.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<T, ErrorBody>) -> bool {
        if ticket.0 != self.generation || !self.state.is_pending() {
            tracing::debug!(ticket = ticket.0, current = self.generation, "discarding stale completion");
            return false;
        }
        self.state = match outcome {
            Ok(value) => RequestLifecycle::Succeeded(value),
            Err(body) => RequestLifecycle::Failed(body),
        };
        true
    }

    /// Abandon the pending request. Its ticket becomes stale and the state
    /// moves to `Failed` with `reason`. No-op unless pending.
    pub fn cancel(&mut self, reason: ErrorBody) -> bool {
        if !self.state.is_pending() {
            return false;
        }
        self.generation += 1;
        self.state = RequestLifecycle::Failed(reason);
        true
    }
}

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod tests;
