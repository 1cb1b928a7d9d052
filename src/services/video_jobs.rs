//! Background video jobs.
//!
//! DESIGN
//! ======
//! A video generation can run for minutes, longer than an HTTP request
//! should stay open. `start` validates the form through a fresh
//! [`StudioView`], moves it to `Pending` and spawns the gateway call; the
//! caller polls `get` for the lifecycle state. `cancel` fires the job's
//! token, so the poll loop stops and the view moves to `Failed`. The
//! registry keeps at most `capacity` jobs and drops the oldest first.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::gateway::Gateway;
use crate::studio::{RequestLifecycle, StudioForm, StudioKind, StudioOutput, StudioView, SubmitBlocked, VideoStudio};

pub const DEFAULT_JOB_CAPACITY: usize = 16;

type JobView = Arc<Mutex<StudioView<VideoStudio>>>;

/// Point-in-time view of one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSnapshot {
    pub id: Uuid,
    #[serde(flatten)]
    pub state: RequestLifecycle<StudioOutput>,
}

#[derive(Default)]
struct Jobs {
    order: VecDeque<Uuid>,
    views: HashMap<Uuid, JobView>,
}

pub struct VideoJobs {
    jobs: RwLock<Jobs>,
    capacity: usize,
}

impl VideoJobs {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { jobs: RwLock::new(Jobs::default()), capacity: capacity.max(1) }
    }

    /// Validate `form` and start generating in the background.
    ///
    /// A blank motion keeps the studio's default motion text.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitBlocked::CapabilityMissing`] when no key is selected,
    /// or [`SubmitBlocked::Invalid`] when the form fails validation. No job
    /// is registered in either case.
    pub async fn start(&self, gateway: Arc<Gateway>, form: StudioForm) -> Result<Uuid, SubmitBlocked> {
        let mut view = StudioView::new(VideoStudio, gateway.capability());
        view.load_form(form);
        view.activate().await;
        let (ticket, request, cancel) = view.begin_submit()?;

        let id = Uuid::new_v4();
        let view = Arc::new(Mutex::new(view));
        self.register(id, Arc::clone(&view)).await;
        tracing::info!(job = %id, "video job started");

        tokio::spawn(async move {
            let outcome = VideoStudio.invoke(&gateway, request, &cancel).await;
            let applied = view.lock().await.finish(ticket, outcome);
            tracing::info!(job = %id, applied, "video job finished");
        });
        Ok(id)
    }

    async fn register(&self, id: Uuid, view: JobView) {
        let mut jobs = self.jobs.write().await;
        while jobs.order.len() >= self.capacity {
            let Some(oldest) = jobs.order.pop_front() else { break };
            if let Some(evicted) = jobs.views.remove(&oldest) {
                evicted.lock().await.cancel();
                tracing::debug!(job = %oldest, "evicted video job");
            }
        }
        jobs.order.push_back(id);
        jobs.views.insert(id, view);
    }

    pub async fn get(&self, id: Uuid) -> Option<JobSnapshot> {
        let view = self.jobs.read().await.views.get(&id).cloned()?;
        let state = view.lock().await.state().clone();
        Some(JobSnapshot { id, state })
    }

    /// Cancel a job. `None` for an unknown id; `Some(false)` when the job
    /// had already finished.
    pub async fn cancel(&self, id: Uuid) -> Option<bool> {
        let view = self.jobs.read().await.views.get(&id).cloned()?;
        let cancelled = view.lock().await.cancel();
        tracing::info!(job = %id, cancelled, "video job cancel requested");
        Some(cancelled)
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.views.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for VideoJobs {
    fn default() -> Self {
        Self::new(DEFAULT_JOB_CAPACITY)
    }
}

#[cfg(test)]
#[path = "video_jobs_test.rs"]
mod tests;
