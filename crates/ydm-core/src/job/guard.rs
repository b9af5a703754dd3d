//! RAII guard that settles a job when its worker thread exits.

use std::sync::Arc;

use super::{Job, JobRegistry};

/// Removes the job from the registry and marks it settled when dropped,
/// including when the worker panics.
pub(super) struct SettleGuard {
    pub(super) job: Arc<Job>,
    pub(super) registry: Arc<JobRegistry>,
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::error!(job_id = %self.job.id(), "worker thread panicked");
            self.job.abandon("download worker panicked");
            self.job.cleanup();
        }
        self.registry.deregister_job(&self.job);
        self.job.mark_settled();
    }
}
