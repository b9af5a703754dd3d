//! Shared map of in-flight jobs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Job, JobError, JobId};

/// Tracks jobs from creation until they settle or are cancelled. Only
/// presence is guarded here; each job guards its own progress.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Mutex<HashMap<JobId, Arc<Job>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<JobId, Arc<Job>>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a job under its own id. Fails if the id is already tracked.
    pub fn register(&self, job: Arc<Job>) -> Result<(), JobError> {
        let mut jobs = self.map();
        if jobs.contains_key(job.id()) {
            return Err(JobError::DuplicateJob(job.id().clone()));
        }
        jobs.insert(job.id().clone(), job);
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<Arc<Job>> {
        self.map().get(id).cloned()
    }

    /// Removes an id. Unknown ids are ignored.
    pub fn deregister(&self, id: &str) -> Option<Arc<Job>> {
        self.map().remove(id)
    }

    /// Removes `job` only if the entry under its id is this same job.
    pub fn deregister_job(&self, job: &Arc<Job>) -> bool {
        let mut jobs = self.map();
        match jobs.get(job.id()) {
            Some(current) if Arc::ptr_eq(current, job) => {
                jobs.remove(job.id());
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    /// Snapshot of tracked ids, in no particular order.
    pub fn ids(&self) -> Vec<JobId> {
        self.map().keys().cloned().collect()
    }

    /// Snapshot of tracked jobs.
    pub(crate) fn jobs(&self) -> Vec<Arc<Job>> {
        self.map().values().cloned().collect()
    }
}
