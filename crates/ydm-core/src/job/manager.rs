//! Entry point for creating and controlling jobs.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::extractor::Extractor;
use crate::format::DownloadRequest;

use super::guard::SettleGuard;
use super::{Job, JobError, JobId, JobRegistry, ProgressSnapshot};

/// Attempts at drawing a fresh id before giving up.
const ID_ATTEMPTS: usize = 3;

/// Where jobs write and which tools they hand to the extractor.
#[derive(Debug, Clone)]
pub struct ManagerSettings {
    pub download_dir: PathBuf,
    pub ffmpeg_location: Option<PathBuf>,
}

/// Owns the registry and spawns one worker thread per job. Cheap to clone;
/// clones share the same registry.
#[derive(Clone)]
pub struct JobManager {
    registry: Arc<JobRegistry>,
    extractor: Arc<dyn Extractor>,
    settings: ManagerSettings,
}

impl JobManager {
    /// Creates the manager, creating the download directory if needed.
    pub fn new(extractor: Arc<dyn Extractor>, settings: ManagerSettings) -> Result<Self> {
        std::fs::create_dir_all(&settings.download_dir).with_context(|| {
            format!(
                "create download directory {}",
                settings.download_dir.display()
            )
        })?;
        Ok(Self {
            registry: Arc::new(JobRegistry::new()),
            extractor,
            settings,
        })
    }

    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Validates the request, registers a queued job and starts its worker.
    /// Returns as soon as the worker is spawned.
    pub fn create(&self, request: &DownloadRequest) -> Result<JobId, JobError> {
        self.start(request).map(|job| job.id().clone())
    }

    /// Like [`create`](Self::create) but hands back the job itself, which
    /// stays observable after it leaves the registry.
    pub fn start(&self, request: &DownloadRequest) -> Result<Arc<Job>, JobError> {
        request.validate()?;
        let job = self.register_new(request)?;
        let id = job.id().clone();

        let guard = SettleGuard {
            job: Arc::clone(&job),
            registry: Arc::clone(&self.registry),
        };
        let extractor = Arc::clone(&self.extractor);
        let spawned = std::thread::Builder::new()
            .name(format!("ydm-job-{id}"))
            .spawn(move || {
                let guard = guard;
                guard.job.run(extractor.as_ref());
            });
        if let Err(e) = spawned {
            // The failed spawn dropped the closure, and its guard already
            // deregistered the job.
            tracing::error!(job_id = %id, "failed to spawn worker: {}", e);
            job.abandon("failed to start download");
            return Err(JobError::Spawn(e));
        }
        tracing::info!(job_id = %id, kind = ?request.kind, "job created");
        Ok(job)
    }

    fn register_new(&self, request: &DownloadRequest) -> Result<Arc<Job>, JobError> {
        let mut attempt = 1;
        loop {
            let id = JobId::generate();
            let template = self
                .settings
                .download_dir
                .join(format!("%(title)s_{id}.%(ext)s"))
                .to_string_lossy()
                .into_owned();
            let options =
                request.to_options(template, self.settings.ffmpeg_location.as_deref())?;
            let job = Arc::new(Job::new(
                id,
                request.url.clone(),
                options,
                self.settings.download_dir.clone(),
            ));
            match self.registry.register(Arc::clone(&job)) {
                Ok(()) => return Ok(job),
                Err(e) if attempt < ID_ATTEMPTS => {
                    tracing::error!("{}; drawing another id", e);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Current progress. Unknown ids (finished or never created) report as
    /// completed, so pollers stop.
    pub fn get_progress(&self, id: &str) -> ProgressSnapshot {
        self.registry
            .lookup(id)
            .map(|job| job.progress())
            .unwrap_or_else(ProgressSnapshot::untracked)
    }

    pub fn job(&self, id: &str) -> Option<Arc<Job>> {
        self.registry.lookup(id)
    }

    pub fn pause(&self, id: &str) -> Result<(), JobError> {
        self.tracked(id)?.pause();
        Ok(())
    }

    pub fn resume(&self, id: &str) -> Result<(), JobError> {
        self.tracked(id)?.resume();
        Ok(())
    }

    /// Cancels and forgets the job immediately; the worker exits at its next
    /// progress callback.
    pub fn cancel(&self, id: &str) -> Result<(), JobError> {
        let job = self.tracked(id)?;
        job.cancel();
        self.registry.deregister_job(&job);
        Ok(())
    }

    fn tracked(&self, id: &str) -> Result<Arc<Job>, JobError> {
        self.registry
            .lookup(id)
            .ok_or_else(|| JobError::NotFound(id.to_string()))
    }

    pub fn active_ids(&self) -> Vec<JobId> {
        self.registry.ids()
    }

    /// Cancels every tracked job and waits up to `grace` for their workers
    /// to exit. Returns whether all of them did.
    pub fn shutdown(&self, grace: Duration) -> bool {
        let jobs = self.registry.jobs();
        if jobs.is_empty() {
            return true;
        }
        tracing::info!(count = jobs.len(), "cancelling active downloads");
        for job in &jobs {
            job.cancel();
            self.registry.deregister_job(job);
        }
        let deadline = Instant::now() + grace;
        let mut all = true;
        for job in &jobs {
            let left = deadline.saturating_duration_since(Instant::now());
            if !job.wait_settled(left) {
                tracing::warn!(job_id = %job.id(), "worker still running at shutdown");
                all = false;
            }
        }
        all
    }
}
