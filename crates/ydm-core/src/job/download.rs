//! A single download job: state machine, pause/cancel signals, and the hook
//! that bridges extractor callbacks into progress.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::extractor::{
    Cancelled, ExtractOptions, Extracted, Extractor, HookResult, ProgressEvent, TransferStatus,
};

use super::cleanup;
use super::progress::{display_field, parse_percent};
use super::{JobId, JobStatus, ProgressSnapshot, WorkerFailure};

/// Control flags set from outside the job's thread.
#[derive(Debug, Default, Clone, Copy)]
struct ControlSignals {
    paused: bool,
    cancelled: bool,
}

/// Everything guarded by the per-job lock.
#[derive(Debug)]
struct JobState {
    progress: ProgressSnapshot,
    signals: ControlSignals,
    /// File the extractor reported writing; removed if the job does not complete.
    partial: Option<PathBuf>,
    /// Set only together with `Completed`.
    final_path: Option<PathBuf>,
    /// The worker thread has finished and the job left the registry.
    settled: bool,
}

impl JobState {
    fn transition(&mut self, id: &JobId, next: JobStatus) -> bool {
        let current = self.progress.status;
        if !current.can_transition_to(next) {
            if current != next {
                tracing::debug!(job_id = %id, from = %current, to = %next, "transition rejected");
            }
            return false;
        }
        self.progress.status = next;
        true
    }
}

/// One tracked download.
#[derive(Debug)]
pub struct Job {
    id: JobId,
    source_url: String,
    options: ExtractOptions,
    download_dir: PathBuf,
    state: Mutex<JobState>,
    changed: Condvar,
}

impl Job {
    pub(crate) fn new(
        id: JobId,
        source_url: String,
        options: ExtractOptions,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            id,
            source_url,
            options,
            download_dir,
            state: Mutex::new(JobState {
                progress: ProgressSnapshot::queued(),
                signals: ControlSignals::default(),
                partial: None,
                final_path: None,
                settled: false,
            }),
            changed: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, JobState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Consistent copy of the progress fields.
    pub fn progress(&self) -> ProgressSnapshot {
        self.lock().progress.clone()
    }

    pub fn status(&self) -> JobStatus {
        self.lock().progress.status
    }

    /// Absolute path of the produced file, once completed.
    pub fn final_path(&self) -> Option<PathBuf> {
        self.lock().final_path.clone()
    }

    pub fn is_settled(&self) -> bool {
        self.lock().settled
    }

    /// Blocks until the worker thread has finished and the job has left the
    /// registry, or `timeout` elapses. Returns whether it settled.
    pub fn wait_settled(&self, timeout: Duration) -> bool {
        let guard = self.lock();
        let (guard, _) = self
            .changed
            .wait_timeout_while(guard, timeout, |s| !s.settled)
            .unwrap_or_else(PoisonError::into_inner);
        guard.settled
    }

    /// Sets the pause signal. The worker stops at its next progress callback.
    /// Returns false if there was nothing to do (terminal or already paused).
    pub(crate) fn pause(&self) -> bool {
        let mut st = self.lock();
        if st.progress.status.is_terminal() || st.signals.paused {
            return false;
        }
        st.signals.paused = true;
        st.transition(&self.id, JobStatus::Paused);
        drop(st);
        self.changed.notify_all();
        tracing::info!(job_id = %self.id, "download paused");
        true
    }

    /// Clears the pause signal and wakes the worker. No-op if not paused.
    pub(crate) fn resume(&self) -> bool {
        let mut st = self.lock();
        if !st.signals.paused {
            return false;
        }
        st.signals.paused = false;
        if st.progress.status == JobStatus::Paused {
            st.transition(&self.id, JobStatus::Downloading);
        }
        drop(st);
        self.changed.notify_all();
        tracing::info!(job_id = %self.id, "download resumed");
        true
    }

    /// Sets the cancel signal, reports `Cancelled` and cleans up right away,
    /// without waiting for the worker to notice.
    pub(crate) fn cancel(&self) -> bool {
        let mut st = self.lock();
        if st.progress.status.is_terminal() {
            return false;
        }
        st.signals.cancelled = true;
        st.transition(&self.id, JobStatus::Cancelled);
        drop(st);
        self.changed.notify_all();
        tracing::info!(job_id = %self.id, "download cancelled by user");
        self.cleanup();
        true
    }

    /// Progress hook handed to the extractor. Checks cancellation, holds the
    /// worker while paused, then applies the update.
    fn on_progress(&self, event: ProgressEvent) -> HookResult {
        let mut st = self.lock();
        if st.signals.cancelled {
            return Err(Cancelled);
        }
        if st.signals.paused {
            tracing::debug!(job_id = %self.id, "worker held while paused");
            st = self
                .changed
                .wait_while(st, |s| s.signals.paused && !s.signals.cancelled)
                .unwrap_or_else(PoisonError::into_inner);
            if st.signals.cancelled {
                return Err(Cancelled);
            }
        }

        if let Some(name) = &event.filename {
            st.partial = Some(PathBuf::from(name));
        }
        match &event.status {
            TransferStatus::Downloading => {
                st.transition(&self.id, JobStatus::Downloading);
                let percent = event.percent.as_deref().map(parse_percent).unwrap_or(0.0);
                if percent > st.progress.percent {
                    st.progress.percent = percent;
                }
                st.progress.speed = display_field(event.speed.as_deref());
                st.progress.eta = display_field(event.eta.as_deref());
            }
            TransferStatus::Finished => {
                st.progress.percent = 100.0;
            }
            TransferStatus::Other(tag) => {
                tracing::debug!(job_id = %self.id, status = %tag, "ignored progress status");
            }
        }
        drop(st);
        self.changed.notify_all();
        Ok(())
    }

    /// Runs the extractor to completion on the calling thread and settles the
    /// terminal status. Never fails: outcomes are recorded into progress.
    pub(crate) fn run(&self, extractor: &dyn Extractor) {
        tracing::info!(job_id = %self.id, url = %self.source_url, "download started");
        let result = extractor
            .extract(&self.source_url, &self.options, &mut |event| {
                self.on_progress(event)
            })
            .map_err(WorkerFailure::from)
            .and_then(|extracted| self.locate_artifact(&extracted));
        self.settle(result);
        self.cleanup();
    }

    /// Resolves the produced file inside the download directory.
    fn locate_artifact(&self, extracted: &Extracted) -> Result<PathBuf, WorkerFailure> {
        let reported = extracted
            .filename
            .as_deref()
            .and_then(|f| Path::new(f).file_name())
            .map(|n| n.to_os_string());
        let name = match reported {
            Some(n) => n,
            None => self.find_tagged_file()?.ok_or(WorkerFailure::ArtifactUnnamed)?,
        };
        let path = self.download_dir.join(name);
        if !path.is_file() {
            return Err(WorkerFailure::ArtifactMissing(path));
        }
        Ok(fs::canonicalize(&path).unwrap_or(path))
    }

    /// First finished file whose name carries this job's id.
    fn find_tagged_file(&self) -> Result<Option<std::ffi::OsString>, WorkerFailure> {
        for entry in fs::read_dir(&self.download_dir)? {
            let name = entry?.file_name();
            let Some(s) = name.to_str() else { continue };
            if s.contains(self.id.as_str()) && !s.ends_with(".part") && !s.ends_with(".ytdl") {
                return Ok(Some(name));
            }
        }
        Ok(None)
    }

    /// Records the worker outcome. A set cancel signal wins over both success
    /// and failure.
    fn settle(&self, result: Result<PathBuf, WorkerFailure>) {
        let mut st = self.lock();
        match result {
            Ok(path) if !st.signals.cancelled => {
                if st.transition(&self.id, JobStatus::Completed) {
                    st.progress.percent = 100.0;
                    st.progress.filename = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned());
                    tracing::info!(job_id = %self.id, "download completed: {}", path.display());
                    st.final_path = Some(path);
                }
            }
            Ok(_) => {
                st.transition(&self.id, JobStatus::Cancelled);
                tracing::info!(
                    job_id = %self.id,
                    "download finished after cancellation; discarding"
                );
            }
            Err(failure) if st.signals.cancelled => {
                st.transition(&self.id, JobStatus::Cancelled);
                tracing::info!(job_id = %self.id, "download stopped: {}", failure);
            }
            Err(failure) => {
                if st.transition(&self.id, JobStatus::Error) {
                    st.progress.message = Some(failure.to_string());
                }
                tracing::error!(job_id = %self.id, "download error: {}", failure);
            }
        }
        drop(st);
        self.changed.notify_all();
    }

    /// Marks a job whose worker died without settling.
    pub(crate) fn abandon(&self, reason: &str) {
        let mut st = self.lock();
        if st.transition(&self.id, JobStatus::Error) {
            st.progress.message = Some(reason.to_string());
        }
        drop(st);
        self.changed.notify_all();
    }

    /// Deletes partial output unless the job completed. Safe to call more
    /// than once and from any thread.
    pub(crate) fn cleanup(&self) {
        let (status, partial) = {
            let st = self.lock();
            (st.progress.status, st.partial.clone())
        };
        if status == JobStatus::Completed {
            return;
        }
        let targets = cleanup::partial_artifacts(&self.download_dir, &self.id, partial.as_deref());
        cleanup::remove_quietly(&self.id, &targets);
    }

    pub(crate) fn mark_settled(&self) {
        self.lock().settled = true;
        self.changed.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ExtractError;
    use crate::format::MediaInfo;

    /// Replays a fixed list of events, then writes `output` into the dir.
    struct Replay {
        events: Vec<ProgressEvent>,
        output: Option<PathBuf>,
        fail: bool,
    }

    impl Extractor for Replay {
        fn extract(
            &self,
            _url: &str,
            _options: &ExtractOptions,
            hook: &mut dyn FnMut(ProgressEvent) -> HookResult,
        ) -> Result<Extracted, ExtractError> {
            for ev in &self.events {
                hook(ev.clone()).map_err(|_| ExtractError::Cancelled)?;
            }
            if self.fail {
                return Err(ExtractError::Failed {
                    status: "exit status: 1".into(),
                    detail: "ERROR: boom".into(),
                });
            }
            if let Some(out) = &self.output {
                fs::write(out, b"media").map_err(ExtractError::Io)?;
            }
            Ok(Extracted {
                filename: self.output.as_ref().map(|p| p.display().to_string()),
            })
        }

        fn probe(&self, _url: &str) -> Result<MediaInfo, ExtractError> {
            unimplemented!("not used")
        }
    }

    fn job(dir: &Path) -> Job {
        let id = JobId::from("dl_00c0ffee");
        Job::new(
            id,
            "https://youtu.be/dQw4w9WgXcQ".into(),
            ExtractOptions::new("bestaudio/best", "t"),
            dir.to_path_buf(),
        )
    }

    #[test]
    fn progress_updates_are_cleaned_and_monotonic() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path());
        assert_eq!(job.status(), JobStatus::Queued);
        job.on_progress(ProgressEvent::downloading(
            "\x1b[0;94m 40.0%\x1b[0m",
            "\x1b[0;32m2MiB/s\x1b[0m",
            "00:05",
        ))
        .unwrap();
        let p = job.progress();
        assert_eq!(p.status, JobStatus::Downloading);
        assert_eq!(p.percent, 40.0);
        assert_eq!(p.speed, "2MiB/s");
        assert_eq!(p.eta, "00:05");

        job.on_progress(ProgressEvent::downloading("garbage", "1MiB/s", "00:09"))
            .unwrap();
        assert_eq!(job.progress().percent, 40.0);
    }

    #[test]
    fn completes_with_final_path() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path());
        let out = dir.path().join("Song_dl_00c0ffee.mp3");
        job.run(&Replay {
            events: vec![
                ProgressEvent::downloading("50%", "1MiB/s", "00:01"),
                ProgressEvent::finished(),
            ],
            output: Some(out.clone()),
            fail: false,
        });
        let p = job.progress();
        assert_eq!(p.status, JobStatus::Completed);
        assert_eq!(p.percent, 100.0);
        assert_eq!(p.filename.as_deref(), Some("Song_dl_00c0ffee.mp3"));
        assert!(p.message.is_none());
        assert_eq!(job.final_path(), Some(fs::canonicalize(&out).unwrap()));
        assert!(out.exists());
    }

    #[test]
    fn worker_failure_is_recorded_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path());
        job.run(&Replay {
            events: vec![ProgressEvent::downloading("10%", "1MiB/s", "00:09")],
            output: None,
            fail: true,
        });
        let p = job.progress();
        assert_eq!(p.status, JobStatus::Error);
        assert!(p.message.unwrap().contains("ERROR: boom"));
        assert!(job.final_path().is_none());
    }

    #[test]
    fn missing_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path());
        job.run(&Replay {
            events: vec![],
            output: None,
            fail: false,
        });
        let p = job.progress();
        assert_eq!(p.status, JobStatus::Error);
        assert_eq!(p.message.as_deref(), Some("failed to locate downloaded file"));
    }

    #[test]
    fn cancel_wins_over_success_and_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path());
        assert!(job.cancel());
        let out = dir.path().join("Song_dl_00c0ffee.mp3");
        job.run(&Replay {
            events: vec![],
            output: Some(out.clone()),
            fail: false,
        });
        assert_eq!(job.status(), JobStatus::Cancelled);
        assert!(job.final_path().is_none());
        assert!(!out.exists());
    }

    #[test]
    fn hook_refuses_after_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path());
        job.cancel();
        assert_eq!(
            job.on_progress(ProgressEvent::downloading("1%", "", "")),
            Err(Cancelled)
        );
        assert!(!job.cancel(), "second cancel is a no-op");
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path());
        assert!(!job.resume());
        assert!(job.pause());
        assert!(!job.pause());
        assert_eq!(job.status(), JobStatus::Paused);
        assert!(job.resume());
        assert_eq!(job.status(), JobStatus::Downloading);
        assert!(!job.resume());
    }

    #[test]
    fn terminal_jobs_ignore_controls() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path());
        job.run(&Replay {
            events: vec![],
            output: None,
            fail: true,
        });
        assert!(!job.pause());
        assert!(!job.cancel());
        assert_eq!(job.status(), JobStatus::Error);
    }

    #[test]
    fn paused_hook_blocks_until_resumed() {
        let dir = tempfile::tempdir().unwrap();
        let job = std::sync::Arc::new(job(dir.path()));
        job.pause();
        let worker = {
            let job = std::sync::Arc::clone(&job);
            std::thread::spawn(move || job.on_progress(ProgressEvent::downloading("5%", "x", "y")))
        };
        std::thread::sleep(Duration::from_millis(100));
        assert!(!worker.is_finished());
        assert_eq!(job.progress().percent, 0.0);
        job.resume();
        assert_eq!(worker.join().unwrap(), Ok(()));
        assert_eq!(job.progress().percent, 5.0);
    }

    #[test]
    fn cancel_releases_a_paused_hook() {
        let dir = tempfile::tempdir().unwrap();
        let job = std::sync::Arc::new(job(dir.path()));
        job.pause();
        let worker = {
            let job = std::sync::Arc::clone(&job);
            std::thread::spawn(move || job.on_progress(ProgressEvent::downloading("5%", "x", "y")))
        };
        std::thread::sleep(Duration::from_millis(50));
        job.cancel();
        assert_eq!(worker.join().unwrap(), Err(Cancelled));
        assert_eq!(job.status(), JobStatus::Cancelled);
    }
}
