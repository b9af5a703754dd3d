//! Job errors: those returned to callers of the manager, and worker failures
//! recorded into a job's progress.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::extractor::ExtractError;
use crate::format::InvalidRequest;

use super::JobId;

/// Errors returned synchronously by [`super::JobManager`] operations.
#[derive(Debug, Error)]
pub enum JobError {
    /// Malformed locator or options; no job was created.
    #[error(transparent)]
    Validation(#[from] InvalidRequest),
    /// The id is not tracked (finished and deregistered, or never existed).
    #[error("download not found: {0}")]
    NotFound(String),
    /// Id collision at registration. Indicates a broken id generator.
    #[error("duplicate job id: {0}")]
    DuplicateJob(JobId),
    #[error("failed to start job thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Why a job's worker did not produce an artifact.
#[derive(Debug, Error)]
pub enum WorkerFailure {
    #[error("download cancelled by user")]
    CancelledByUser,
    #[error(transparent)]
    Extract(ExtractError),
    #[error("failed to locate downloaded file")]
    ArtifactUnnamed,
    #[error("downloaded file not found: {}", .0.display())]
    ArtifactMissing(PathBuf),
    #[error("download directory: {0}")]
    Io(#[from] io::Error),
}

impl From<ExtractError> for WorkerFailure {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::Cancelled => WorkerFailure::CancelledByUser,
            other => WorkerFailure::Extract(other),
        }
    }
}
