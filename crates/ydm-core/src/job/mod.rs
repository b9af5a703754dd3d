//! Download job lifecycle: state machine, registry, worker bridging and
//! progress reporting.
//!
//! A [`JobManager`] is constructed once and shared by every request handler.
//! Each job runs on its own OS thread; the registry only tracks presence, all
//! progress mutation goes through the job's own lock.

mod cleanup;
mod download;
mod error;
mod guard;
mod id;
mod manager;
mod progress;
mod registry;
mod status;

pub use download::Job;
pub use error::{JobError, WorkerFailure};
pub use id::JobId;
pub use manager::{JobManager, ManagerSettings};
pub use progress::{parse_percent, strip_ansi, ProgressSnapshot};
pub use registry::JobRegistry;
pub use status::JobStatus;
