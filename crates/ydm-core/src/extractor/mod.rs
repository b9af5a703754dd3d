//! Boundary to the external media extractor.
//!
//! The extractor is a black box invoked with a locator and an options bag. It
//! reports progress through a hook; the hook may answer with [`Cancelled`], in
//! which case the extractor must abort and return [`ExtractError::Cancelled`].

mod error;
mod options;
mod ytdlp;

pub use error::ExtractError;
pub use options::{ExtractOptions, PostProcess};
pub use ytdlp::{parse_progress_line, YtDlp};

use crate::format::MediaInfo;
use std::fmt;

/// Returned by a progress hook to ask the extractor to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "download cancelled by user")
    }
}

impl std::error::Error for Cancelled {}

/// What a progress hook answers: keep going, or stop.
pub type HookResult = Result<(), Cancelled>;

/// Status tag of one progress callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferStatus {
    Downloading,
    Finished,
    Other(String),
}

impl TransferStatus {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "downloading" => TransferStatus::Downloading,
            "finished" => TransferStatus::Finished,
            other => TransferStatus::Other(other.to_string()),
        }
    }
}

/// One progress callback. Values are display strings as the extractor printed
/// them and may carry terminal color codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub status: TransferStatus,
    pub percent: Option<String>,
    pub speed: Option<String>,
    pub eta: Option<String>,
    /// File currently being written, if the extractor reports it.
    pub filename: Option<String>,
}

impl ProgressEvent {
    pub fn downloading(percent: &str, speed: &str, eta: &str) -> Self {
        Self {
            status: TransferStatus::Downloading,
            percent: Some(percent.to_string()),
            speed: Some(speed.to_string()),
            eta: Some(eta.to_string()),
            filename: None,
        }
    }

    pub fn finished() -> Self {
        Self {
            status: TransferStatus::Finished,
            percent: None,
            speed: None,
            eta: None,
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Success descriptor of an extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Path of the produced file as reported by the extractor.
    pub filename: Option<String>,
}

/// The external extraction worker.
pub trait Extractor: Send + Sync {
    /// Downloads `url` according to `options`, calling `hook` for every
    /// progress update. Blocks until the extractor finishes.
    fn extract(
        &self,
        url: &str,
        options: &ExtractOptions,
        hook: &mut dyn FnMut(ProgressEvent) -> HookResult,
    ) -> Result<Extracted, ExtractError>;

    /// Fetches metadata only.
    fn probe(&self, url: &str) -> Result<MediaInfo, ExtractError>;
}
