//! Extractor failure type.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The progress hook asked the extractor to stop.
    #[error("download cancelled by user")]
    Cancelled,
    #[error("failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("extractor I/O: {0}")]
    Io(#[from] io::Error),
    /// The extractor exited unsuccessfully.
    #[error("extractor failed ({status}): {detail}")]
    Failed { status: String, detail: String },
    #[error("unreadable metadata: {0}")]
    Probe(#[from] serde_json::Error),
}

impl ExtractError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExtractError::Cancelled)
    }
}
