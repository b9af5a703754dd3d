//! Progress snapshot and parsing of extractor display strings.

use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::sync::LazyLock;

use super::JobStatus;

static ANSI_SGR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("static regex"));

/// Point-in-time copy of a job's observable state, as served to pollers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub status: JobStatus,
    /// 0–100; never decreases while downloading.
    pub percent: f64,
    /// Transfer rate as displayed by the extractor.
    pub speed: String,
    /// Estimated time remaining as displayed by the extractor.
    pub eta: String,
    /// Name of the produced file; set only once completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Failure description; set only on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProgressSnapshot {
    pub fn queued() -> Self {
        Self {
            status: JobStatus::Queued,
            percent: 0.0,
            speed: "0 KiB/s".to_string(),
            eta: "--:--".to_string(),
            filename: None,
            message: None,
        }
    }

    /// What pollers see for an id the registry does not track, whether it
    /// finished and was deregistered or never existed.
    pub fn untracked() -> Self {
        Self {
            status: JobStatus::Completed,
            percent: 100.0,
            ..Self::queued()
        }
    }
}

/// Removes terminal color sequences (`ESC [ ... m`).
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    ANSI_SGR.replace_all(s, "")
}

/// Parses a display percentage such as `"\x1b[0;94m 42.5%\x1b[0m"`.
/// Anything unparsable yields 0; results are clamped to 0–100.
pub fn parse_percent(raw: &str) -> f64 {
    let cleaned = strip_ansi(raw);
    let value = cleaned
        .trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .unwrap_or(0.0);
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Cleans a display string for the snapshot; missing values become `N/A`.
pub(crate) fn display_field(raw: Option<&str>) -> String {
    raw.map(|s| strip_ansi(s).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "N/A".to_string())
}
