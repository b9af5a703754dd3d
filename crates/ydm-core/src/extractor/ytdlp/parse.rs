//! Parsing of the machine-readable lines our templates make yt-dlp print.

use crate::extractor::{ProgressEvent, TransferStatus};

pub(super) const PROGRESS_PREFIX: &str = "ydm-progress|";
pub(super) const FILE_PREFIX: &str = "ydm-file|";

/// `--progress-template` value; fields are `|`-separated, filename last so it
/// may itself contain separators.
pub(super) const PROGRESS_TEMPLATE: &str = concat!(
    "download:ydm-progress|%(progress.status)s|%(progress._percent_str)s|",
    "%(progress._speed_str)s|%(progress._eta_str)s|%(progress.filename)s",
);
/// `--print` value emitted once the final file is in place.
pub(super) const FILE_TEMPLATE: &str = "after_move:ydm-file|%(filepath)s";

/// yt-dlp renders missing template fields as `NA`.
fn field(raw: &str) -> Option<String> {
    let raw = raw.trim_end_matches('\r');
    if raw.trim().is_empty() || raw.trim() == "NA" {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Parses one progress line printed through our progress template.
/// Returns None for any other output.
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let rest = line.trim_start().strip_prefix(PROGRESS_PREFIX)?;
    let mut parts = rest.splitn(5, '|');
    let status = TransferStatus::from_tag(parts.next()?);
    Some(ProgressEvent {
        status,
        percent: parts.next().and_then(field),
        speed: parts.next().and_then(field),
        eta: parts.next().and_then(field),
        filename: parts.next().and_then(field),
    })
}

/// Parses the final-path line printed after post-processing.
pub(super) fn parse_file_line(line: &str) -> Option<String> {
    let rest = line.trim_start().strip_prefix(FILE_PREFIX)?;
    field(rest)
}

/// Lines yt-dlp uses for fatal errors.
pub(super) fn is_error_line(line: &str) -> bool {
    line.trim_start().starts_with("ERROR:")
}
