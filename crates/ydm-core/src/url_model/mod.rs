//! Source locator validation and filename sanitization.
//!
//! Only the shape of a locator is checked here; whether the platform can
//! actually serve it is left to the extractor.

mod sanitize;

pub use sanitize::sanitize_filename;

use regex::Regex;
use std::sync::LazyLock;

static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(https?://)?(www\.)?(youtube|youtu|youtube-nocookie)\.(com|be)/",
        r"(watch\?v=|embed/|v/|.+\?v=)?([^&=%?]{11})",
    ))
    .expect("static regex")
});

/// Returns true if `url` looks like a single-video locator the extractor accepts.
///
/// # Examples
///
/// - `https://www.youtube.com/watch?v=dQw4w9WgXcQ` → `true`
/// - `https://youtu.be/dQw4w9WgXcQ` → `true`
/// - `https://example.com/video.mp4` → `false`
pub fn is_valid_media_url(url: &str) -> bool {
    VIDEO_URL.is_match(url.trim())
}
