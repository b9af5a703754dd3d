//! Resolution labels offered to clients and their pixel heights.

use std::fmt;

/// A video quality a client may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resolution {
    P144,
    P240,
    P360,
    P480,
    P720,
    P1080,
    P1440,
    Uhd4k,
    Uhd8k,
}

impl Resolution {
    /// Every resolution, lowest first.
    pub const ALL: [Resolution; 9] = [
        Resolution::P144,
        Resolution::P240,
        Resolution::P360,
        Resolution::P480,
        Resolution::P720,
        Resolution::P1080,
        Resolution::P1440,
        Resolution::Uhd4k,
        Resolution::Uhd8k,
    ];

    /// Used when a video request names no quality.
    pub const DEFAULT: Resolution = Resolution::P720;

    pub fn label(self) -> &'static str {
        match self {
            Resolution::P144 => "144p",
            Resolution::P240 => "240p",
            Resolution::P360 => "360p",
            Resolution::P480 => "480p",
            Resolution::P720 => "720p",
            Resolution::P1080 => "1080p",
            Resolution::P1440 => "1440p",
            Resolution::Uhd4k => "4K",
            Resolution::Uhd8k => "8K",
        }
    }

    pub fn height(self) -> u32 {
        match self {
            Resolution::P144 => 144,
            Resolution::P240 => 240,
            Resolution::P360 => 360,
            Resolution::P480 => 480,
            Resolution::P720 => 720,
            Resolution::P1080 => 1080,
            Resolution::P1440 => 1440,
            Resolution::Uhd4k => 2160,
            Resolution::Uhd8k => 4320,
        }
    }

    /// Parses a client label. Labels are matched exactly ("720p", "4K").
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.label() == label.trim())
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
