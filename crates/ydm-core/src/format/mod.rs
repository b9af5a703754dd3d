//! Format selection: resolution labels, download request resolution, and the
//! metadata model offered to clients before they pick a quality.

mod info;
mod request;
mod resolution;

pub use info::{AudioOption, MediaInfo, VideoOption};
pub use request::{DownloadRequest, InvalidRequest, MediaKind};
pub use resolution::Resolution;
