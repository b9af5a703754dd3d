use std::path::PathBuf;
use std::sync::Arc;
use ydm_core::config::PreviewConfig;
use ydm_core::extractor::Extractor;
use ydm_core::job::JobManager;

/// Shared by every handler; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub manager: JobManager,
    /// Used directly for metadata and previews; downloads go through `manager`.
    pub extractor: Arc<dyn Extractor>,
    pub preview_dir: PathBuf,
    pub preview: PreviewConfig,
}
