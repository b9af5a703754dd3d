pub mod config;
pub mod logging;

pub mod extractor;
pub mod files;
pub mod format;
pub mod job;
pub mod preview;
pub mod tools;
pub mod url_model;
