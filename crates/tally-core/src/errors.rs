//! Error taxonomy for report processing.
//!
//! `Format` is raised per test-result document and caught at the
//! aggregation level (the document is skipped and logged). Everything
//! else aborts the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Document could not be parsed as a surefire test suite.
    #[error("invalid test result XML: {reason}")]
    Format { reason: String },

    /// The required descriptor file is absent from the reports directory.
    #[error("system_info.json not found at {}", path.display())]
    MissingInput { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    pub fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
        }
    }

    /// True when the error invalidates only one input document, not the batch.
    pub fn is_per_document(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}
