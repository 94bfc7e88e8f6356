//! The run descriptor dropped next to the surefire reports.
//!
//! CI writes one `system_info.json` per reports directory with the
//! version, build time and revision of the binary under test. All fields
//! are free-form and optional; whatever else the descriptor carries is
//! preserved verbatim into the consolidated output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::ReportError;
use crate::slug::{format_build_time, slugify};

/// Name of the descriptor file expected inside the reports directory.
pub const SYSTEM_INFO_FILE: &str = "system_info.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SystemInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "buildTime", skip_serializing_if = "Option::is_none")]
    pub build_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Extra descriptor fields ride along untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl SystemInfo {
    pub fn version_or_unknown(&self) -> &str {
        self.version.as_deref().unwrap_or("unknown")
    }

    pub fn revision_or_unknown(&self) -> &str {
        self.revision.as_deref().unwrap_or("unknown")
    }

    /// Build-time path segment (`YYYY-MM-DD_HH-MM-SS` or slug fallback).
    pub fn formatted_build_time(&self) -> String {
        format_build_time(self.build_time.as_deref())
    }

    /// Key identifying one build inside a version's summary document.
    pub fn build_key(&self) -> String {
        format!(
            "{}_{}",
            self.formatted_build_time(),
            slugify(self.revision_or_unknown())
        )
    }
}

/// Load the descriptor; its absence is the one fatal missing-input case.
pub fn load_system_info(reports_dir: &Path) -> Result<SystemInfo, ReportError> {
    let path = reports_dir.join(SYSTEM_INFO_FILE);
    if !path.exists() {
        return Err(ReportError::MissingInput { path });
    }
    let raw = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&raw)?)
}
