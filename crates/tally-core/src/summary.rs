//! Rolling per-version summary document.
//!
//! `<output_dir>/<slug(version)>/summary.json` accumulates one entry per
//! build key per db type across invocations. The file is read, one entry
//! is upserted, and the whole document is written back. A missing file
//! and an unparseable file are treated identically: both start a fresh
//! document, silently discarding whatever was there. There is no
//! locking; concurrent writers for the same version lose updates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::consolidate::SuiteTotals;
use crate::errors::ReportError;
use crate::slug::slugify;
use crate::system_info::SystemInfo;

/// Name of the per-version summary file.
pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersionSummary {
    pub version: Option<String>,
    #[serde(default)]
    pub builds: BTreeMap<String, BuildSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildSummary {
    /// Raw descriptor values, not the slugged path segments.
    #[serde(rename = "buildTime")]
    pub build_time: Option<String>,
    pub revision: Option<String>,
    #[serde(rename = "dbTypes", default)]
    pub db_types: BTreeMap<String, DbTypeStats>,
}

/// Statistics for one db type within one build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbTypeStats {
    #[serde(rename = "testSuites")]
    pub test_suites: usize,
    #[serde(rename = "totalTests")]
    pub total_tests: u64,
    #[serde(rename = "totalErrors")]
    pub total_errors: u64,
    #[serde(rename = "totalFailures")]
    pub total_failures: u64,
    #[serde(rename = "totalSkipped")]
    pub total_skipped: u64,
    #[serde(rename = "totalTime")]
    pub total_time: f64,
    /// Generation time, supplied by the caller.
    pub timestamp: String,
    /// Basename of the consolidated output file this entry refers to.
    #[serde(rename = "outputFile")]
    pub output_file: String,
}

impl DbTypeStats {
    pub fn new(
        test_suites: usize,
        totals: &SuiteTotals,
        timestamp: impl Into<String>,
        output_file: impl Into<String>,
    ) -> Self {
        Self {
            test_suites,
            total_tests: totals.tests,
            total_errors: totals.errors,
            total_failures: totals.failures,
            total_skipped: totals.skipped,
            total_time: totals.time,
            timestamp: timestamp.into(),
            output_file: output_file.into(),
        }
    }
}

impl VersionSummary {
    pub fn new(system_info: &SystemInfo) -> Self {
        Self {
            version: system_info.version.clone(),
            builds: BTreeMap::new(),
        }
    }

    /// Read the existing document, or start fresh when the file is
    /// missing or not valid JSON for this shape.
    pub fn load_or_default(path: &Path, system_info: &SystemInfo) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|_| Self::new(system_info)),
            Err(_) => Self::new(system_info),
        }
    }

    /// Set (or replace) the db-type entry under this descriptor's build
    /// key, creating the build entry on demand.
    pub fn upsert(&mut self, system_info: &SystemInfo, db_type: &str, stats: DbTypeStats) {
        let build = self
            .builds
            .entry(system_info.build_key())
            .or_insert_with(|| BuildSummary {
                build_time: system_info.build_time.clone(),
                revision: system_info.revision.clone(),
                db_types: BTreeMap::new(),
            });
        build.db_types.insert(db_type.to_string(), stats);
    }
}

/// `<output_dir>/<slug(version)>/summary.json`
pub fn summary_path(output_dir: &Path, system_info: &SystemInfo) -> PathBuf {
    output_dir
        .join(slugify(system_info.version_or_unknown()))
        .join(SUMMARY_FILE)
}

/// Write the full document back, creating the version directory as needed.
pub fn write_summary(summary: &VersionSummary, out: &Path) -> Result<(), ReportError> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(out, json)?;
    Ok(())
}
