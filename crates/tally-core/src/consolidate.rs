//! `TEST-*.xml` collection and the per-invocation consolidated report.
//!
//! A parse failure in one document is recorded and skipped; it never
//! aborts the batch. Only a missing descriptor or an unreadable reports
//! directory is fatal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::ReportError;
use crate::junit::{parse_test_suite, TestSuite};
use crate::slug::slugify;
use crate::system_info::SystemInfo;

/// Filename prefix of surefire result documents; the suite key is the
/// file stem with this prefix removed.
pub const REPORT_PREFIX: &str = "TEST-";

/// The consolidated document written once per invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsolidatedReport {
    pub system_info: SystemInfo,
    pub results: BTreeMap<String, TestSuite>,
}

/// One input document that failed to parse and was left out of the batch.
#[derive(Debug, Clone)]
pub struct SkippedReport {
    pub file_name: String,
    pub reason: String,
}

/// Aggregate counters over the successfully parsed suites.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SuiteTotals {
    pub tests: u64,
    pub errors: u64,
    pub failures: u64,
    pub skipped: u64,
    pub time: f64,
}

impl SuiteTotals {
    pub fn collect<'a>(suites: impl IntoIterator<Item = &'a TestSuite>) -> Self {
        suites.into_iter().fold(Self::default(), |mut acc, suite| {
            acc.tests += suite.tests;
            acc.errors += suite.errors;
            acc.failures += suite.failures;
            acc.skipped += suite.skipped;
            acc.time += suite.time;
            acc
        })
    }
}

/// Parse every `TEST-*.xml` directly inside `reports_dir`.
///
/// Returns the suite map plus the documents that were skipped, so the
/// caller can log each one.
pub fn collect_reports(
    reports_dir: &Path,
) -> Result<(BTreeMap<String, TestSuite>, Vec<SkippedReport>), ReportError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(reports_dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_report_file(path))
        .collect();
    paths.sort();

    let mut results = BTreeMap::new();
    let mut skipped = Vec::new();
    for path in paths {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match std::fs::read_to_string(&path)
            .map_err(ReportError::from)
            .and_then(|xml| parse_test_suite(&xml))
        {
            Ok(suite) => {
                let key = suite_key(&path);
                results.insert(key, suite);
            }
            Err(err) => {
                tracing::warn!(file = %file_name, error = %err, "skipping test result document");
                skipped.push(SkippedReport {
                    file_name,
                    reason: err.to_string(),
                });
            }
        }
    }
    Ok((results, skipped))
}

fn is_report_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(REPORT_PREFIX) && n.ends_with(".xml"))
}

fn suite_key(path: &Path) -> String {
    path.file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .replace(REPORT_PREFIX, "")
}

/// `<output_dir>/<slug(version)>/<build_time>_<slug(revision)>/<slug(db_type)>.json`
pub fn consolidated_output_path(
    output_dir: &Path,
    system_info: &SystemInfo,
    db_type: &str,
) -> PathBuf {
    output_dir
        .join(slugify(system_info.version_or_unknown()))
        .join(system_info.build_key())
        .join(format!("{}.json", slugify(db_type)))
}

/// Write the consolidated report, creating intermediate directories and
/// overwriting any prior file at the same path.
pub fn write_consolidated(report: &ConsolidatedReport, out: &Path) -> Result<(), ReportError> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(out, json)?;
    Ok(())
}
