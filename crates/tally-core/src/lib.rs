//! Offline consolidation of surefire test reports.
//!
//! One invocation parses the `TEST-*.xml` documents of a single reports
//! directory into a consolidated, versioned JSON report and folds its
//! totals into a rolling per-version `summary.json`. A second utility
//! walks the published output tree and indexes every summary file into a
//! `manifest.json` for the static frontend.
//!
//! All logic here is synchronous and one-shot. The per-version summary
//! file is read-then-overwritten without locking; concurrent writers for
//! the same version are an explicit non-goal (last writer wins).

pub mod consolidate;
pub mod errors;
pub mod junit;
pub mod manifest;
pub mod slug;
pub mod summary;
pub mod system_info;

// Convenience re-exports
pub use consolidate::{
    collect_reports, consolidated_output_path, write_consolidated, ConsolidatedReport,
    SkippedReport, SuiteTotals, REPORT_PREFIX,
};
pub use errors::ReportError;
pub use junit::{parse_test_suite, OutcomeDetail, TestCase, TestSuite};
pub use manifest::{scan_reports_tree, write_manifest, ManifestNode, MANIFEST_FILE, SUMMARY_MARKER};
pub use slug::{format_build_time, slugify};
pub use summary::{
    summary_path, write_summary, BuildSummary, DbTypeStats, VersionSummary, SUMMARY_FILE,
};
pub use system_info::{load_system_info, SystemInfo, SYSTEM_INFO_FILE};
