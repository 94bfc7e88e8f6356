//! `tally process` - consolidate one surefire reports directory.

use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::cli::args::ProcessArgs;
use crate::exit_codes::{FAILURE, SUCCESS};
use tally_core::{
    collect_reports, consolidated_output_path, load_system_info, summary_path, write_consolidated,
    write_summary, ConsolidatedReport, DbTypeStats, SuiteTotals, VersionSummary,
};

pub fn run(args: ProcessArgs) -> anyhow::Result<i32> {
    let reports_dir = resolve_reports_dir(&args.reports_dir);
    tracing::debug!(reports_dir = %reports_dir.display(), "resolved reports directory");
    if !reports_dir.exists() {
        eprintln!("Error: Reports directory not found: {}", reports_dir.display());
        return Ok(FAILURE);
    }

    println!("Using output directory: {}", args.output_dir.display());

    match process_reports(&reports_dir, &args.db_type, &args.output_dir) {
        Ok(output_path) => {
            println!("\nProcessing complete! Output file: {}", output_path.display());
            Ok(SUCCESS)
        }
        Err(e) => {
            eprintln!("Error processing surefire reports: {e:#}");
            Ok(FAILURE)
        }
    }
}

fn process_reports(reports_dir: &Path, db_type: &str, output_dir: &Path) -> anyhow::Result<PathBuf> {
    println!("Processing surefire reports from: {}", reports_dir.display());
    println!("Using database type: {db_type}");

    let system_info = load_system_info(reports_dir)?;
    println!(
        "System info loaded - Version: {}, Build: {}, Revision: {}",
        system_info.version_or_unknown(),
        system_info.build_time.as_deref().unwrap_or("unknown"),
        system_info.revision_or_unknown()
    );

    let (results, skipped) = collect_reports(reports_dir)?;
    println!("Found {} test result files", results.len() + skipped.len());
    // Per-document failures are logged and skipped; they never abort the batch.
    for skip in &skipped {
        eprintln!("Error processing {}: {}", skip.file_name, skip.reason);
    }
    for (key, suite) in &results {
        println!("Processed: {} ({} tests)", key, suite.tests);
    }

    let output_path = consolidated_output_path(output_dir, &system_info, db_type);
    let consolidated = ConsolidatedReport {
        system_info,
        results,
    };
    write_consolidated(&consolidated, &output_path)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    println!("\nConsolidated results written to: {}", output_path.display());
    println!("Total test suites: {}", consolidated.results.len());

    let totals = SuiteTotals::collect(consolidated.results.values());
    println!("Total tests: {}", totals.tests);
    println!("Total errors: {}", totals.errors);
    println!("Total failures: {}", totals.failures);
    println!("Total skipped: {}", totals.skipped);

    let output_file = output_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stats = DbTypeStats::new(
        consolidated.results.len(),
        &totals,
        chrono::Local::now()
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string(),
        output_file,
    );

    let summary_file = summary_path(output_dir, &consolidated.system_info);
    let mut summary = VersionSummary::load_or_default(&summary_file, &consolidated.system_info);
    summary.upsert(&consolidated.system_info, db_type, stats);
    write_summary(&summary, &summary_file)
        .with_context(|| format!("failed to write {}", summary_file.display()))?;
    println!("Updated summary file: {}", summary_file.display());

    Ok(output_path)
}

/// The default reports directory sits next to the tool, so relative
/// paths resolve against the executable's directory, not the cwd.
fn resolve_reports_dir(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join(dir)))
        .unwrap_or_else(|| dir.to_path_buf())
}
