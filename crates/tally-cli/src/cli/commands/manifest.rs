//! `tally manifest` - index available summary.json files.
//!
//! No flags: scans `./reports` and rewrites `./reports/manifest.json`
//! in full, empty tree included.

use std::path::Path;

use crate::cli::args::ManifestArgs;
use crate::exit_codes::SUCCESS;
use tally_core::{scan_reports_tree, write_manifest, MANIFEST_FILE};

pub fn run(_args: ManifestArgs) -> anyhow::Result<i32> {
    let reports_dir = Path::new("reports");
    println!("Scanning reports directory: {}", reports_dir.display());

    let tree = scan_reports_tree(reports_dir);
    write_manifest(&tree, &reports_dir.join(MANIFEST_FILE))?;

    println!(
        "Generated manifest.json with {} characters",
        serde_json::to_string(&tree)?.len()
    );
    println!("Structure: {}", serde_json::to_string_pretty(&tree)?);
    Ok(SUCCESS)
}
