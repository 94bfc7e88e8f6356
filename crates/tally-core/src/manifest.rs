//! Nested manifest of published summary files.
//!
//! The manifest mirrors the reports directory hierarchy strictly below
//! the root; a directory appears only when it or a descendant holds a
//! `summary.json`. The frontend fetches this one file to learn which
//! version/build paths exist, then loads the summaries themselves.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

use crate::errors::ReportError;

/// Marker file whose presence makes a directory a manifest leaf.
pub const SUMMARY_MARKER: &str = "summary.json";

/// Name of the manifest written into the reports root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// One directory level: an optional marker leaf plus child directories,
/// flattened so the JSON reads `{"123": {"summary": "summary.json"}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManifestNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(flatten)]
    pub children: BTreeMap<String, ManifestNode>,
}

impl ManifestNode {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.children.is_empty()
    }

    fn insert(&mut self, relative: &Path) {
        let mut node = self;
        for part in relative.components() {
            let key = part.as_os_str().to_string_lossy().into_owned();
            node = node.children.entry(key).or_default();
        }
        node.summary = Some(SUMMARY_MARKER.to_string());
    }
}

/// Build the manifest tree for everything below `root`.
///
/// The root level itself is omitted; unreadable entries are skipped; a
/// missing or empty root yields the empty tree.
pub fn scan_reports_tree(root: &Path) -> ManifestNode {
    let mut tree = ManifestNode::default();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() || entry.file_name() != std::ffi::OsStr::new(SUMMARY_MARKER)
        {
            continue;
        }
        // The root level itself never contributes a leaf.
        let dir = match entry.path().parent() {
            Some(dir) if dir != root => dir,
            _ => continue,
        };
        if let Ok(relative) = dir.strip_prefix(root) {
            tree.insert(relative);
        }
    }
    tree
}

/// Pretty-print the manifest, rebuilt in full on every run.
pub fn write_manifest(tree: &ManifestNode, out: &Path) -> Result<(), ReportError> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(tree)?;
    std::fs::write(out, json)?;
    Ok(())
}
