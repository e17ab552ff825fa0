//! Applying configuration documents to the registry.

use std::fs;
use std::path::Path;

use crate::config::flatten::flatten;
use crate::config::{ConfigError, Registry};
use crate::document::Node;

/// Outcome of one load pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Keys whose entry accepted the new text.
    pub applied: usize,
    /// Keys whose entry rejected the text; those entries kept their value.
    pub failed: usize,
    /// Keys with no registered entry.
    pub unmatched: usize,
}

/// Apply every document key that names a registered entry.
///
/// Never creates entries. Unknown keys are ignored and decode failures leave
/// the affected entry unchanged.
pub fn load_from_document(registry: &Registry, root: &Node) -> LoadReport {
    let mut report = LoadReport::default();

    for entry in flatten(root) {
        if entry.path.is_empty() {
            continue;
        }
        let key = entry.path.to_ascii_lowercase();
        let Some(var) = registry.lookup_base(&key) else {
            report.unmatched += 1;
            continue;
        };

        let text = match entry.node.to_text() {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to serialize document node");
                report.failed += 1;
                continue;
            }
        };

        match var.load_text(&text) {
            Ok(()) => report.applied += 1,
            Err(_) => report.failed += 1,
        }
    }

    tracing::debug!(
        applied = report.applied,
        failed = report.failed,
        unmatched = report.unmatched,
        "Configuration document applied"
    );
    report
}

/// Read a YAML (or `.toml`) file and apply it.
pub fn load_from_path(registry: &Registry, path: &Path) -> Result<LoadReport, ConfigError> {
    let content = fs::read_to_string(path).map_err(crate::document::DocumentError::from)?;
    let root = if path.extension().is_some_and(|ext| ext == "toml") {
        Node::parse_toml(&content)?
    } else {
        Node::parse(&content)?
    };

    tracing::info!(path = %path.display(), "Loading configuration");
    Ok(load_from_document(registry, &root))
}
