//! Startup and reload.
//!
//! # Responsibilities
//! - Install the logging pipeline and its configuration listener
//! - Load the configuration file into the global registry
//!
//! # Design Decisions
//! - Logging is installed before the first load so a `logs` key in the
//!   file takes effect on that same load

use std::path::Path;

use crate::config::{self, ConfigError, LoadReport, Registry};
use crate::logging::{self, LoggerManager};

/// Install logging and apply the file at `path`.
pub fn start(path: &Path) -> Result<&'static LoggerManager, ConfigError> {
    let manager = logging::init();
    load(path)?;
    Ok(manager)
}

/// Apply the file at `path` to the global registry.
pub fn load(path: &Path) -> Result<LoadReport, ConfigError> {
    let report = config::load_from_path(Registry::global(), path)?;
    tracing::info!(
        path = %path.display(),
        applied = report.applied,
        failed = report.failed,
        unmatched = report.unmatched,
        "Configuration applied"
    );
    Ok(report)
}
