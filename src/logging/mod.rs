//! Logging pipeline driven by configuration.
//!
//! # Data Flow
//! ```text
//! ┌──────────────┐   LogLine    ┌──────────┐  filter   ┌──────────────┐
//! │ log_* macros │ ───────────► │  Logger  │ ────────► │  Appenders   │
//! └──────────────┘  (on drop)   └──────────┘           │ console/file │
//!                                    │ none attached   └──────────────┘
//!                                    ▼
//!                                root logger
//!
//! "logs" config entry ──listener──► reconcile ──► LoggerManager
//! ```
//!
//! # Design Decisions
//! - Patterns compile once into render fields; rendering is a linear walk
//! - The global manager and its listener are installed once by [`init`];
//!   nothing relies on static initialization order
//! - The crate's own diagnostics go to `tracing`, never through this pipeline

pub mod appender;
pub mod define;
pub mod error;
pub mod event;
pub mod field;
pub mod formatter;
pub mod level;
pub mod logger;
pub mod manager;
pub mod pattern;
pub mod reconcile;

pub use appender::{Appender, AppenderCore, ConsoleAppender, FileAppender};
pub use define::{AppenderDefine, AppenderKind, LogDefine};
pub use error::LogError;
pub use event::{LogEvent, LogLine};
pub use field::RenderField;
pub use formatter::{Formatter, DEFAULT_PATTERN};
pub use level::Severity;
pub use logger::Logger;
pub use manager::{LoggerManager, ROOT_LOGGER};
pub use reconcile::{LogDefines, LISTENER_ID, LOG_DEFINES_KEY};

use std::sync::{Arc, Once, OnceLock};

use crate::config::Registry;

/// The process-wide emitter registry.
pub fn manager() -> &'static LoggerManager {
    static MANAGER: OnceLock<LoggerManager> = OnceLock::new();
    MANAGER.get_or_init(LoggerManager::new)
}

/// Install the global manager and bind it to the global `logs` entry.
///
/// Safe to call any number of times; only the first call installs.
pub fn init() -> &'static LoggerManager {
    static INSTALL: Once = Once::new();
    let manager = manager();
    INSTALL.call_once(|| {
        if let Err(e) = reconcile::install(Registry::global(), manager) {
            tracing::error!(error = %e, "Failed to install log configuration listener");
        }
    });
    manager
}

pub fn root() -> Arc<Logger> {
    manager().root()
}

/// Global emitter called `name`.
pub fn logger(name: &str) -> Arc<Logger> {
    manager().get_logger(name)
}
