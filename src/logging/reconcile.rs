//! Configuration-driven emitter topology.
//!
//! # Data Flow
//! ```text
//! "logs" entry changes (old set, new set)
//!     │
//!     ├─► new definition not in old set ──► get_logger(name)
//!     │                                    set level, pattern, appenders
//!     │
//!     └─► name only in old set ──────────► reset_logger(name)
//! ```
//!
//! # Design Decisions
//! - Appenders are rebuilt from scratch and swapped in as one list
//! - A definition equal to one in the old set is left untouched
//! - Destinations that fail to open are skipped with an error diagnostic

use std::collections::{BTreeSet, HashSet};
use std::ops::Deref;
use std::sync::Arc;

use crate::config::{ConfigError, ConfigVar, Registry};
use crate::logging::{
    Appender, AppenderDefine, AppenderKind, ConsoleAppender, FileAppender, Formatter, LogDefine,
    LogError, LoggerManager, DEFAULT_PATTERN,
};

/// Name of the entry holding emitter definitions.
pub const LOG_DEFINES_KEY: &str = "logs";

/// Listener id used on the `logs` entry.
pub const LISTENER_ID: u64 = 0xF1E231;

pub type LogDefines = BTreeSet<LogDefine>;

/// Register the `logs` entry in `registry` and bind it to `manager`.
pub fn install<M>(registry: &Registry, manager: M) -> Result<Arc<ConfigVar<LogDefines>>, ConfigError>
where
    M: Deref<Target = LoggerManager> + Send + Sync + 'static,
{
    let defines = registry.lookup_or_create(LOG_DEFINES_KEY, LogDefines::new(), "logs config")?;
    defines.add_listener(LISTENER_ID, move |old, new| reconcile(&manager, old, new));
    tracing::debug!(key = LOG_DEFINES_KEY, "Installed log reconciliation listener");
    Ok(defines)
}

/// Bring `manager` from the topology in `old` to the one in `new`.
pub fn reconcile(manager: &LoggerManager, old: &LogDefines, new: &LogDefines) {
    for define in new {
        if old.contains(define) {
            continue;
        }
        apply(manager, define);
    }

    let kept: HashSet<&str> = new.iter().map(|d| d.name.as_str()).collect();
    for define in old {
        if !kept.contains(define.name.as_str()) {
            tracing::info!(logger = %define.name, "Removing logger configuration");
            manager.reset_logger(&define.name);
        }
    }
}

fn apply(manager: &LoggerManager, define: &LogDefine) {
    tracing::info!(
        logger = %define.name,
        level = %define.level,
        appenders = define.appenders.len(),
        "Applying logger configuration"
    );

    let logger = manager.get_logger(&define.name);
    logger.set_level(define.level);

    let pattern = define.formatter.as_deref().unwrap_or(DEFAULT_PATTERN);
    if let Err(e) = logger.set_formatter_pattern(pattern) {
        tracing::error!(logger = %define.name, error = %e, "Keeping previous log formatter");
    }

    let appenders = define
        .appenders
        .iter()
        .filter_map(|a| match build_appender(a) {
            Ok(appender) => Some(appender),
            Err(e) => {
                tracing::error!(logger = %define.name, error = %e, "Skipping log appender");
                None
            }
        })
        .collect();
    logger.set_appenders(appenders);
}

/// Construct a live destination from its definition.
pub fn build_appender(define: &AppenderDefine) -> Result<Arc<dyn Appender>, LogError> {
    let appender: Arc<dyn Appender> = match define.kind {
        AppenderKind::Console => Arc::new(ConsoleAppender::new()),
        AppenderKind::File => {
            let path = define
                .file
                .as_ref()
                .ok_or_else(|| LogError::InvalidDestination("file appender without a path".into()))?;
            Arc::new(FileAppender::open(path)?)
        }
    };
    appender.set_level(define.level);

    if let Some(pattern) = &define.formatter {
        match Formatter::strict(pattern) {
            Ok(formatter) => appender.set_formatter(Arc::new(formatter)),
            Err(e) => tracing::error!(error = %e, "Appender keeps the logger formatter"),
        }
    }
    Ok(appender)
}
