//! Emitter registry.
//!
//! # Responsibilities
//! - Own the root emitter and every named emitter
//! - Create emitters on first use, wired to fall back to root
//! - Export the live topology as definitions
//! - Reopen file destinations for log rotation

use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashMap;

use crate::logging::{ConsoleAppender, LogDefine, LogError, Logger};

pub const ROOT_LOGGER: &str = "root";

/// Name → emitter table with a root fallback.
pub struct LoggerManager {
    root: Arc<Logger>,
    loggers: DashMap<String, Arc<Logger>>,
}

impl LoggerManager {
    /// Create a manager whose root writes to the console.
    pub fn new() -> Self {
        let root = Arc::new(Logger::new(ROOT_LOGGER));
        root.add_appender(Arc::new(ConsoleAppender::new()));

        let loggers = DashMap::new();
        loggers.insert(ROOT_LOGGER.to_string(), root.clone());
        Self { root, loggers }
    }

    pub fn root(&self) -> Arc<Logger> {
        self.root.clone()
    }

    /// Fetch the emitter called `name`, creating it if absent.
    pub fn get_logger(&self, name: &str) -> Arc<Logger> {
        self.loggers
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(logger = name, "Creating logger");
                Arc::new(Logger::with_root(name, self.root.clone()))
            })
            .clone()
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.get(name).map(|l| l.value().clone())
    }

    /// Return `name` to its fresh state. The root gets its console back.
    pub fn reset_logger(&self, name: &str) {
        let Some(logger) = self.lookup(name) else {
            return;
        };
        logger.reset();
        if name == ROOT_LOGGER {
            logger.add_appender(Arc::new(ConsoleAppender::new()));
        }
    }

    /// Reopen every file destination. Returns the first failure after
    /// trying them all.
    pub fn reopen_files(&self) -> Result<(), LogError> {
        let mut result = Ok(());
        for logger in self.loggers() {
            if let Err(e) = logger.reopen() {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    /// Definitions of every known emitter.
    pub fn definitions(&self) -> BTreeSet<LogDefine> {
        self.loggers().iter().map(|l| l.to_define()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    // Cloned out so no map shard lock is held while emitters do IO.
    fn loggers(&self) -> Vec<Arc<Logger>> {
        self.loggers.iter().map(|e| e.value().clone()).collect()
    }
}

impl Default for LoggerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{AppenderDefine, AppenderKind, Severity};

    #[test]
    fn test_get_logger_creates_once() {
        let manager = LoggerManager::new();
        let a = manager.get_logger("system");
        let b = manager.get_logger("system");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&manager.get_logger(ROOT_LOGGER), &manager.root()));
        assert_eq!(manager.names(), vec!["root", "system"]);
        assert!(manager.lookup("other").is_none());
    }

    #[test]
    fn test_root_has_console() {
        let manager = LoggerManager::new();
        let root = manager.root();
        assert_eq!(root.appenders().len(), 1);
        assert_eq!(root.appenders()[0].kind(), AppenderKind::Console);
    }

    #[test]
    fn test_reset_root_restores_console() {
        let manager = LoggerManager::new();
        let root = manager.root();
        root.clear_appenders();
        root.set_level(Severity::Fatal);

        manager.reset_logger(ROOT_LOGGER);
        assert_eq!(root.level(), Severity::Debug);
        assert_eq!(root.appenders().len(), 1);
    }

    #[test]
    fn test_definitions() {
        let manager = LoggerManager::new();
        manager.get_logger("sys").set_level(Severity::Error);

        let defs = manager.definitions();
        let sys = defs.iter().find(|d| d.name == "sys").unwrap();
        assert_eq!(sys.level, Severity::Error);
        assert!(sys.appenders.is_empty());

        let root = defs.iter().find(|d| d.name == "root").unwrap();
        assert_eq!(root.appenders, vec![AppenderDefine::console()]);
    }
}
