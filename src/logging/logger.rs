//! Named emitters.
//!
//! # Data Flow
//! ```text
//! log_info!(logger, ...)
//!     │
//!     ▼
//! Logger::event ── level < min ──► None (nothing built)
//!     │
//!     ▼
//! LogLine (dropped) ──► Logger::log ──► appenders, each filtering again
//!                                  └──► root logger when there are none
//! ```

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock};

use arc_swap::ArcSwap;

use crate::logging::{Appender, Formatter, LogDefine, LogError, LogEvent, LogLine, Severity};

/// A named log emitter.
pub struct Logger {
    name: String,
    level: AtomicU8,
    formatter: ArcSwap<Formatter>,
    appenders: RwLock<Vec<Arc<dyn Appender>>>,
    root: Option<Arc<Logger>>,
}

impl Logger {
    /// Create a standalone emitter with no root fallback.
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), None)
    }

    /// Create an emitter that forwards to `root` while it has no appenders.
    pub fn with_root(name: impl Into<String>, root: Arc<Logger>) -> Self {
        Self::build(name.into(), Some(root))
    }

    fn build(name: String, root: Option<Arc<Logger>>) -> Self {
        Self {
            name,
            level: AtomicU8::new(Severity::Debug as u8),
            formatter: ArcSwap::from_pointee(Formatter::default()),
            appenders: RwLock::new(Vec::new()),
            root,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Severity {
        Severity::from(self.level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: Severity) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    pub fn is_enabled(&self, level: Severity) -> bool {
        level >= self.level()
    }

    /// Start a scoped event. `None` when `level` is filtered out.
    pub fn event(self: &Arc<Self>, level: Severity, file: &'static str, line: u32) -> Option<LogLine> {
        if !self.is_enabled(level) {
            return None;
        }
        Some(LogLine::new(self.clone(), LogEvent::new(level, file, line)))
    }

    /// Deliver a complete event.
    pub fn log(&self, event: &LogEvent) {
        self.log_as(&self.name, event);
    }

    fn log_as(&self, emitter: &str, event: &LogEvent) {
        if !self.is_enabled(event.level) {
            return;
        }

        let appenders = self.appenders.read().unwrap_or_else(|e| e.into_inner());
        if !appenders.is_empty() {
            for appender in appenders.iter() {
                appender.log(emitter, event);
            }
        } else if let Some(root) = &self.root {
            root.log_as(emitter, event);
        }
    }

    pub fn formatter(&self) -> Arc<Formatter> {
        self.formatter.load_full()
    }

    /// Replace the default formatter and push it to appenders without an explicit one.
    pub fn set_formatter(&self, formatter: Arc<Formatter>) {
        self.formatter.store(formatter.clone());
        let appenders = self.appenders.read().unwrap_or_else(|e| e.into_inner());
        for appender in appenders.iter() {
            appender.inherit_formatter(formatter.clone());
        }
    }

    /// Compile and install `pattern`. A pattern with errors is refused and
    /// the current formatter stays in place.
    pub fn set_formatter_pattern(&self, pattern: &str) -> Result<(), LogError> {
        let formatter = Formatter::strict(pattern)?;
        self.set_formatter(Arc::new(formatter));
        Ok(())
    }

    pub fn add_appender(&self, appender: Arc<dyn Appender>) {
        appender.inherit_formatter(self.formatter());
        self.appenders
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(appender);
    }

    /// Remove `appender` by identity.
    pub fn remove_appender(&self, appender: &Arc<dyn Appender>) {
        let target = Arc::as_ptr(appender) as *const ();
        self.appenders
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|a| Arc::as_ptr(a) as *const () != target);
    }

    /// Swap the whole appender list in one step.
    pub fn set_appenders(&self, appenders: Vec<Arc<dyn Appender>>) {
        let formatter = self.formatter();
        for appender in &appenders {
            appender.inherit_formatter(formatter.clone());
        }
        *self.appenders.write().unwrap_or_else(|e| e.into_inner()) = appenders;
    }

    pub fn clear_appenders(&self) {
        self.appenders.write().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn appenders(&self) -> Vec<Arc<dyn Appender>> {
        self.appenders.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Back to a fresh emitter: `Debug` level, default pattern, no appenders.
    pub fn reset(&self) {
        self.set_level(Severity::Debug);
        self.formatter.store(Arc::new(Formatter::default()));
        self.clear_appenders();
    }

    /// Reopen every appender backed by a file.
    pub fn reopen(&self) -> Result<(), LogError> {
        let mut result = Ok(());
        for appender in self.appenders() {
            if let Err(e) = appender.reopen() {
                tracing::error!(logger = %self.name, error = %e, "Failed to reopen log appender");
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    pub fn to_define(&self) -> LogDefine {
        LogDefine {
            name: self.name.clone(),
            level: self.level(),
            formatter: Some(self.formatter().pattern().to_string()),
            appenders: self.appenders().iter().map(|a| a.to_define()).collect(),
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("pattern", &self.formatter().pattern())
            .finish()
    }
}
