//! Log events and the scoped line builder.

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use chrono::{DateTime, Local};

use crate::logging::{Logger, Severity};
use crate::runtime;

/// One structured log record.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: Severity,
    pub message: String,
    /// Source file of the call site.
    pub file: &'static str,
    pub line: u32,
    /// Milliseconds since the logging clock started.
    pub elapsed_ms: u64,
    pub thread_id: u64,
    pub fiber_id: u64,
    pub time: DateTime<Local>,
}

impl LogEvent {
    /// Capture an event at the current time on the current thread.
    pub fn new(level: Severity, file: &'static str, line: u32) -> Self {
        Self {
            level,
            message: String::new(),
            file,
            line,
            elapsed_ms: elapsed_ms(),
            thread_id: runtime::current_id(),
            fiber_id: 0,
            time: Local::now(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_fiber_id(mut self, fiber_id: u64) -> Self {
        self.fiber_id = fiber_id;
        self
    }
}

/// Milliseconds since the first logging call in this process.
pub fn elapsed_ms() -> u64 {
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_millis() as u64
}

/// Event under construction. Dropping it hands the event to its logger.
///
/// Obtained from [`Logger::event`]; write the message through `fmt::Write`.
/// The event is delivered however the enclosing scope exits.
pub struct LogLine {
    logger: Arc<Logger>,
    event: LogEvent,
}

impl LogLine {
    pub(crate) fn new(logger: Arc<Logger>, event: LogEvent) -> Self {
        Self { logger, event }
    }

    pub fn event_mut(&mut self) -> &mut LogEvent {
        &mut self.event
    }
}

impl fmt::Write for LogLine {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.event.message.push_str(s);
        Ok(())
    }
}

impl Drop for LogLine {
    fn drop(&mut self) {
        self.logger.log(&self.event);
    }
}

/// Log a formatted message at `level` through `logger`.
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        if let Some(mut line) = $logger.event($level, file!(), line!()) {
            let _ = ::std::fmt::Write::write_fmt(&mut line, format_args!($($arg)+));
        }
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::logging::Severity::Debug, $($arg)+) };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::logging::Severity::Info, $($arg)+) };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::logging::Severity::Warn, $($arg)+) };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::logging::Severity::Error, $($arg)+) };
}

#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::logging::Severity::Fatal, $($arg)+) };
}
