//! Output destinations.
//!
//! # Responsibilities
//! - Filter events by the destination's own level
//! - Render with the destination's formatter and write the result
//! - Reopen file streams for log rotation
//!
//! # Design Decisions
//! - Level and formatter reads are lock-free; only render-and-write is serialized
//! - A formatter is either explicit or inherited from the owning emitter; an
//!   inherited one follows later emitter changes, an explicit one never does

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use crate::logging::{AppenderDefine, AppenderKind, Formatter, LogError, LogEvent, Severity};

#[derive(Debug)]
struct FormatterSlot {
    formatter: Arc<Formatter>,
    explicit: bool,
}

/// Level and formatter state shared by every destination.
#[derive(Debug)]
pub struct AppenderCore {
    level: AtomicU8,
    slot: ArcSwap<FormatterSlot>,
}

impl AppenderCore {
    pub fn new() -> Self {
        Self {
            level: AtomicU8::new(Severity::Unknown as u8),
            slot: ArcSwap::from_pointee(FormatterSlot {
                formatter: Arc::new(Formatter::default()),
                explicit: false,
            }),
        }
    }

    fn explicit_pattern(&self) -> Option<String> {
        let slot = self.slot.load();
        slot.explicit.then(|| slot.formatter.pattern().to_string())
    }
}

impl Default for AppenderCore {
    fn default() -> Self {
        Self::new()
    }
}

/// A log output destination.
pub trait Appender: Send + Sync {
    fn core(&self) -> &AppenderCore;

    fn kind(&self) -> AppenderKind;

    /// Render and write an event that already passed the level filter.
    fn write(&self, emitter: &str, event: &LogEvent);

    /// Close and reopen the underlying stream. No-op for streams without one.
    fn reopen(&self) -> Result<(), LogError> {
        Ok(())
    }

    /// Definition describing this destination's current state.
    fn to_define(&self) -> AppenderDefine;

    fn log(&self, emitter: &str, event: &LogEvent) {
        if event.level >= self.level() {
            self.write(emitter, event);
        }
    }

    fn level(&self) -> Severity {
        Severity::from(self.core().level.load(Ordering::Relaxed))
    }

    fn set_level(&self, level: Severity) {
        self.core().level.store(level as u8, Ordering::Relaxed);
    }

    fn formatter(&self) -> Arc<Formatter> {
        self.core().slot.load().formatter.clone()
    }

    /// Install an explicit formatter that emitter changes will not override.
    fn set_formatter(&self, formatter: Arc<Formatter>) {
        self.core().slot.store(Arc::new(FormatterSlot {
            formatter,
            explicit: true,
        }));
    }

    /// Adopt the emitter's formatter unless an explicit one is installed.
    fn inherit_formatter(&self, formatter: Arc<Formatter>) {
        self.core().slot.rcu(|slot| {
            if slot.explicit {
                slot.clone()
            } else {
                Arc::new(FormatterSlot {
                    formatter: formatter.clone(),
                    explicit: false,
                })
            }
        });
    }

    fn has_explicit_formatter(&self) -> bool {
        self.core().slot.load().explicit
    }
}

/// Writes to standard output.
#[derive(Debug, Default)]
pub struct ConsoleAppender {
    core: AppenderCore,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Appender for ConsoleAppender {
    fn core(&self) -> &AppenderCore {
        &self.core
    }

    fn kind(&self) -> AppenderKind {
        AppenderKind::Console
    }

    fn write(&self, emitter: &str, event: &LogEvent) {
        let formatter = self.formatter();
        let mut out = io::stdout().lock();
        let text = formatter.format(emitter, event);
        if out.write_all(text.as_bytes()).is_ok() {
            let _ = out.flush();
        }
    }

    fn to_define(&self) -> AppenderDefine {
        AppenderDefine {
            kind: AppenderKind::Console,
            level: self.level(),
            formatter: self.core.explicit_pattern(),
            file: None,
        }
    }
}

/// Appends to a file.
#[derive(Debug)]
pub struct FileAppender {
    core: AppenderCore,
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileAppender {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LogError> {
        let path = path.into();
        let file = open_file(&path, false)?;
        Ok(Self {
            core: AppenderCore::new(),
            path,
            file: Mutex::new(Some(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Appender for FileAppender {
    fn core(&self) -> &AppenderCore {
        &self.core
    }

    fn kind(&self) -> AppenderKind {
        AppenderKind::File
    }

    fn write(&self, emitter: &str, event: &LogEvent) {
        let formatter = self.formatter();
        let mut guard = self.file.lock().unwrap_or_else(|e| e.into_inner());
        let Some(file) = guard.as_mut() else {
            return;
        };
        let text = formatter.format(emitter, event);
        if let Err(e) = file.write_all(text.as_bytes()) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to write log file");
        }
    }

    /// Truncate and reopen the file. On failure the appender drops output
    /// until the next successful reopen.
    fn reopen(&self) -> Result<(), LogError> {
        let mut guard = self.file.lock().unwrap_or_else(|e| e.into_inner());
        guard.take();
        let file = open_file(&self.path, true)?;
        *guard = Some(file);
        Ok(())
    }

    fn to_define(&self) -> AppenderDefine {
        AppenderDefine {
            kind: AppenderKind::File,
            level: self.level(),
            formatter: self.core.explicit_pattern(),
            file: Some(self.path.clone()),
        }
    }
}

fn open_file(path: &Path, truncate: bool) -> Result<File, LogError> {
    let mut options = OpenOptions::new();
    if truncate {
        options.write(true).truncate(true);
    } else {
        options.append(true);
    }
    options.create(true).open(path).map_err(|source| LogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Collects rendered lines in memory.
    #[derive(Default)]
    pub struct MemoryAppender {
        core: AppenderCore,
        lines: Mutex<Vec<String>>,
    }

    impl MemoryAppender {
        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl Appender for MemoryAppender {
        fn core(&self) -> &AppenderCore {
            &self.core
        }

        fn kind(&self) -> AppenderKind {
            AppenderKind::Console
        }

        fn write(&self, emitter: &str, event: &LogEvent) {
            let text = self.formatter().format(emitter, event);
            self.lines.lock().unwrap().push(text);
        }

        fn to_define(&self) -> AppenderDefine {
            AppenderDefine::console().with_level(self.level())
        }
    }
}
