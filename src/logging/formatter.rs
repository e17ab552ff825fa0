//! Compiled log formatter.

use crate::logging::pattern::{self, FormatToken};
use crate::logging::{LogError, LogEvent, RenderField};

/// Pattern used by the root emitter and by definitions without one.
pub const DEFAULT_PATTERN: &str = "%d%T%t%T%F%T[%p]%T[%c]%T%f:%l%T%m%n";

/// A pattern compiled into an ordered list of render fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    pattern: String,
    fields: Vec<RenderField>,
    has_error: bool,
}

impl Formatter {
    /// Compile `pattern`. Errors are rendered as visible markers.
    pub fn new(pattern: &str) -> Self {
        let compiled = pattern::compile(pattern);
        let fields = compiled
            .tokens
            .into_iter()
            .map(|token| match token {
                FormatToken::Literal(text) => RenderField::Literal(text),
                FormatToken::Field { code, arg } => RenderField::resolve(&code, arg.as_deref())
                    .unwrap_or_else(|| RenderField::Literal(pattern::error_marker(&code))),
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            fields,
            has_error: compiled.has_error,
        }
    }

    /// Compile `pattern`, refusing it if any part failed to compile.
    pub fn strict(pattern: &str) -> Result<Self, LogError> {
        let formatter = Self::new(pattern);
        if formatter.has_error {
            return Err(LogError::InvalidPattern(pattern.to_string()));
        }
        Ok(formatter)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// Render `event` as emitted by `emitter`.
    pub fn format(&self, emitter: &str, event: &LogEvent) -> String {
        let mut out = String::with_capacity(64 + event.message.len());
        for field in &self.fields {
            field.render(&mut out, emitter, event);
        }
        out
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Severity;
    use chrono::TimeZone;

    fn event(level: Severity, message: &str) -> LogEvent {
        let mut event = LogEvent::new(level, "src/lib.rs", 10).with_message(message);
        event.time = chrono::Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        event.thread_id = 3;
        event
    }

    #[test]
    fn test_separator_and_newline() {
        let formatter = Formatter::new("%d%T%p%T%m%n");
        assert!(!formatter.has_error());
        assert_eq!(
            formatter.format("root", &event(Severity::Info, "hello")),
            "2024-01-02 03:04:05  INFO  hello\n"
        );
    }

    #[test]
    fn test_default_pattern() {
        let formatter = Formatter::default();
        assert!(!formatter.has_error());
        assert_eq!(
            formatter.format("system", &event(Severity::Error, "boom")),
            "2024-01-02 03:04:05  3  0  [ERROR]  [system]  src/lib.rs:10  boom\n"
        );
    }

    #[test]
    fn test_bad_pattern_still_renders() {
        let formatter = Formatter::new("[%p] %z %m");
        assert!(formatter.has_error());
        assert_eq!(
            formatter.format("x", &event(Severity::Warn, "hi")),
            "[WARN] <<error_format %z>> hi"
        );
    }

    #[test]
    fn test_strict_rejects_errors() {
        assert!(matches!(Formatter::strict("%m%d{"), Err(LogError::InvalidPattern(_))));
        assert!(Formatter::strict("%m%n").is_ok());
    }
}
