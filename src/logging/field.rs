//! Render fields: the compiled units of a log pattern.
//!
//! | code | renders                               |
//! |------|---------------------------------------|
//! | `m`  | message                               |
//! | `p`  | severity name                         |
//! | `r`  | elapsed milliseconds                  |
//! | `c`  | emitter name                          |
//! | `t`  | thread id                             |
//! | `n`  | line break                            |
//! | `d`  | timestamp, `{strftime}` argument      |
//! | `f`  | source file                           |
//! | `l`  | source line                           |
//! | `T`  | two-space separator                   |
//! | `F`  | fiber id                              |

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};

use crate::logging::LogEvent;

pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SEPARATOR: &str = "  ";

/// A single renderable piece of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderField {
    Literal(String),
    Message,
    Severity,
    Elapsed,
    EmitterName,
    ThreadId,
    NewLine,
    DateTime(String),
    File,
    Line,
    Separator,
    FiberId,
}

impl RenderField {
    /// Resolve a field code and its optional `{}` argument.
    ///
    /// Returns `None` for unknown codes and unusable timestamp formats.
    pub fn resolve(code: &str, arg: Option<&str>) -> Option<Self> {
        let field = match code {
            "m" => RenderField::Message,
            "p" => RenderField::Severity,
            "r" => RenderField::Elapsed,
            "c" => RenderField::EmitterName,
            "t" => RenderField::ThreadId,
            "n" => RenderField::NewLine,
            "d" => {
                let format = arg.filter(|a| !a.is_empty()).unwrap_or(DEFAULT_TIME_FORMAT);
                if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                    return None;
                }
                RenderField::DateTime(format.to_string())
            }
            "f" => RenderField::File,
            "l" => RenderField::Line,
            "T" => RenderField::Separator,
            "F" => RenderField::FiberId,
            _ => return None,
        };
        Some(field)
    }

    /// Append this field's rendering of `event` to `out`.
    pub fn render(&self, out: &mut String, emitter: &str, event: &LogEvent) {
        // Writing into a String cannot fail.
        let _ = match self {
            RenderField::Literal(text) => {
                out.push_str(text);
                Ok(())
            }
            RenderField::Message => {
                out.push_str(&event.message);
                Ok(())
            }
            RenderField::Severity => {
                out.push_str(event.level.as_str());
                Ok(())
            }
            RenderField::Elapsed => write!(out, "{}", event.elapsed_ms),
            RenderField::EmitterName => {
                out.push_str(emitter);
                Ok(())
            }
            RenderField::ThreadId => write!(out, "{}", event.thread_id),
            RenderField::NewLine => {
                out.push('\n');
                Ok(())
            }
            RenderField::DateTime(format) => write!(out, "{}", event.time.format(format)),
            RenderField::File => {
                out.push_str(event.file);
                Ok(())
            }
            RenderField::Line => write!(out, "{}", event.line),
            RenderField::Separator => {
                out.push_str(SEPARATOR);
                Ok(())
            }
            RenderField::FiberId => write!(out, "{}", event.fiber_id),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Severity;
    use chrono::TimeZone;

    fn event() -> LogEvent {
        let mut event = LogEvent::new(Severity::Warn, "src/main.rs", 42).with_message("hi");
        event.time = chrono::Local.with_ymd_and_hms(2024, 3, 9, 8, 5, 1).unwrap();
        event.thread_id = 7;
        event.elapsed_ms = 1500;
        event
    }

    fn render(field: RenderField) -> String {
        let mut out = String::new();
        field.render(&mut out, "sys", &event());
        out
    }

    #[test]
    fn test_all_codes_resolve() {
        for code in ["m", "p", "r", "c", "t", "n", "d", "f", "l", "T", "F"] {
            assert!(RenderField::resolve(code, None).is_some(), "code {code}");
        }
        assert!(RenderField::resolve("x", None).is_none());
        assert!(RenderField::resolve("mm", None).is_none());
    }

    #[test]
    fn test_field_rendering() {
        assert_eq!(render(RenderField::Message), "hi");
        assert_eq!(render(RenderField::Severity), "WARN");
        assert_eq!(render(RenderField::Elapsed), "1500");
        assert_eq!(render(RenderField::EmitterName), "sys");
        assert_eq!(render(RenderField::ThreadId), "7");
        assert_eq!(render(RenderField::File), "src/main.rs");
        assert_eq!(render(RenderField::Line), "42");
        assert_eq!(render(RenderField::Separator), "  ");
        assert_eq!(render(RenderField::FiberId), "0");
    }

    #[test]
    fn test_datetime_formats() {
        let default = RenderField::resolve("d", None).unwrap();
        assert_eq!(render(default), "2024-03-09 08:05:01");

        let custom = RenderField::resolve("d", Some("%H:%M")).unwrap();
        assert_eq!(render(custom), "08:05");

        assert_eq!(RenderField::resolve("d", Some("")), RenderField::resolve("d", None));
        assert!(RenderField::resolve("d", Some("%Q")).is_none());
    }
}
