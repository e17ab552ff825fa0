//! Emitter and destination definitions.
//!
//! These are plain values compared structurally. The reconciliation
//! listener diffs two sets of them to decide which emitters to rebuild.
//!
//! # Document shape
//! ```text
//! logs:
//!   - name: system
//!     level: info
//!     formatter: "%d%T%m%n"
//!     appenders:
//!       - type: file
//!         file: /var/log/system.log
//!         level: error
//!       - type: console
//! ```
//!
//! # Design Decisions
//! - A definition without `name` fails to decode
//! - A malformed destination is skipped with a warning; the rest of the
//!   emitter still applies
//! - Severity names are parsed leniently; anything unrecognized is `Unknown`

use std::fmt;
use std::path::PathBuf;

use crate::config::{Codec, CodecError};
use crate::document::Node;
use crate::logging::Severity;

/// Kind of output destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AppenderKind {
    File,
    Console,
}

impl AppenderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AppenderKind::File => "file",
            AppenderKind::Console => "console",
        }
    }

    /// Accepts the short names as well as the long `*LogAppender` spellings.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "file" | "FileLogAppender" => Some(AppenderKind::File),
            "console" | "stdout" | "StdoutLogAppender" => Some(AppenderKind::Console),
            _ => None,
        }
    }
}

impl fmt::Display for AppenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One destination of an emitter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AppenderDefine {
    pub kind: AppenderKind,
    pub level: Severity,
    /// Explicit pattern; `None` inherits the emitter's.
    pub formatter: Option<String>,
    /// Required for `AppenderKind::File`.
    pub file: Option<PathBuf>,
}

impl AppenderDefine {
    pub fn console() -> Self {
        Self {
            kind: AppenderKind::Console,
            level: Severity::Unknown,
            formatter: None,
            file: None,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: AppenderKind::File,
            level: Severity::Unknown,
            formatter: None,
            file: Some(path.into()),
        }
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    pub fn with_formatter(mut self, pattern: impl Into<String>) -> Self {
        self.formatter = Some(pattern.into());
        self
    }

    fn from_node(node: &Node) -> Option<Self> {
        let Some(kind_text) = scalar_field(node, "type") else {
            tracing::warn!(appender = %node, "Log appender has no type, skipping");
            return None;
        };
        let Some(kind) = AppenderKind::parse(kind_text) else {
            tracing::warn!(appender = %node, kind = kind_text, "Unknown log appender type, skipping");
            return None;
        };

        let file = scalar_field(node, "file").map(PathBuf::from);
        if kind == AppenderKind::File && file.is_none() {
            tracing::warn!(appender = %node, "File appender has no file, skipping");
            return None;
        }

        Some(Self {
            kind,
            level: scalar_field(node, "level").map(Severity::parse).unwrap_or_default(),
            formatter: scalar_field(node, "formatter").map(str::to_string),
            file: file.filter(|_| kind == AppenderKind::File),
        })
    }

    fn to_node(&self) -> Node {
        let mut pairs = vec![("type".to_string(), Node::scalar(self.kind.as_str()))];
        if let Some(file) = &self.file {
            pairs.push(("file".to_string(), Node::scalar(file.to_string_lossy())));
        }
        if self.level != Severity::Unknown {
            pairs.push(("level".to_string(), Node::scalar(self.level.as_str())));
        }
        if let Some(formatter) = &self.formatter {
            pairs.push(("formatter".to_string(), Node::scalar(formatter.as_str())));
        }
        Node::Mapping(pairs)
    }
}

/// A named emitter with its level, default pattern and destinations.
///
/// Ordering compares `name` first, so sets of definitions iterate by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogDefine {
    pub name: String,
    pub level: Severity,
    pub formatter: Option<String>,
    pub appenders: Vec<AppenderDefine>,
}

impl LogDefine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Severity::Unknown,
            formatter: None,
            appenders: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    pub fn with_formatter(mut self, pattern: impl Into<String>) -> Self {
        self.formatter = Some(pattern.into());
        self
    }

    pub fn with_appender(mut self, appender: AppenderDefine) -> Self {
        self.appenders.push(appender);
        self
    }

    pub fn from_node(node: &Node) -> Result<Self, CodecError> {
        let name = scalar_field(node, "name")
            .filter(|name| !name.is_empty())
            .ok_or_else(|| CodecError::decode::<LogDefine>(&node.to_string(), "name is missing"))?;

        let appenders = match node.get("appenders") {
            Some(Node::Sequence(items)) => items.iter().filter_map(AppenderDefine::from_node).collect(),
            Some(other) if !other.is_empty() => {
                tracing::warn!(logger = name, "Log appenders must be a sequence, ignoring");
                Vec::new()
            }
            _ => Vec::new(),
        };

        Ok(Self {
            name: name.to_string(),
            level: scalar_field(node, "level").map(Severity::parse).unwrap_or_default(),
            formatter: scalar_field(node, "formatter").map(str::to_string),
            appenders,
        })
    }

    pub fn to_node(&self) -> Node {
        let mut pairs = vec![("name".to_string(), Node::scalar(self.name.as_str()))];
        if self.level != Severity::Unknown {
            pairs.push(("level".to_string(), Node::scalar(self.level.as_str())));
        }
        if let Some(formatter) = &self.formatter {
            pairs.push(("formatter".to_string(), Node::scalar(formatter.as_str())));
        }
        if !self.appenders.is_empty() {
            let appenders = self.appenders.iter().map(AppenderDefine::to_node).collect();
            pairs.push(("appenders".to_string(), Node::Sequence(appenders)));
        }
        Node::Mapping(pairs)
    }
}

impl Codec for LogDefine {
    fn decode(text: &str) -> Result<Self, CodecError> {
        let node = Node::parse(text)?;
        if !matches!(node, Node::Mapping(_)) {
            return Err(CodecError::decode::<LogDefine>(text, "expected a mapping"));
        }
        LogDefine::from_node(&node)
    }

    fn encode(&self) -> Result<String, CodecError> {
        Ok(self.to_node().to_text()?)
    }
}

fn scalar_field<'a>(node: &'a Node, key: &str) -> Option<&'a str> {
    node.get(key).and_then(Node::as_scalar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    const LOGS: &str = r#"
- name: root
  level: info
  formatter: "%d%T%m%n"
  appenders:
    - type: file
      file: /tmp/root.txt
    - type: StdoutLogAppender
- name: system
  level: error
  appenders:
    - type: console
      level: warn
      formatter: "%p %m%n"
"#;

    #[test]
    fn test_decode_set() {
        let defs = BTreeSet::<LogDefine>::decode(LOGS).unwrap();
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["root", "system"]);

        let root = defs.iter().next().unwrap();
        assert_eq!(root.level, Severity::Info);
        assert_eq!(root.formatter.as_deref(), Some("%d%T%m%n"));
        assert_eq!(
            root.appenders,
            vec![AppenderDefine::file("/tmp/root.txt"), AppenderDefine::console()]
        );

        let system = defs.iter().nth(1).unwrap();
        assert_eq!(
            system.appenders,
            vec![AppenderDefine::console().with_level(Severity::Warn).with_formatter("%p %m%n")]
        );
    }

    #[test]
    fn test_round_trip() {
        let def = LogDefine::new("system")
            .with_level(Severity::Error)
            .with_formatter("%d%T[%p]%T%m%n")
            .with_appender(AppenderDefine::file("/var/log/sys.log").with_level(Severity::Warn))
            .with_appender(AppenderDefine::console());
        let set = BTreeSet::from([def, LogDefine::new("a")]);

        let text = set.encode().unwrap();
        assert_eq!(BTreeSet::<LogDefine>::decode(&text).unwrap(), set);
    }

    #[test]
    fn test_bad_appenders_are_skipped() {
        let def = LogDefine::decode(
            "name: x\nappenders:\n  - type: file\n  - level: info\n  - type: syslog\n  - type: console\n",
        )
        .unwrap();
        assert_eq!(def.appenders, vec![AppenderDefine::console()]);
    }

    #[test]
    fn test_missing_name_fails() {
        assert!(LogDefine::decode("level: info").is_err());
        assert!(BTreeSet::<LogDefine>::decode("- name: ok\n- level: info\n").is_err());
    }

    #[test]
    fn test_equality_is_structural() {
        let a = LogDefine::new("sys").with_appender(AppenderDefine::console());
        let b = LogDefine::new("sys").with_appender(AppenderDefine::console().with_level(Severity::Info));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
