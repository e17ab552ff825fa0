//! Document node tree.
//!
//! # Responsibilities
//! - Parse YAML and TOML text into a uniform tree
//! - Serialize any subtree back to text
//! - Expose kind introspection, keyed access and ordered iteration

use std::fmt;

use serde_yaml_ng::{Mapping, Number, Value};

use crate::document::DocumentError;

/// Kind of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
}

/// A parsed configuration document node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Raw scalar text. Nulls and empty documents are the empty scalar.
    Scalar(String),
    /// Ordered list of child nodes.
    Sequence(Vec<Node>),
    /// Ordered key/value pairs.
    Mapping(Vec<(String, Node)>),
}

impl Default for Node {
    fn default() -> Self {
        Node::Scalar(String::new())
    }
}

impl Node {
    /// Parse YAML text into a node tree.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        if text.trim().is_empty() {
            return Ok(Node::default());
        }
        let value: Value = serde_yaml_ng::from_str(text)?;
        Ok(Self::from_yaml(value))
    }

    /// Parse a TOML document. The root is always a mapping.
    pub fn parse_toml(text: &str) -> Result<Self, DocumentError> {
        let table: toml::Table = text.parse()?;
        Ok(Self::from_toml(toml::Value::Table(table)))
    }

    /// Build a scalar node.
    pub fn scalar(text: impl Into<String>) -> Self {
        Node::Scalar(text.into())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scalar(_) => NodeKind::Scalar,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::Mapping(_) => NodeKind::Mapping,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    /// Raw text of a scalar node.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a mapping child by key. The first matching key wins.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Number of children. Scalars have none.
    pub fn len(&self) -> usize {
        match self {
            Node::Scalar(_) => 0,
            Node::Sequence(items) => items.len(),
            Node::Mapping(pairs) => pairs.len(),
        }
    }

    /// True for empty containers and the empty scalar.
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Scalar(s) => s.is_empty(),
            _ => self.len() == 0,
        }
    }

    /// Text form of this subtree.
    ///
    /// Scalars yield their raw text. Containers are emitted as YAML with the
    /// trailing newline removed, so the result can be fed back to `parse`.
    pub fn to_text(&self) -> Result<String, DocumentError> {
        match self {
            Node::Scalar(s) => Ok(s.clone()),
            _ => {
                let text = serde_yaml_ng::to_string(&self.to_yaml())?;
                Ok(text.trim_end().to_string())
            }
        }
    }

    fn from_yaml(value: Value) -> Self {
        match value {
            Value::Null => Node::default(),
            Value::Bool(b) => Node::Scalar(b.to_string()),
            Value::Number(n) => Node::Scalar(n.to_string()),
            Value::String(s) => Node::Scalar(s),
            Value::Sequence(items) => Node::Sequence(items.into_iter().map(Self::from_yaml).collect()),
            Value::Mapping(map) => Node::Mapping(
                map.into_iter()
                    .map(|(k, v)| (Self::from_yaml(k).key_text(), Self::from_yaml(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Self::from_yaml(tagged.value),
        }
    }

    fn from_toml(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Node::Scalar(s),
            toml::Value::Integer(i) => Node::Scalar(i.to_string()),
            toml::Value::Float(f) => Node::Scalar(f.to_string()),
            toml::Value::Boolean(b) => Node::Scalar(b.to_string()),
            toml::Value::Datetime(dt) => Node::Scalar(dt.to_string()),
            toml::Value::Array(items) => Node::Sequence(items.into_iter().map(Self::from_toml).collect()),
            toml::Value::Table(table) => Node::Mapping(
                table.into_iter().map(|(k, v)| (k, Self::from_toml(v))).collect(),
            ),
        }
    }

    // Complex keys are rare; they collapse to their serialized form.
    fn key_text(self) -> String {
        match self {
            Node::Scalar(s) => s,
            other => other.to_text().unwrap_or_default(),
        }
    }

    fn to_yaml(&self) -> Value {
        match self {
            Node::Scalar(s) => scalar_to_yaml(s),
            Node::Sequence(items) => Value::Sequence(items.iter().map(Node::to_yaml).collect()),
            Node::Mapping(pairs) => {
                let mut map = Mapping::new();
                for (k, v) in pairs {
                    map.insert(Value::String(k.clone()), v.to_yaml());
                }
                Value::Mapping(map)
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Ok(text) => f.write_str(&text),
            Err(_) => Err(fmt::Error),
        }
    }
}

/// Emit plain numbers and booleans unquoted when their text survives a round trip.
fn scalar_to_yaml(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    if text == "true" || text == "false" {
        return Value::Bool(text == "true");
    }
    if let Ok(i) = text.parse::<i64>() {
        if i.to_string() == text {
            return Value::Number(Number::from(i));
        }
    }
    if let Ok(u) = text.parse::<u64>() {
        if u.to_string() == text {
            return Value::Number(Number::from(u));
        }
    }
    if let Ok(f) = text.parse::<f64>() {
        let n = Number::from(f);
        if f.is_finite() && n.to_string() == text {
            return Value::Number(n);
        }
    }
    Value::String(text.to_string())
}
