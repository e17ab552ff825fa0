//! Registry snapshots for inspection.

use serde::Serialize;

use crate::config::{ConfigEntry, Registry};
use crate::document::Node;

/// One entry as shown by the dump.
#[derive(Debug, Clone, Serialize)]
pub struct EntryDump {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: serde_json::Value,
}

impl EntryDump {
    fn capture(entry: &dyn ConfigEntry) -> Self {
        let value = match entry.to_text() {
            Ok(text) => match Node::parse(&text) {
                Ok(node) if !node.is_scalar() => node_to_json(&node),
                _ => serde_json::Value::String(text),
            },
            Err(e) => serde_json::Value::String(format!("<{e}>")),
        };
        Self {
            name: entry.name().to_string(),
            description: entry.description().to_string(),
            type_name: entry.type_name().to_string(),
            value,
        }
    }
}

/// Every entry in name order.
pub fn snapshot(registry: &Registry) -> Vec<EntryDump> {
    let mut entries = Vec::with_capacity(registry.len());
    registry.visit(|entry| entries.push(EntryDump::capture(entry)));
    entries
}

/// Human-readable dump: one `name (type): description` header per entry
/// followed by its value.
pub fn to_text(registry: &Registry) -> String {
    let mut out = String::new();
    registry.visit(|entry| {
        let value = entry.to_text().unwrap_or_else(|e| format!("<{e}>"));
        out.push_str(&format!("{} ({}): {}\n", entry.name(), entry.type_name(), entry.description()));
        for line in value.lines() {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
    });
    out
}

/// JSON dump: an array of entries in name order.
pub fn to_json(registry: &Registry) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&snapshot(registry))
}

fn node_to_json(node: &Node) -> serde_json::Value {
    match node {
        Node::Scalar(s) => serde_json::Value::String(s.clone()),
        Node::Sequence(items) => serde_json::Value::Array(items.iter().map(node_to_json).collect()),
        Node::Mapping(pairs) => serde_json::Value::Object(
            pairs.iter().map(|(k, v)| (k.clone(), node_to_json(v))).collect(),
        ),
    }
}
