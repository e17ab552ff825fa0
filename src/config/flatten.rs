//! Document flattening.
//!
//! Walks a node tree depth-first and emits one `(dotted path, node)` pair per
//! visited node, ancestors before descendants:
//!
//! ```text
//! log:             ""            → root
//!   x: 1           "log"         → {x: 1}
//! system:          "log.x"       → 1
//!   port: 9900     "system"      → {port: 9900}
//!                  "system.port" → 9900
//! ```

use crate::config::validation::is_valid_name;
use crate::document::Node;

/// One flattened document position.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry<'a> {
    /// Dotted path as written in the document. Empty only for the root.
    pub path: String,
    pub node: &'a Node,
}

/// Flatten `root` into dotted-path entries.
///
/// Paths whose lowercase form breaks the name grammar are skipped together
/// with their subtree.
pub fn flatten(root: &Node) -> Vec<FlatEntry<'_>> {
    let mut output = Vec::new();
    walk(String::new(), root, &mut output);
    output
}

fn walk<'a>(path: String, node: &'a Node, output: &mut Vec<FlatEntry<'a>>) {
    if !path.is_empty() && !is_valid_name(&path.to_ascii_lowercase()) {
        tracing::error!(path = %path, "Invalid configuration path, skipping subtree");
        return;
    }

    if let Node::Mapping(pairs) = node {
        output.push(FlatEntry { path: path.clone(), node });
        for (key, child) in pairs {
            let child_path = if path.is_empty() {
                key.clone()
            } else {
                format!("{path}.{key}")
            };
            walk(child_path, child, output);
        }
    } else {
        output.push(FlatEntry { path, node });
    }
}
