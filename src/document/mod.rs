//! Configuration document model.
//!
//! # Data Flow
//! ```text
//! config text (YAML / TOML)
//!     → Node::parse / Node::parse_toml
//!     → Node tree (Scalar | Sequence | Mapping)
//!     → config::flatten (dotted paths) → registry entries
//!
//! Codecs:
//!     value → text → Node::parse → child node
//!     child node → Node::to_text → element codec
//! ```
//!
//! # Design Decisions
//! - Scalars are untyped text; typing happens in the codec layer
//! - Mapping keys keep document order
//! - A scalar's text is passed through untouched; only containers are serialized

pub mod error;
pub mod node;

pub use error::DocumentError;
pub use node::{Node, NodeKind};
