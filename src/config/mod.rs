//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Registry::lookup_or_create("system.port", 8080, ..)
//!     → ConfigVar<i32> with its default value
//!
//! Load (explicit, caller-invoked):
//!     config file (YAML/TOML)
//!     → document::Node tree
//!     → flatten.rs (dotted paths, ancestors first)
//!     → loader.rs (lookup_base per path)
//!     → ConfigEntry::load_text → Codec::decode → ConfigVar::set_value
//!     → listeners see (old, new) if the value changed
//! ```
//!
//! # Design Decisions
//! - The registry is the authority on keys; unknown document keys are ignored
//! - Names are lowercase `[a-z0-9._]+`; creation with a bad name is an error
//! - One name has one type for the life of the process

pub mod codec;
pub mod dump;
pub mod entry;
pub mod error;
pub mod flatten;
pub mod loader;
pub mod registry;
pub mod validation;

pub use codec::Codec;
pub use entry::{ConfigEntry, ConfigValue, ConfigVar, Listener};
pub use error::{CodecError, ConfigError};
pub use flatten::{flatten, FlatEntry};
pub use loader::{load_from_document, load_from_path, LoadReport};
pub use registry::Registry;
