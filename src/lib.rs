//! Live, type-checked configuration registry with a configuration-driven
//! logging pipeline.

pub mod config;
pub mod document;
pub mod lifecycle;
pub mod logging;
pub mod runtime;

pub use config::{Codec, ConfigVar, Registry};
pub use document::Node;
pub use lifecycle::Shutdown;
pub use logging::{Logger, LoggerManager, Severity};
