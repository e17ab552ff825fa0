//! Document parsing errors.

use thiserror::Error;

/// Errors raised while reading or writing a configuration document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// YAML text could not be parsed or emitted.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// TOML text could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The document file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
