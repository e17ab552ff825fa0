//! Configuration error types.

use thiserror::Error;

use crate::document::DocumentError;

/// Errors raised by the registry and the loader.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Name contains characters outside `[a-z0-9._]`.
    #[error("invalid configuration name: {0:?}")]
    InvalidName(String),

    /// Name already registered under a different value type.
    #[error("configuration {name:?} holds {actual}, requested as {requested}")]
    TypeMismatch {
        name: String,
        requested: &'static str,
        actual: &'static str,
    },

    /// Value text could not be converted.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Document could not be parsed.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Errors raised while converting between values and text.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Text cannot be parsed into the target type.
    #[error("cannot convert {input:?} to {target}: {reason}")]
    Decode {
        input: String,
        target: &'static str,
        reason: String,
    },

    /// Value cannot be rendered as text.
    #[error("cannot convert {value_type} to text: {reason}")]
    Encode {
        value_type: &'static str,
        reason: String,
    },

    /// Container text is not a valid document.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl CodecError {
    pub(crate) fn decode<T>(input: &str, reason: impl ToString) -> Self {
        CodecError::Decode {
            input: input.to_string(),
            target: std::any::type_name::<T>(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn encode<T>(reason: impl ToString) -> Self {
        CodecError::Encode {
            value_type: std::any::type_name::<T>(),
            reason: reason.to_string(),
        }
    }
}
