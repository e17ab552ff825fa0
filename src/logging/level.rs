//! Log severities.

use std::fmt;
use std::str::FromStr;

use crate::config::{Codec, CodecError};

/// Ordered log severity. `Unknown` sorts lowest and lets everything through.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    Unknown = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Unknown => "UNKNOWN",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Lenient parse: all-lower or all-upper names, anything else is `Unknown`.
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "debug" | "DEBUG" => Severity::Debug,
            "info" | "INFO" => Severity::Info,
            "warn" | "WARN" => Severity::Warn,
            "error" | "ERROR" => Severity::Error,
            "fatal" | "FATAL" => Severity::Fatal,
            _ => Severity::Unknown,
        }
    }
}

impl From<u8> for Severity {
    fn from(val: u8) -> Self {
        match val {
            1 => Severity::Debug,
            2 => Severity::Info,
            3 => Severity::Warn,
            4 => Severity::Error,
            5 => Severity::Fatal,
            _ => Severity::Unknown,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Severity::parse(s))
    }
}

/// As a standalone configuration value a severity must be spelled correctly.
impl Codec for Severity {
    fn decode(text: &str) -> Result<Self, CodecError> {
        match Severity::parse(text) {
            Severity::Unknown if !text.trim().eq_ignore_ascii_case("unknown") => {
                Err(CodecError::decode::<Severity>(text, "unknown severity"))
            }
            level => Ok(level),
        }
    }

    fn encode(&self) -> Result<String, CodecError> {
        Ok(self.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Severity::Unknown < Severity::Debug);
        assert!(Severity::Info < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_parse_is_lenient() {
        assert_eq!(Severity::parse("error"), Severity::Error);
        assert_eq!(Severity::parse("WARN"), Severity::Warn);
        assert_eq!(Severity::parse("Warn"), Severity::Unknown);
        assert_eq!("bogus".parse::<Severity>(), Ok(Severity::Unknown));
    }

    #[test]
    fn test_codec_is_strict() {
        assert_eq!(Severity::decode("info").unwrap(), Severity::Info);
        assert_eq!(Severity::decode("UNKNOWN").unwrap(), Severity::Unknown);
        assert!(Severity::decode("loud").is_err());
        assert_eq!(Severity::Fatal.encode().unwrap(), "FATAL");
    }

    #[test]
    fn test_from_u8_round_trip() {
        for level in [Severity::Unknown, Severity::Debug, Severity::Fatal] {
            assert_eq!(Severity::from(level as u8), level);
        }
        assert_eq!(Severity::from(200), Severity::Unknown);
    }
}
