//! Configuration name validation.
//!
//! # Responsibilities
//! - Enforce the name grammar `[a-z0-9._]+`
//! - Normalize names to lowercase before checking
//!
//! # Design Decisions
//! - Shared by the registry (hard failure) and the flattener (skip + diagnostic)
//! - Pure functions, no allocation on the check path

use crate::config::ConfigError;

/// True when `name` only uses lowercase letters, digits, `.` and `_`.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'.' || b == b'_')
}

/// Lowercase `name` and check it against the grammar.
pub fn normalize_name(name: &str) -> Result<String, ConfigError> {
    let lowered = name.to_ascii_lowercase();
    if is_valid_name(&lowered) {
        Ok(lowered)
    } else {
        Err(ConfigError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("system.port"));
        assert!(is_valid_name("a_b.c9"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("System.port"));
        assert!(!is_valid_name("bad name!"));
        assert!(!is_valid_name("a-b"));
    }

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize_name("System.Port").unwrap(), "system.port");
        assert!(matches!(normalize_name("Bad Name!"), Err(ConfigError::InvalidName(n)) if n == "Bad Name!"));
    }
}
