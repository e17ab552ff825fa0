//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Write `content` to `dir/name` and return the path.
pub fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Lines of a log file, without their terminators.
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// True for `YYYY-MM-DD HH:MM:SS`.
pub fn is_timestamp(text: &str) -> bool {
    chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").is_ok()
}

/// YAML for a `logs` entry with one emitter writing to `file`.
pub fn file_logger_yaml(name: &str, level: &str, pattern: &str, file: &Path) -> String {
    format!(
        "logs:\n  - name: {name}\n    level: {level}\n    formatter: \"{pattern}\"\n    appenders:\n      - type: file\n        file: {}\n",
        file.display()
    )
}
