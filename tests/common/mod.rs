//! Shared test utilities.

#![allow(dead_code)]

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Create a temporary ini file with the given content.
pub fn temp_ini(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("settings.ini");
    fs::write(&path, content).expect("Failed to write ini file");
    (temp_dir, path)
}

/// Path to an ini file that does not exist yet.
pub fn missing_ini() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("settings.ini");
    (temp_dir, path)
}

/// Append text to a file the way another process would.
pub fn append_out_of_band(path: &Path, text: &str) {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .expect("Failed to open ini file for append");
    file.write_all(text.as_bytes())
        .expect("Failed to append to ini file");
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("Failed to read ini file")
}
