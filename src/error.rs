use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a store operation.
///
/// Missing files, missing keys and empty values are not errors: they resolve
/// to the caller's default. Everything here is an I/O failure the caller has
/// to deal with.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read ini file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create ini file '{path}': {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write ini file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read metadata of '{path}': {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to resolve path '{path}': {source}")]
    ResolvePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write dump output: {0}")]
    Output(#[source] std::io::Error),
}
