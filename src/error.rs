//! Error types for filebox

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for filebox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in filebox operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("IO error at {}: {source}", .path.display())]
    File { path: PathBuf, source: io::Error },

    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid YAML file: {}", .0.display())]
    InvalidFormat(PathBuf),

    #[error("Expected a mapping at the top of {}, found {found}", .path.display())]
    NotAMapping { path: PathBuf, found: String },

    #[error("YAML parse error in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Unsupported YAML value in {} at '{at}': {reason}", .path.display())]
    YamlValue {
        path: PathBuf,
        at: String,
        reason: String,
    },

    #[error("JSON parse error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Binary encoding error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Invalid record file: {0}")]
    InvalidFile(String),

    #[error("Corruption detected: {0}")]
    Corruption(String),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Logger error: {0}")]
    Logger(#[from] flexi_logger::FlexiLoggerError),
}

impl Error {
    /// Classify an I/O failure on `path` by its kind
    pub fn io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Error::PermissionDenied(path.to_path_buf()),
            _ => Error::File {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// True for a missing path
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
