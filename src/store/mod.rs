//! Structured file store
//!
//! Loads and saves YAML/JSON documents and opaque serde records on the local
//! filesystem. Every call opens, uses and closes its own file handle; nothing
//! is cached between calls.

mod file_store;
mod opaque;
mod yaml;

pub use file_store::StructuredFileStore;
pub use opaque::{OpaqueHeader, HEADER_SIZE};

use crate::{Error, Result};
use std::path::Path;

/// Tunables for a [`StructuredFileStore`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreOptions {
    /// Spaces per indentation level in saved JSON
    pub json_indent: usize,
    /// zstd-compress opaque record payloads
    pub compress_opaque: bool,
    /// zstd level used when `compress_opaque` is set
    pub compression_level: i32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            json_indent: 4,
            compress_opaque: false,
            compression_level: 3,
        }
    }
}

impl StoreOptions {
    pub fn with_json_indent(mut self, spaces: usize) -> Self {
        self.json_indent = spaces;
        self
    }

    pub fn with_compression(mut self, level: i32) -> Self {
        self.compress_opaque = true;
        self.compression_level = level;
        self
    }
}

/// Reject an empty path before any I/O happens
pub(crate) fn require_path<'a>(operation: &str, path: &'a Path) -> Result<&'a Path> {
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidArgument(format!(
            "{}: path must not be empty",
            operation
        )));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = StoreOptions::default();
        assert_eq!(options.json_indent, 4);
        assert!(!options.compress_opaque);

        let options = options.with_compression(9).with_json_indent(2);
        assert!(options.compress_opaque);
        assert_eq!(options.compression_level, 9);
        assert_eq!(options.json_indent, 2);
    }

    #[test]
    fn test_require_path() {
        assert!(require_path("load_json", Path::new("params.json")).is_ok());

        let err = require_path("load_json", Path::new("")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: load_json: path must not be empty"
        );
    }
}
