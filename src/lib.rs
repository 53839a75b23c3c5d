//! # filebox
//!
//! Structured file I/O for pipelines that keep their configuration, metrics
//! and intermediate artifacts on the local filesystem.
//!
//! ## Core Concepts
//!
//! - **ConfigTree**: a parsed YAML or JSON document with key and dotted-path access
//! - **Opaque records**: any serde value saved in a versioned, checksummed binary envelope
//! - **Event sink**: where the store reports each successful operation
//!
//! ## Example
//!
//! ```ignore
//! use filebox::StructuredFileStore;
//!
//! let store = StructuredFileStore::new();
//! let config = store.load_yaml("config/config.yaml")?;
//! store.ensure_directories([config.get_str("artifacts_root").unwrap()], true)?;
//! store.save_json("scores.json", &serde_json::json!({"loss": 0.12}))?;
//! ```

pub mod codec;
pub mod logging;
pub mod model;
pub mod store;

mod error;

pub use error::{Error, Result};
pub use logging::{EventSink, LogConfig, LogSink, MemorySink};
pub use model::{Checksum, ConfigTree, JsonValue, SizeReport};
pub use store::{OpaqueHeader, StoreOptions, StructuredFileStore};

/// Opaque record format version
pub const VERSION: u32 = 1;

/// Magic bytes opening every opaque record file
pub const MAGIC: &[u8; 8] = b"FILEBOX\x01";
