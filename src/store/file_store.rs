//! The structured file store

use super::opaque::{self, OpaqueHeader};
use super::yaml;
use super::{require_path, StoreOptions};
use crate::logging::{EventSink, LogSink};
use crate::model::{kind_name, ConfigTree, JsonValue, SizeReport};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

/// Loads and saves structured documents and opaque records
///
/// Provides:
/// - YAML and JSON loading into a [`ConfigTree`]
/// - indented JSON saving
/// - versioned binary records for any serde type
/// - directory creation and file size reports
///
/// Each successful operation reports one event to the store's [`EventSink`].
pub struct StructuredFileStore {
    sink: Arc<dyn EventSink>,
    options: StoreOptions,
}

impl Default for StructuredFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuredFileStore {
    /// Create a store that reports through the `log` facade
    pub fn new() -> Self {
        StructuredFileStore {
            sink: Arc::new(LogSink),
            options: StoreOptions::default(),
        }
    }

    /// Set the event sink
    pub fn with_sink<S: EventSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    // === Structured documents ===

    /// Load a YAML document whose top level is a mapping
    ///
    /// An empty, comment-only or null document, or one whose top level is not
    /// a mapping, fails with [`Error::InvalidFormat`]. Merge keys are applied;
    /// `.nan` and `.inf` fail with [`Error::YamlValue`].
    pub fn load_yaml(&self, path: impl AsRef<Path>) -> Result<ConfigTree> {
        let path = require_path("load_yaml", path.as_ref())?;
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        if !has_yaml_content(&text) {
            return Err(Error::InvalidFormat(path.to_path_buf()));
        }

        let value = yaml::parse(&text)
            .map_err(|source| Error::Yaml {
                path: path.to_path_buf(),
                source,
            })?
            .map_err(|bad| Error::YamlValue {
                path: path.to_path_buf(),
                at: bad.at,
                reason: bad.reason.to_string(),
            })?;
        let tree =
            ConfigTree::try_from(value).map_err(|_| Error::InvalidFormat(path.to_path_buf()))?;

        self.sink
            .info(&format!("Successfully loaded YAML file: {}", path.display()));
        Ok(tree)
    }

    /// Load a strict JSON document whose top level is an object
    pub fn load_json(&self, path: impl AsRef<Path>) -> Result<ConfigTree> {
        let path = require_path("load_json", path.as_ref())?;
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let value: JsonValue = serde_json::from_str(&text).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let tree = ConfigTree::try_from(value).map_err(|other| Error::NotAMapping {
            path: path.to_path_buf(),
            found: kind_name(&other).to_string(),
        })?;

        self.sink
            .info(&format!("Successfully loaded JSON file: {}", path.display()));
        Ok(tree)
    }

    /// Save a mapping as indented JSON, overwriting `path`
    ///
    /// `data` must serialize to a JSON object without NaN or infinite floats.
    /// Serialization happens before the destination is opened, so a bad value
    /// never truncates the file.
    pub fn save_json<T: Serialize + ?Sized>(&self, path: impl AsRef<Path>, data: &T) -> Result<()> {
        let path = require_path("save_json", path.as_ref())?;
        // serde_json writes non-finite floats as null
        if let Some(at) = serde_yaml::to_value(data)
            .ok()
            .and_then(|v| yaml::find_non_finite(&v))
        {
            return Err(Error::Serialization(format!(
                "save_json: non-finite number at '{}'",
                at
            )));
        }
        let value = serde_json::to_value(data).map_err(|e| Error::Serialization(e.to_string()))?;
        if !value.is_object() {
            return Err(Error::InvalidArgument(format!(
                "save_json: expected a mapping, got a {}",
                kind_name(&value)
            )));
        }

        let indent = " ".repeat(self.options.json_indent);
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let mut writer = BufWriter::new(file);
        {
            let formatter = PrettyFormatter::with_indent(indent.as_bytes());
            let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
            value.serialize(&mut serializer).map_err(|e| {
                if e.is_io() {
                    Error::io(path, io::Error::from(e))
                } else {
                    Error::Serialization(e.to_string())
                }
            })?;
        }
        writer.flush().map_err(|e| Error::io(path, e))?;

        self.sink
            .info(&format!("Saved JSON data to: {}", path.display()));
        Ok(())
    }

    // === Opaque records ===

    /// Save any serde value as a versioned binary record
    pub fn save_opaque<T: Serialize + ?Sized>(
        &self,
        path: impl AsRef<Path>,
        record: &T,
    ) -> Result<()> {
        let path = require_path("save_opaque", path.as_ref())?;
        let bytes = opaque::encode_record(record, &self.options)?;
        fs::write(path, bytes).map_err(|e| Error::io(path, e))?;

        self.sink
            .info(&format!("Binary file saved to: {}", path.display()));
        Ok(())
    }

    /// Load a record written by [`save_opaque`](Self::save_opaque)
    pub fn load_opaque<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> Result<T> {
        let path = require_path("load_opaque", path.as_ref())?;
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        let record = opaque::decode_record(&bytes)?;

        self.sink
            .info(&format!("Binary file loaded from: {}", path.display()));
        Ok(record)
    }

    /// Inspect a record's header without decoding the payload
    pub fn read_opaque_header(&self, path: impl AsRef<Path>) -> Result<OpaqueHeader> {
        let path = require_path("read_opaque_header", path.as_ref())?;
        opaque::read_header(path)
    }

    // === Filesystem utilities ===

    /// Size of the file at `path`
    pub fn file_size(&self, path: impl AsRef<Path>) -> Result<SizeReport> {
        let path = require_path("file_size", path.as_ref())?;
        let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;
        let report = SizeReport::from_bytes(metadata.len());

        self.sink
            .info(&format!("Size of {}: {}", path.display(), report));
        Ok(report)
    }

    /// Size of the file at `path` formatted as `"<N> KB"`
    pub fn file_size_report(&self, path: impl AsRef<Path>) -> Result<String> {
        Ok(self.file_size(path)?.to_string())
    }

    /// Create each directory and its missing ancestors, in order
    ///
    /// Existing directories are fine. Every path is checked before the first
    /// one is created. With `verbose`, one event is reported per path whether
    /// or not it already existed.
    pub fn ensure_directories<I, P>(&self, paths: I, verbose: bool) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let paths: Vec<P> = paths.into_iter().collect();
        for path in &paths {
            require_path("ensure_directories", path.as_ref())?;
        }

        for path in &paths {
            let path = path.as_ref();
            fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
            if verbose {
                self.sink
                    .info(&format!("Created directory: {}", path.display()));
            }
        }
        Ok(())
    }
}

/// False when the text holds nothing but blank lines, comments and document markers
fn has_yaml_content(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .any(|line| !(line.is_empty() || line.starts_with('#') || line == "---" || line == "..."))
}
