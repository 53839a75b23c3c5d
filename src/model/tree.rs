//! ConfigTree - a parsed YAML or JSON document
//!
//! A read-oriented ordered mapping from string keys to JSON-model values.
//! Fields can be reached by key (`tree["model"]`, [`ConfigTree::get`]) or by
//! dotted attribute path ([`ConfigTree::get_path`]), or pulled out into a
//! typed struct with [`ConfigTree::extract`].

use crate::{Error, Result};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Index;

pub type JsonValue = Value;

static NULL: Value = Value::Null;

/// Ordered key-value tree loaded from a structured document
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigTree {
    root: Map<String, Value>,
}

impl ConfigTree {
    /// Create an empty tree
    pub fn new() -> Self {
        ConfigTree { root: Map::new() }
    }

    /// Look up a top-level key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Look up a dotted path such as `training.params.epochs` or `layers.0.units`
    ///
    /// A literal top-level key containing dots wins over path traversal.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.root.get(path) {
            return Some(value);
        }

        let mut segments = path.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get_path(path)?.as_str()
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get_path(path)?.as_i64()
    }

    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.get_path(path)?.as_f64()
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get_path(path)?.as_bool()
    }

    /// Nested mapping at `path` as its own tree
    pub fn section(&self, path: &str) -> Option<ConfigTree> {
        self.get_path(path)?
            .as_object()
            .map(|map| ConfigTree { root: map.clone() })
    }

    /// Populate a typed struct from the tree's fields
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.root.clone()))
            .map_err(|e| Error::Serialization(format!("Failed to extract fields: {}", e)))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    /// Top-level keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.root.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

/// Short name of a value's JSON kind, for error messages
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

impl From<Map<String, Value>> for ConfigTree {
    fn from(root: Map<String, Value>) -> Self {
        ConfigTree { root }
    }
}

impl TryFrom<Value> for ConfigTree {
    /// The rejected value is handed back
    type Error = Value;

    fn try_from(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Object(root) => Ok(ConfigTree { root }),
            other => Err(other),
        }
    }
}

impl Index<&str> for ConfigTree {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.root.get(key).unwrap_or(&NULL)
    }
}

impl fmt::Display for ConfigTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string_pretty(&self.root).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

// Binary formats cannot drive `Value`'s self-describing deserializer, so
// non-human-readable formats carry the tree as embedded JSON text.
impl Serialize for ConfigTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            self.root.serialize(serializer)
        } else {
            let text = serde_json::to_string(&self.root).map_err(ser::Error::custom)?;
            serializer.serialize_str(&text)
        }
    }
}

impl<'de> Deserialize<'de> for ConfigTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            Map::deserialize(deserializer).map(ConfigTree::from)
        } else {
            let text = String::deserialize(deserializer)?;
            serde_json::from_str::<Map<String, Value>>(&text)
                .map(ConfigTree::from)
                .map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ConfigTree {
        ConfigTree::try_from(json!({
            "artifacts_root": "artifacts",
            "training": {
                "epochs": 10,
                "learning_rate": 0.01,
                "augmentation": true,
                "image_size": [224, 224, 3]
            },
            "layers": [{"units": 64}, {"units": 10}],
            "data.dir": "literal"
        }))
        .unwrap()
    }

    #[test]
    fn test_key_access() {
        let tree = sample();
        assert_eq!(tree["artifacts_root"], json!("artifacts"));
        assert_eq!(tree["missing"], Value::Null);
        assert!(tree.get("missing").is_none());
        assert!(tree.contains_key("training"));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_dotted_access() {
        let tree = sample();
        assert_eq!(tree.get_i64("training.epochs"), Some(10));
        assert_eq!(tree.get_f64("training.learning_rate"), Some(0.01));
        assert_eq!(tree.get_bool("training.augmentation"), Some(true));
        assert_eq!(tree.get_i64("training.image_size.2"), Some(3));
        assert_eq!(tree.get_i64("layers.1.units"), Some(10));
        assert_eq!(tree.get_str("data.dir"), Some("literal"));
        assert!(tree.get_path("training.epochs.deeper").is_none());
        assert!(tree.get_path("layers.two").is_none());
    }

    #[test]
    fn test_keys_keep_document_order() {
        let tree = sample();
        let keys: Vec<_> = tree.keys().collect();
        assert_eq!(keys, vec!["artifacts_root", "training", "layers", "data.dir"]);
    }

    #[test]
    fn test_section_and_extract() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Training {
            epochs: u32,
            learning_rate: f64,
            image_size: Vec<u32>,
        }

        let tree = sample();
        let training: Training = tree.section("training").unwrap().extract().unwrap();
        assert_eq!(
            training,
            Training {
                epochs: 10,
                learning_rate: 0.01,
                image_size: vec![224, 224, 3],
            }
        );

        assert!(tree.section("artifacts_root").is_none());
        let err = tree.extract::<Training>().unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_try_from_rejects_non_mapping() {
        let rejected = ConfigTree::try_from(json!([1, 2, 3])).unwrap_err();
        assert_eq!(kind_name(&rejected), "sequence");
        assert_eq!(kind_name(&Value::Null), "null");
    }

    #[test]
    fn test_binary_serialization() {
        let tree = sample();
        let bytes = bincode::serialize(&tree).unwrap();
        let restored: ConfigTree = bincode::deserialize(&bytes).unwrap();
        assert_eq!(tree, restored);
    }

    #[test]
    fn test_human_readable_serialization() {
        let tree = sample();
        let text = serde_json::to_string(&tree).unwrap();
        assert!(text.starts_with("{\"artifacts_root\""));
        let restored: ConfigTree = serde_json::from_str(&text).unwrap();
        assert_eq!(tree, restored);
    }
}
