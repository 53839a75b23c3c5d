//! YAML documents as JSON values
//!
//! Documents are parsed into `serde_yaml::Value` first so merge keys (`<<`)
//! resolve and non-finite floats are caught instead of becoming `null`.

use crate::model::JsonValue;
use serde_json::{Map, Number};
use serde_yaml::Value as YamlValue;

/// Why a parsed YAML value has no JSON form
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Unrepresentable {
    /// Dotted location of the offending value (empty at the top level)
    pub at: String,
    pub reason: &'static str,
}

/// Parse `text`, apply merge keys, and convert the result
pub(crate) fn parse(text: &str) -> Result<Result<JsonValue, Unrepresentable>, serde_yaml::Error> {
    let mut value: YamlValue = serde_yaml::from_str(text)?;
    value.apply_merge()?;
    Ok(to_json(value, String::new()))
}

fn to_json(value: YamlValue, at: String) -> Result<JsonValue, Unrepresentable> {
    match value {
        YamlValue::Null => Ok(JsonValue::Null),
        YamlValue::Bool(b) => Ok(JsonValue::Bool(b)),
        YamlValue::String(s) => Ok(JsonValue::String(s)),
        YamlValue::Number(n) => number(&n).ok_or(Unrepresentable {
            at,
            reason: "non-finite number",
        }),
        YamlValue::Sequence(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| to_json(item, join(&at, &i.to_string())))
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        YamlValue::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, item) in mapping {
                let key = match key_string(key) {
                    Some(key) => key,
                    None => {
                        return Err(Unrepresentable {
                            at,
                            reason: "non-scalar mapping key",
                        })
                    }
                };
                let item = to_json(item, join(&at, &key))?;
                map.insert(key, item);
            }
            Ok(JsonValue::Object(map))
        }
        YamlValue::Tagged(tagged) => to_json(tagged.value, at),
    }
}

fn number(n: &serde_yaml::Number) -> Option<JsonValue> {
    if let Some(i) = n.as_i64() {
        Some(JsonValue::from(i))
    } else if let Some(u) = n.as_u64() {
        Some(JsonValue::from(u))
    } else {
        n.as_f64().and_then(Number::from_f64).map(JsonValue::Number)
    }
}

/// Scalar keys become strings, the way a JSON round trip would spell them
fn key_string(key: YamlValue) -> Option<String> {
    match key {
        YamlValue::String(s) => Some(s),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Null => Some("null".to_string()),
        YamlValue::Number(n) => number(&n).map(|v| v.to_string()),
        YamlValue::Tagged(tagged) => key_string(tagged.value),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => None,
    }
}

fn join(at: &str, segment: &str) -> String {
    if at.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", at, segment)
    }
}

/// Location of the first non-finite float in a YAML rendering of `value`
pub(crate) fn find_non_finite(value: &YamlValue) -> Option<String> {
    fn walk(value: &YamlValue, at: String) -> Option<String> {
        match value {
            YamlValue::Number(n) if n.is_nan() || n.is_infinite() => Some(at),
            YamlValue::Sequence(items) => items
                .iter()
                .enumerate()
                .find_map(|(i, item)| walk(item, join(&at, &i.to_string()))),
            YamlValue::Mapping(mapping) => mapping.iter().find_map(|(key, item)| {
                let key = key_string(key.clone()).unwrap_or_else(|| "?".to_string());
                walk(item, join(&at, &key))
            }),
            YamlValue::Tagged(tagged) => walk(&tagged.value, at),
            _ => None,
        }
    }
    walk(value, String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_keys_resolve() {
        let text = "base: &base\n  lr: 0.1\n  epochs: 1\ntrain:\n  <<: *base\n  epochs: 2\n";
        let value = parse(text).unwrap().unwrap();
        assert_eq!(value["train"], json!({"lr": 0.1, "epochs": 2}));
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        let err = parse("model:\n  threshold: .nan\n").unwrap().unwrap_err();
        assert_eq!(err.at, "model.threshold");

        let err = parse("limits: [1, -.inf]\n").unwrap().unwrap_err();
        assert_eq!(err.at, "limits.1");
    }

    #[test]
    fn test_scalar_keys_become_strings() {
        let value = parse("1: one\ntrue: yes\n").unwrap().unwrap();
        assert_eq!(value, json!({"1": "one", "true": "yes"}));
    }

    #[test]
    fn test_complex_key_rejected() {
        let err = parse("? [a, b]\n: pair\n").unwrap().unwrap_err();
        assert_eq!(err.reason, "non-scalar mapping key");
    }

    #[test]
    fn test_find_non_finite() {
        let value: YamlValue = serde_yaml::to_value(json!({"ok": 1.5})).unwrap();
        assert_eq!(find_non_finite(&value), None);

        let scores: std::collections::BTreeMap<&str, f64> = [("loss", f64::NAN)].into_iter().collect();
        let value = serde_yaml::to_value(scores).unwrap();
        assert_eq!(find_non_finite(&value), Some("loss".to_string()));
    }
}
