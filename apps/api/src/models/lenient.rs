//! Tolerant field deserializers for hand-edited documents.
//!
//! `cv.json` is a plain file the user may edit outside the app, so scalar
//! fields accept `null`, numbers and booleans, and list fields accept `null`
//! or a single comma-separated string.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `null` becomes `""`; numbers and booleans keep their JSON spelling.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}

/// `null` becomes `[]`; a string is split on commas; `null` elements are dropped.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(values) => values
            .into_iter()
            .filter(|v| !v.is_null())
            .map(scalar_to_string)
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        other => vec![scalar_to_string(other)],
    })
}

/// `null` becomes `T::default()`.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Doc {
        #[serde(deserialize_with = "string")]
        text: String,
        #[serde(deserialize_with = "string_list")]
        tags: Vec<String>,
        #[serde(deserialize_with = "or_default")]
        items: Vec<u32>,
    }

    fn parse(value: serde_json::Value) -> Doc {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_scalars_become_strings() {
        assert_eq!(parse(json!({"text": null})).text, "");
        assert_eq!(parse(json!({"text": 40})).text, "40");
        assert_eq!(parse(json!({"text": 2.5})).text, "2.5");
        assert_eq!(parse(json!({"text": true})).text, "true");
        assert_eq!(parse(json!({"text": "as is "})).text, "as is ");
    }

    #[test]
    fn test_lists_tolerate_null_and_strings() {
        assert!(parse(json!({"tags": null})).tags.is_empty());
        assert_eq!(parse(json!({"tags": "rust, go,"})).tags, ["rust", "go"]);
        assert_eq!(parse(json!({"tags": ["a", null, 3]})).tags, ["a", "3"]);
        assert_eq!(parse(json!({"tags": 7})).tags, ["7"]);
    }

    #[test]
    fn test_null_collection_defaults() {
        assert!(parse(json!({"items": null})).items.is_empty());
        assert_eq!(parse(json!({"items": [1, 2]})).items, [1, 2]);
    }

    #[test]
    fn test_missing_fields_default() {
        let doc = parse(json!({}));
        assert!(doc.text.is_empty() && doc.tags.is_empty() && doc.items.is_empty());
    }
}
