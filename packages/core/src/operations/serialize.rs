//! Snapshot serialization for `save`
//!
//! Two textual renderings of a form snapshot:
//!
//! - `Json` - compact JSON of the nested value
//! - `KeyValue` - one `path=value` line per leaf, paths dotted like form paths

use crate::error::FormError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveFormat {
    #[default]
    Json,
    KeyValue,
}

pub fn serialize_snapshot(snapshot: &Value, format: SaveFormat) -> Result<String, FormError> {
    match format {
        SaveFormat::Json => Ok(serde_json::to_string(snapshot)?),
        SaveFormat::KeyValue => {
            let mut lines = Vec::new();
            flatten_key_values("", snapshot, &mut lines);
            Ok(lines.join("\n"))
        }
    }
}

fn flatten_key_values(prefix: &str, value: &Value, out: &mut Vec<String>) {
    let join = |segment: &str| {
        if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", prefix, segment)
        }
    };

    match value {
        Value::Object(entries) if !entries.is_empty() => {
            for (name, child) in entries {
                flatten_key_values(&join(name), child, out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten_key_values(&join(&index.to_string()), child, out);
            }
        }
        Value::Object(_) => out.push(format!("{}={{}}", prefix)),
        Value::Array(_) => out.push(format!("{}=[]", prefix)),
        Value::Null => out.push(format!("{}=", prefix)),
        Value::String(s) => out.push(format!("{}={}", prefix, s.replace('\n', "\\n"))),
        other => out.push(format!("{}={}", prefix, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> Value {
        json!({
            "firstName": "John",
            "emailGroup": { "email": "jonny@mail.ru" },
            "sendCatalog": true,
            "rating": null,
            "addresses": [{ "addressType": "home", "city": "" }],
            "tags": []
        })
    }

    #[test]
    fn test_json_format_keeps_field_order() {
        let text = serialize_snapshot(&snapshot(), SaveFormat::Json).unwrap();
        assert!(text.starts_with(r#"{"firstName":"John","emailGroup":{"email":"jonny@mail.ru"}"#));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, snapshot());
    }

    #[test]
    fn test_key_value_format() {
        let text = serialize_snapshot(&snapshot(), SaveFormat::KeyValue).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "firstName=John",
                "emailGroup.email=jonny@mail.ru",
                "sendCatalog=true",
                "rating=",
                "addresses.0.addressType=home",
                "addresses.0.city=",
                "tags=[]",
            ]
        );
    }

    #[test]
    fn test_key_value_escapes_newlines() {
        let text = serialize_snapshot(&json!({ "note": "a\nb" }), SaveFormat::KeyValue).unwrap();
        assert_eq!(text, "note=a\\nb");
    }
}
