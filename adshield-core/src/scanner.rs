//! Ad-signal scanner
//!
//! Walks a response body and reports every field whose name looks
//! advertising-related, together with where it sits and what it holds.
//! The scanner only reads; it never changes the response.

use crate::keywords::KeywordSet;
use crate::walker::walk_collect;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Runtime type tag of a JSON value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One suspicious field occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Dotted location of the field, e.g. `data.result.adList`
    pub path: String,
    #[serde(rename = "type")]
    pub value_type: ValueKind,
    pub is_array: bool,
    /// False only when the field is present but `null`
    pub has_value: bool,
}

impl FieldDescriptor {
    fn describe(path: &str, value: &Value) -> Self {
        Self {
            path: path.to_string(),
            value_type: ValueKind::of(value),
            is_array: value.is_array(),
            has_value: !value.is_null(),
        }
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.path, self.value_type)?;
        if self.is_array {
            f.write_str("[]")?;
        }
        f.write_str(")")
    }
}

/// Scan a raw body. Bodies that are not JSON yield no descriptors.
pub fn scan(body: &str, keywords: &KeywordSet) -> Vec<FieldDescriptor> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => scan_value(&value, keywords),
        Err(e) => {
            debug!(error = %e, body_len = body.len(), "Body is not JSON, skipping ad field scan");
            Vec::new()
        }
    }
}

/// Scan an already decoded tree
pub fn scan_value(value: &Value, keywords: &KeywordSet) -> Vec<FieldDescriptor> {
    walk_collect(value, |key, path, child| {
        keywords
            .matches(key)
            .then(|| FieldDescriptor::describe(path, child))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ad_only() -> KeywordSet {
        KeywordSet::new(["ad"])
    }

    #[test]
    fn test_scan_nested_object_field() {
        let fields = scan(r#"{"data":{"splashAd":{"id":1}}}"#, &ad_only());

        assert_eq!(
            fields,
            vec![FieldDescriptor {
                path: "data.splashAd".to_string(),
                value_type: ValueKind::Object,
                is_array: false,
                has_value: true,
            }]
        );
    }

    #[test]
    fn test_scan_malformed_body_is_empty() {
        assert!(scan("{\"data\": [", &ad_only()).is_empty());
        assert!(scan("", &ad_only()).is_empty());
        assert!(scan("<html>ads</html>", &KeywordSet::default()).is_empty());
    }

    #[test]
    fn test_scan_reports_every_occurrence_in_traversal_order() {
        let value = json!({
            "ads": null,
            "data": {
                "adList": [{"adId": 7}],
                "title": "home",
                "result": {"ads": []}
            }
        });

        let paths: Vec<_> = scan_value(&value, &ad_only())
            .into_iter()
            .map(|f| f.path)
            .collect();

        assert_eq!(
            paths,
            vec!["ads", "data.adList", "data.adList.0.adId", "data.result.ads"]
        );
    }

    #[test]
    fn test_descriptor_types() {
        let value = json!({"ads": [], "adCount": 3, "adTitle": "x", "hasAd": false, "adNull": null});
        let fields = scan_value(&value, &ad_only());

        let kinds: Vec<_> = fields.iter().map(|f| f.value_type).collect();
        assert_eq!(
            kinds,
            vec![
                ValueKind::Array,
                ValueKind::Number,
                ValueKind::String,
                ValueKind::Boolean,
                ValueKind::Null
            ]
        );
        assert!(fields[0].is_array);
        assert!(!fields[4].has_value);
        assert!(fields[3].has_value);
    }

    #[test]
    fn test_descriptor_serialized_shape() {
        let descriptor = FieldDescriptor {
            path: "data.ads".to_string(),
            value_type: ValueKind::Array,
            is_array: true,
            has_value: true,
        };

        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            json!({"path": "data.ads", "type": "array", "isArray": true, "hasValue": true})
        );
        assert_eq!(descriptor.to_string(), "data.ads (array[])");
    }
}
