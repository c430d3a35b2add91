use serde::Serialize;
use serde_json::{Map, Value};

use super::error::DocumentError;

/// A discovery document: string keys mapped to arbitrary JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DiscoveryDocument(Map<String, Value>);

impl DiscoveryDocument {
    /// # Errors
    /// Returns `DocumentError::NotAnObject` unless `value` is a JSON object
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DocumentError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    /// Shallow overlay: every top-level key of `other` replaces ours.
    pub fn overlay(&mut self, other: DiscoveryDocument) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for DiscoveryDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> DiscoveryDocument {
        DiscoveryDocument::from_value(value).unwrap()
    }

    #[test]
    fn overlay_adds_disjoint_keys() {
        let mut base = doc(json!({"a": 1}));
        base.overlay(doc(json!({"b": 2})));
        assert_eq!(base.into_value(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn overlay_replaces_colliding_keys_without_deep_merge() {
        let mut base = doc(json!({
            "oada-configuration": {"services": ["bookmarks"], "version": 1},
            "keep": true
        }));
        base.overlay(doc(json!({"oada-configuration": {"services": ["jobs"]}})));

        assert_eq!(
            base.into_value(),
            json!({"oada-configuration": {"services": ["jobs"]}, "keep": true})
        );
    }

    #[test]
    fn overlay_with_empty_document_is_identity() {
        let mut base = doc(json!({"a": 1}));
        base.overlay(DiscoveryDocument::default());
        assert_eq!(base, doc(json!({"a": 1})));
    }

    #[test]
    fn non_objects_are_rejected() {
        assert_eq!(
            DiscoveryDocument::from_value(json!([1, 2])),
            Err(DocumentError::NotAnObject { found: "an array" })
        );
        assert_eq!(
            DiscoveryDocument::from_value(Value::Null),
            Err(DocumentError::NotAnObject { found: "null" })
        );
        assert!(DiscoveryDocument::from_value(json!("text")).is_err());
    }

    #[test]
    fn serializes_as_plain_object() {
        let body = serde_json::to_string(&doc(json!({"a": 1}))).unwrap();
        assert_eq!(body, r#"{"a":1}"#);
    }
}
