//! Stored representation of cached results

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainError;

/// Envelope written to every cache tier.
///
/// Falsy results (`null`, `false`, zero, `""`) are stored as [`CachedValue::Empty`],
/// so a hit on such a key cannot tell which falsy value was computed. A tier
/// miss is `None` at the call site and never collides with `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum CachedValue {
    Present(Value),
    Empty,
}

impl CachedValue {
    /// Normalizes a computed result before storage
    pub fn normalize(value: &Value) -> Self {
        if is_falsy(value) {
            Self::Empty
        } else {
            Self::Present(value.clone())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Present(value) => Some(value),
            Self::Empty => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Present(value) => Some(value),
            Self::Empty => None,
        }
    }

    /// Deserializes the payload; `Empty` maps to `None`
    pub fn decode<V: DeserializeOwned>(self) -> Result<Option<V>, DomainError> {
        self.into_value()
            .map(|value| {
                serde_json::from_value(value).map_err(|e| {
                    DomainError::serialization(format!("Failed to decode cached value: {}", e))
                })
            })
            .transpose()
    }
}

/// Empty arrays and objects are not falsy
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsy_values_collapse_to_empty() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!(-0.0), json!("")] {
            assert_eq!(CachedValue::normalize(&value), CachedValue::Empty, "{}", value);
        }
    }

    #[test]
    fn test_truthy_values_are_kept() {
        for value in [json!(true), json!(1), json!(-3.5), json!("x"), json!([]), json!({})] {
            assert_eq!(
                CachedValue::normalize(&value),
                CachedValue::Present(value.clone()),
                "{}",
                value
            );
        }
    }

    #[test]
    fn test_empty_serializes_distinctly_from_null() {
        let empty = serde_json::to_string(&CachedValue::Empty).unwrap();
        let null = serde_json::to_string(&CachedValue::Present(json!(null))).unwrap();

        assert_eq!(empty, r#"{"state":"empty"}"#);
        assert_ne!(empty, null);
    }

    #[test]
    fn test_decode() {
        let value = CachedValue::Present(json!({"name": "Ada"}));

        #[derive(Debug, PartialEq, Deserialize)]
        struct Profile {
            name: String,
        }

        let profile: Option<Profile> = value.decode().unwrap();
        assert_eq!(
            profile,
            Some(Profile {
                name: "Ada".to_string()
            })
        );

        let empty: Option<Profile> = CachedValue::Empty.decode().unwrap();
        assert!(empty.is_none());
    }
}
