//! Property values attached to log entries

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Property map carried by a [`LogEntry`](super::LogEntry).
///
/// Keys are unique; a `BTreeMap` keeps rendering deterministic.
pub type Properties = BTreeMap<String, FieldValue>;

/// Value type for structured properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    #[serde(serialize_with = "serialize_float")]
    Float(f64),
    String(String),
    Null,
}

fn serialize_float<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_str(&value.to_string())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl FieldValue {
    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| serde_json::Value::String(f.to_string())),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Null => serde_json::Value::Null,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i as i64)
    }
}

/// Non-finite floats have no JSON number form, so they are kept as their
/// text (`inf`, `-inf`, `NaN`).
impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        if f.is_finite() {
            FieldValue::Float(f)
        } else {
            FieldValue::String(f.to_string())
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Format properties as space separated `key=value` pairs
pub fn format_properties(properties: &Properties) -> String {
    properties
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build a [`Properties`] map from key/value pairs
///
/// ```
/// use tempmail_logging::core::properties::properties;
///
/// let props = properties([("user_id", 42.into()), ("plan", "free".into())]);
/// assert_eq!(props.len(), 2);
/// ```
pub fn properties<K, I>(pairs: I) -> Properties
where
    K: Into<String>,
    I: IntoIterator<Item = (K, FieldValue)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_properties_sorted() {
        let props = properties([("b", FieldValue::from(2)), ("a", FieldValue::from("x"))]);
        assert_eq!(format_properties(&props), "a=x b=2");
    }

    #[test]
    fn test_untagged_roundtrip_keeps_variants() {
        let props = properties([
            ("count", FieldValue::from(5)),
            ("ratio", FieldValue::from(0.5)),
            ("ok", FieldValue::from(true)),
            ("name", FieldValue::from("alice")),
            ("none", FieldValue::Null),
        ]);

        let json = serde_json::to_string(&props).unwrap();
        let parsed: Properties = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, props);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(FieldValue::from(None::<i32>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some("x")), FieldValue::String("x".into()));
    }

    #[test]
    fn test_non_finite_floats_kept_as_text() {
        assert_eq!(FieldValue::from(f64::INFINITY), FieldValue::String("inf".into()));
        assert_eq!(FieldValue::from(f64::NEG_INFINITY), FieldValue::String("-inf".into()));
        assert_eq!(FieldValue::from(f64::NAN), FieldValue::String("NaN".into()));
        assert_eq!(FieldValue::from(1.5), FieldValue::Float(1.5));

        let direct = serde_json::to_string(&FieldValue::Float(f64::NEG_INFINITY)).unwrap();
        assert_eq!(direct, "\"-inf\"");
        assert_eq!(FieldValue::Float(f64::NAN).to_json_value(), serde_json::json!("NaN"));

        let props = properties([("ratio", FieldValue::from(f64::INFINITY))]);
        let json = serde_json::to_string(&props).unwrap();
        let parsed: Properties = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, props);
    }
}
