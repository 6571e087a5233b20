//! Value enum for dynamic field values

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// A dynamic value held by one field of a [`Record`](super::Record).
///
/// Admin screens hand the table engine whatever the backend returned, so the
/// engine only ever looks at a value through its string form
/// ([`Value::to_text`]).
///
/// # Example
///
/// ```
/// use toto_lib::model::Value;
///
/// assert_eq!(Value::from("Asha").to_text(), "Asha");
/// assert_eq!(Value::from(30i64).to_text(), "30");
/// assert_eq!(Value::from(12.5).to_text(), "12.5");
/// assert_eq!(Value::Null.to_text(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    String(String),
    /// Fallback for nested objects and arrays.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string form used for display, search and sorting.
    ///
    /// Null renders as the empty string; numbers use their shortest decimal
    /// form (`10`, not `10.0`).
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::String(v) => v.clone(),
            Value::Json(v) => v.to_string(),
        }
    }

    /// Returns the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the numeric value, if this is an integer or a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::Float(v as f64),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            other => Value::Json(other),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_forms() {
        assert_eq!(Value::Bool(true).to_text(), "true");
        assert_eq!(Value::Float(10.0).to_text(), "10");
        assert_eq!(Value::Float(10.5).to_text(), "10.5");
        assert_eq!(Value::Int(-3).to_text(), "-3");
        assert_eq!(Value::from(None::<String>).to_text(), "");
    }

    #[test]
    fn test_deserialize_scalars() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, true, 7, 7.25, "x", {"a": 1}]"#).unwrap();
        assert_eq!(values[0], Value::Null);
        assert_eq!(values[1], Value::Bool(true));
        assert_eq!(values[2], Value::Int(7));
        assert_eq!(values[3], Value::Float(7.25));
        assert_eq!(values[4], Value::String("x".into()));
        assert_eq!(values[5].to_text(), r#"{"a":1}"#);
    }
}
