//! Dynamic row record

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use super::Value;

/// One displayable unit of admin data, shown as a table row.
///
/// Records hold field values as a `HashMap<String, Value>`. The schema is
/// whatever the screen puts in; the table engine reads fields by name and
/// never mutates a record.
///
/// # Example
///
/// ```
/// use toto_lib::model::Record;
///
/// let record = Record::new()
///     .set("riderName", "Asha")
///     .set("fare", 120i64);
///
/// assert_eq!(record.text("fare"), "120");
/// assert_eq!(record.text("missing"), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from a JSON object. Non-object values yield an empty record.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => Self {
                fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            },
            _ => Self::default(),
        }
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the string form of a field, or `""` when it is absent or null.
    pub fn text(&self, field: &str) -> String {
        self.fields.get(field).map(Value::to_text).unwrap_or_default()
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<serde_json::Value> for Record {
    fn from(value: serde_json::Value) -> Self {
        Self::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_json_object() {
        let record = Record::from_json(json!({"id": 4, "name": "Ravi", "verified": false, "rating": null}));
        assert_eq!(record.text("id"), "4");
        assert_eq!(record.text("name"), "Ravi");
        assert_eq!(record.text("verified"), "false");
        assert_eq!(record.text("rating"), "");
        assert!(record.contains("rating"));
    }

    #[test]
    fn test_from_non_object() {
        assert!(Record::from_json(json!([1, 2])).is_empty());
    }

    #[test]
    fn test_deserialize_transparent() {
        let record: Record = serde_json::from_str(r#"{"fare": 30}"#).unwrap();
        assert_eq!(record.get("fare"), Some(&Value::Int(30)));
    }
}
