//! Backend identifiers

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Identifier of an admin entity.
///
/// The backend sends ids as either JSON numbers or strings; both normalize to
/// the same string form so screens and URL paths never care which it was.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Creates an id from its string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the id percent-encoded for use as a URL path segment.
    pub fn to_path_segment(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StringOrNumber {
            String(String),
            Integer(i64),
            Float(f64),
        }

        Ok(match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::String(s) => Id(s),
            StringOrNumber::Integer(n) => Id(n.to_string()),
            StringOrNumber::Float(n) => Id(n.to_string()),
        })
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Id {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for Id {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_and_string_ids() {
        let ids: Vec<Id> = serde_json::from_str(r#"[12, "ab-3"]"#).unwrap();
        assert_eq!(ids[0].as_str(), "12");
        assert_eq!(ids[1].as_str(), "ab-3");
    }

    #[test]
    fn test_path_segment_is_encoded() {
        assert_eq!(Id::new("a/b c").to_path_segment(), "a%2Fb%20c");
    }
}
