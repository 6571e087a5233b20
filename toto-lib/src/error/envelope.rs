//! Error envelopes returned by the admin API.

use serde::Deserialize;

/// Conventional error body: `{"message": ...}` and friends.
///
/// The backend is not consistent about the field name, so the first of
/// `message`, `error`, `detail` and `msg` that holds a string wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    msg: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    /// Parses an error body, returning `None` if it is not a JSON object.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// Extracts the envelope message, if any field carries a non-empty string.
    pub fn message(&self) -> Option<String> {
        [&self.message, &self.error, &self.detail, &self.msg]
            .into_iter()
            .flatten()
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Parses `body` and extracts its message in one step.
    pub fn message_from(body: &str) -> Option<String> {
        Self::parse(body).and_then(|e| e.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_precedence() {
        assert_eq!(
            ErrorEnvelope::message_from(r#"{"error": "bad", "message": "worse"}"#).as_deref(),
            Some("worse")
        );
        assert_eq!(
            ErrorEnvelope::message_from(r#"{"detail": "Token is invalid or expired"}"#).as_deref(),
            Some("Token is invalid or expired")
        );
    }

    #[test]
    fn test_non_string_and_empty_fields_are_skipped() {
        assert_eq!(
            ErrorEnvelope::message_from(r#"{"message": "", "error": {"code": 3}, "msg": "x"}"#).as_deref(),
            Some("x")
        );
        assert_eq!(ErrorEnvelope::message_from("[1]"), None);
        assert_eq!(ErrorEnvelope::message_from(""), None);
    }
}
