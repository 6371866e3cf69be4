//! API error body
//!
//! The backend reports failures as a JSON object carrying a human-readable
//! `message` (older endpoints use `error`).

use serde::{Deserialize, Serialize};

/// Error payload returned by the backend on non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Parse an error body, returning `None` if it is not JSON
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// The message to surface, `message` first then `error`
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_preferred_over_error() {
        let body = ErrorBody::parse(r#"{"message":"Invalid credentials","error":"E1"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn test_error_field_fallback() {
        let body = ErrorBody::parse(r#"{"error":"Branch not found"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Branch not found"));
    }

    #[test]
    fn test_non_json_body() {
        assert!(ErrorBody::parse("<html>502</html>").is_none());
        assert_eq!(ErrorBody::parse("{}").unwrap().into_message(), None);
    }
}
