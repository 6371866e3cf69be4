//! Client error types

use thiserror::Error;

/// Message shown when the backend could not be reached at all
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection and try again.";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Server rejected the credentials or token (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Permission denied (403)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error, either client-side or a 400/422 from the server
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Operation requires a logged-in session
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Session storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the server reported the token or credentials as invalid
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// The string surfaced to the user: the backend's message when there is
    /// one, otherwise a generic network error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Validation(m)
            | Self::Api { message: m, .. } => m.clone(),
            Self::NotAuthenticated => "Please log in first".to_string(),
            Self::InvalidResponse(_) | Self::Serialization(_) => {
                "Unexpected response from server".to_string()
            }
            Self::Storage(_) => "Could not access local session storage".to_string(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
