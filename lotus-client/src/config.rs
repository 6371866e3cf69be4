//! Client configuration
//!
//! # 环境变量
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | LOTUS_API_URL | http://localhost:5000/api | REST API base URL |
//! | LOTUS_REQUEST_TIMEOUT | 30 | Request timeout (seconds) |
//! | LOTUS_DATA_DIR | ./.lotus | Session storage directory |
//! | LOTUS_SESSION_KEY | pos_session | Storage key of the session blob |

use std::path::PathBuf;

/// Default REST API base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Fixed key the session blob is stored under
pub const DEFAULT_SESSION_KEY: &str = "pos_session";

/// Client configuration for connecting to the REST API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:5000/api")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory holding persisted client state
    pub data_dir: PathBuf,

    /// Storage key of the session blob
    pub session_key: String,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            data_dir: PathBuf::from("./.lotus"),
            session_key: DEFAULT_SESSION_KEY.to_string(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Unset or unparseable variables fall back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("LOTUS_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
        );
        if let Some(timeout) = std::env::var("LOTUS_REQUEST_TIMEOUT")
            .ok()
            .and_then(|t| t.parse().ok())
        {
            config.timeout = timeout;
        }
        if let Ok(dir) = std::env::var("LOTUS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(key) = std::env::var("LOTUS_SESSION_KEY")
            && !key.trim().is_empty()
        {
            config.session_key = key;
        }
        config
    }

    /// Read `.env` (if present) then load from the environment
    pub fn load() -> Self {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }
        Self::from_env()
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the data directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the session storage key
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<super::HttpClient> {
        super::HttpClient::new(self)
    }

    /// Create a file-backed session storage in the data directory
    pub fn build_storage(&self) -> super::FileStorage {
        super::FileStorage::new(&self.data_dir)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, 30);
        assert_eq!(config.session_key, "pos_session");
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::new("https://api.lotus.spa")
            .with_timeout(5)
            .with_data_dir("/tmp/lotus")
            .with_session_key("kiosk_session");
        assert_eq!(config.timeout, 5);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/lotus"));
        assert_eq!(config.session_key, "kiosk_session");
    }
}
