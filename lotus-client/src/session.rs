//! Session store
//!
//! Holds the authenticated session, persists it as a single JSON blob and
//! restores it on startup. Only this module mutates the session; everything
//! else borrows `&Session`.

use async_trait::async_trait;
use shared::{LoginRequest, LoginResponse, Session, UserInfo};

use crate::api::ApiClient;
use crate::config::DEFAULT_SESSION_KEY;
use crate::storage::SessionStorage;
use crate::validation;
use crate::{ClientConfig, ClientError, ClientResult, HttpClient};

/// Authentication endpoints the session store talks to
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, credentials: &LoginRequest) -> ClientResult<LoginResponse>;

    /// `POST /auth/logout` with the bearer token
    async fn logout(&self, token: &str) -> ClientResult<()>;

    /// `GET /auth/profile` with the bearer token
    async fn profile(&self, token: &str) -> ClientResult<UserInfo>;
}

/// Session store (single writer)
pub struct SessionStore<B> {
    backend: B,
    storage: Box<dyn SessionStorage>,
    key: String,
    current: Option<Session>,
}

impl<B> std::fmt::Debug for SessionStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("key", &self.key)
            .field("authenticated", &self.current.is_some())
            .finish_non_exhaustive()
    }
}

impl SessionStore<HttpClient> {
    /// Create an HTTP-backed store persisting to the configured data directory
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let http = config.build_http_client()?;
        Ok(Self::new(http, config.build_storage()).with_key(&config.session_key))
    }

    /// `from_config` followed by `rehydrate`
    pub fn open(config: &ClientConfig) -> ClientResult<Self> {
        let mut store = Self::from_config(config)?;
        store.rehydrate();
        Ok(store)
    }

    /// API client acting on behalf of the current session
    pub fn api(&self) -> ClientResult<ApiClient> {
        let session = self.current.clone().ok_or(ClientError::NotAuthenticated)?;
        Ok(ApiClient::new(self.backend.clone(), session))
    }
}

impl<B: AuthBackend> SessionStore<B> {
    pub fn new(backend: B, storage: impl SessionStorage + 'static) -> Self {
        Self {
            backend,
            storage: Box::new(storage),
            key: DEFAULT_SESSION_KEY.to_string(),
            current: None,
        }
    }

    /// Use a different storage key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    /// Restore the persisted session.
    ///
    /// A corrupt blob is removed and the store starts unauthenticated. Token
    /// expiry is not checked here.
    pub fn rehydrate(&mut self) -> Option<&Session> {
        self.current = None;

        let blob = match self.storage.load(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read persisted session: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Session>(&blob) {
            Ok(session) => {
                tracing::info!(user_id = %session.user_id(), role = %session.role(), "Restored session");
                self.current = Some(session);
            }
            Err(e) => {
                tracing::warn!("Discarding corrupt session blob: {}", e);
                if let Err(e) = self.storage.remove(&self.key) {
                    tracing::warn!("Failed to remove corrupt session blob: {}", e);
                }
            }
        }

        self.current.as_ref()
    }

    /// Log in and persist the new session.
    ///
    /// On failure the current session is left untouched; the error's
    /// `user_message()` is what the login form shows.
    pub async fn login(&mut self, credentials: LoginRequest) -> ClientResult<Session> {
        validation::validate_login(&credentials)?;

        let response = self.backend.login(&credentials).await.inspect_err(|e| {
            tracing::debug!(email = %credentials.email, "Login failed: {}", e);
        })?;

        let session = Session::from_login(response);
        self.persist(&session);
        self.current = Some(session.clone());

        tracing::info!(user_id = %session.user_id(), role = %session.role(), "Logged in");
        Ok(session)
    }

    /// Log out.
    ///
    /// Server-side invalidation is best effort; local state and storage are
    /// cleared whatever the server says.
    pub async fn logout(&mut self) {
        if let Some(session) = self.current.take() {
            if let Err(e) = self.backend.logout(&session.token).await {
                tracing::warn!(user_id = %session.user_id(), "Server logout failed: {}", e);
            } else {
                tracing::debug!(user_id = %session.user_id(), "Logged out");
            }
        }

        if let Err(e) = self.storage.remove(&self.key) {
            tracing::warn!("Failed to clear persisted session: {}", e);
        }
    }

    /// Re-fetch the user profile for the current token.
    ///
    /// A 401 means the token was revoked server-side: the session is cleared.
    pub async fn refresh_profile(&mut self) -> ClientResult<Session> {
        let token = self
            .current
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or(ClientError::NotAuthenticated)?;

        match self.backend.profile(&token).await {
            Ok(user) => {
                let session = Session { user, token };
                self.persist(&session);
                self.current = Some(session.clone());
                Ok(session)
            }
            Err(e) if e.is_unauthorized() => {
                tracing::info!("Token rejected by server, clearing session");
                self.current = None;
                if let Err(e) = self.storage.remove(&self.key) {
                    tracing::warn!("Failed to clear persisted session: {}", e);
                }
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Write the session blob; failures are logged, not returned
    fn persist(&self, session: &Session) {
        let result = serde_json::to_string(session)
            .map_err(ClientError::from)
            .and_then(|blob| self.storage.save(&self.key, &blob).map_err(ClientError::from));

        if let Err(e) = result {
            tracing::warn!("Failed to persist session: {}", e);
        }
    }
}
