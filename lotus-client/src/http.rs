//! HTTP client for network-based API calls

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use shared::{ErrorBody, LoginRequest, LoginResponse, UserInfo};

use crate::session::AuthBackend;
use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for making requests to the REST API
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

/// `GET /auth/profile` body: either `{ "user": {...} }` or the bare user
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProfileResponse {
    Wrapped { user: UserInfo },
    Bare(UserInfo),
}

impl ProfileResponse {
    fn into_user(self) -> UserInfo {
        match self {
            ProfileResponse::Wrapped { user } | ProfileResponse::Bare(user) => user,
        }
    }
}

/// Reject a login answer that carries no usable token
fn checked_login(login: LoginResponse) -> ClientResult<LoginResponse> {
    if login.token.trim().is_empty() {
        return Err(ClientError::InvalidResponse("Missing token in login response".into()));
    }
    Ok(login)
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: None,
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Replace or clear the authentication token
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Attach `Authorization: Bearer` if a token is available
    fn authorize(&self, request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token.or(self.token.as_deref()) {
            Some(t) => request.bearer_auth(t),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.url(path)), None);
        tracing::debug!(path = %path, "GET");
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.post(self.url(path)).json(body), None);
        tracing::debug!(path = %path, "POST");
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.put(self.url(path)).json(body), None);
        tracing::debug!(path = %path, "PUT");
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request, ignoring any response body
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let request = self.authorize(self.client.delete(self.url(path)), None);
        tracing::debug!(path = %path, "DELETE");
        let response = request.send().await?;
        Self::handle_empty(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(error_from_status(status, &text));
        }

        serde_json::from_str(&text).map_err(Into::into)
    }

    async fn handle_empty(response: reqwest::Response) -> ClientResult<()> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(error_from_status(status, &text));
        }
        Ok(())
    }

    // ========== Auth API ==========

    /// Login with email and password
    pub async fn login(&self, credentials: &LoginRequest) -> ClientResult<LoginResponse> {
        let request = self.client.post(self.url("/auth/login")).json(credentials);
        let response = request.send().await?;
        checked_login(Self::handle_response(response).await?)
    }

    /// Invalidate a token server-side
    pub async fn logout(&self, token: &str) -> ClientResult<()> {
        let request = self.authorize(self.client.post(self.url("/auth/logout")), Some(token));
        let response = request.send().await?;
        Self::handle_empty(response).await
    }

    /// Get the profile of the token's user
    pub async fn profile(&self, token: &str) -> ClientResult<UserInfo> {
        let request = self.authorize(self.client.get(self.url("/auth/profile")), Some(token));
        let response = request.send().await?;
        Self::handle_response::<ProfileResponse>(response)
            .await
            .map(ProfileResponse::into_user)
    }
}

#[async_trait]
impl AuthBackend for HttpClient {
    async fn login(&self, credentials: &LoginRequest) -> ClientResult<LoginResponse> {
        HttpClient::login(self, credentials).await
    }

    async fn logout(&self, token: &str) -> ClientResult<()> {
        HttpClient::logout(self, token).await
    }

    async fn profile(&self, token: &str) -> ClientResult<UserInfo> {
        HttpClient::profile(self, token).await
    }
}

/// Map a non-success status and its body to a client error.
///
/// The message comes from the JSON error body when present, then from a short
/// plain-text body, then from the status reason.
pub(crate) fn error_from_status(status: StatusCode, body: &str) -> ClientError {
    let message = ErrorBody::parse(body)
        .and_then(ErrorBody::into_message)
        .or_else(|| {
            let text = body.trim();
            (!text.is_empty() && text.len() <= 200 && !text.starts_with('<'))
                .then(|| text.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
        StatusCode::FORBIDDEN => ClientError::Forbidden(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation(message),
        _ => ClientError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_json_body() {
        let err = error_from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Invalid email or password"}"#,
        );
        assert!(matches!(err, ClientError::Unauthorized(ref m) if m == "Invalid email or password"));
    }

    #[test]
    fn test_error_message_from_plain_text() {
        let err = error_from_status(StatusCode::CONFLICT, "Branch name already used");
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Branch name already used");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_message_falls_back_to_reason() {
        let err = error_from_status(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.user_message(), "Bad Gateway");

        let err = error_from_status(StatusCode::UNPROCESSABLE_ENTITY, "");
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn test_profile_accepts_both_shapes() {
        let bare = r#"{"userId":"u1","name":"Mai","role":"manager","branchId":"b1"}"#;
        let wrapped = format!(r#"{{"user":{bare}}}"#);

        let from_bare: ProfileResponse = serde_json::from_str(bare).unwrap();
        let from_wrapped: ProfileResponse = serde_json::from_str(&wrapped).unwrap();
        assert!(matches!(from_wrapped, ProfileResponse::Wrapped { .. }));

        let user = from_bare.into_user();
        assert_eq!(user, from_wrapped.into_user());
        assert_eq!(user.role, shared::Role::Manager);
        assert_eq!(user.branch_id.as_deref(), Some("b1"));

        assert!(serde_json::from_str::<ProfileResponse>(r#"{"user":{"name":"x"}}"#).is_err());
    }

    #[test]
    fn test_login_requires_token() {
        let user = UserInfo {
            user_id: "u1".into(),
            name: "Mai".into(),
            role: shared::Role::Pos,
            branch_id: Some("b1".into()),
        };
        let ok = LoginResponse { token: "abc".into(), user: user.clone() };
        assert_eq!(checked_login(ok).unwrap().token, "abc");

        let blank = LoginResponse { token: "  ".into(), user };
        assert!(matches!(checked_login(blank), Err(ClientError::InvalidResponse(_))));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = HttpClient::new(&ClientConfig::default()).unwrap().with_token("secret-token");
        let printed = format!("{client:?}");
        assert!(printed.contains("authenticated: true"));
        assert!(!printed.contains("secret-token"));
    }

    #[test]
    fn test_url_join() {
        let client = HttpClient::new(&ClientConfig::new("http://localhost:5000/api/")).unwrap();
        assert_eq!(client.url("/auth/login"), "http://localhost:5000/api/auth/login");
        assert_eq!(client.url("branches/b1"), "http://localhost:5000/api/branches/b1");
    }
}
