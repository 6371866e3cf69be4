//! Client-related types shared between the backend contract and the client
//!
//! Auth request/response DTOs and the persisted session blob.

use serde::{Deserialize, Serialize};

use crate::models::Role;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// User information as returned by `/auth/login` and `/auth/profile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
}

// =============================================================================
// Session
// =============================================================================

/// Authenticated session: the user fields flattened next to the bearer token.
///
/// This is exactly the JSON blob kept in client storage:
///
/// ```json
/// { "userId": "u1", "name": "Mai", "role": "manager", "branchId": "b1", "token": "..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(flatten)]
    pub user: UserInfo,
    pub token: String,
}

impl Session {
    /// Merge a login response into a session
    pub fn from_login(response: LoginResponse) -> Self {
        Self {
            user: response.user,
            token: response.token,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user.user_id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn branch_id(&self) -> Option<&str> {
        self.user.branch_id.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }
}
