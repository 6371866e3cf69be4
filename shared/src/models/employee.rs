//! Employee Model

use serde::{Deserialize, Serialize};

use super::Role;
use super::service::default_true;

/// Employee response (without password)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    /// Branch reference (admins have none)
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Create employee payload
///
/// `confirm_password` is checked client-side and never sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    #[serde(skip_serializing, default)]
    pub confirm_password: String,
    pub role: Role,
    pub branch_id: Option<String>,
}

/// Update employee payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing, default)]
    pub confirm_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_password_not_sent() {
        let payload = EmployeeCreate {
            name: "Hoa".into(),
            email: "hoa@lotus.spa".into(),
            phone: None,
            password: "secret123".into(),
            confirm_password: "secret123".into(),
            role: Role::Pos,
            branch_id: Some("b1".into()),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("confirmPassword").is_none());
        assert_eq!(value["password"], "secret123");
        assert_eq!(value["role"], "pos");
    }
}
