//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// User role
///
/// - `Admin`: global access across all branches
/// - `Manager`: management of a single branch
/// - `Pos`: billing-only access at a single branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Pos,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::Pos];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Pos => "pos",
        }
    }

    /// Human-readable label for menus and headers
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Manager => "Branch Manager",
            Role::Pos => "POS Operator",
        }
    }

    /// Whether this role is confined to a single branch
    pub fn is_branch_scoped(&self) -> bool {
        match self {
            Role::Admin => false,
            Role::Manager | Role::Pos => true,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "pos" => Ok(Role::Pos),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}
