//! Combo Model

use serde::{Deserialize, Serialize};

use super::service::default_true;

/// Bundled set of services sold at a discounted aggregate price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combo {
    pub id: String,
    pub name: String,
    /// Service references
    pub service_ids: Vec<String>,
    /// Aggregate price of the bundle
    pub price: f64,
    #[serde(default)]
    pub branch_ids: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Create combo payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboCreate {
    pub name: String,
    pub service_ids: Vec<String>,
    pub price: f64,
    pub branch_ids: Vec<String>,
}

/// Update combo payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
