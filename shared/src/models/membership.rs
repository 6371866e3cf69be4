//! Membership Model (会员卡)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Membership tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    Silver,
    Gold,
    Platinum,
}

/// Customer-held discount/benefit plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Discount in percent (0-100)
    pub discount_percent: f64,
    pub price: f64,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub tier: MembershipTier,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub branch_ids: Vec<String>,
}

impl Membership {
    /// Whether the membership is in its validity window (both ends inclusive)
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.valid_from <= date && date <= self.valid_until
    }

    /// Apply the membership discount to an amount
    pub fn discounted(&self, amount: f64) -> f64 {
        amount * (1.0 - self.discount_percent.clamp(0.0, 100.0) / 100.0)
    }
}

/// Create membership payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipCreate {
    pub name: String,
    pub customer_name: Option<String>,
    pub discount_percent: f64,
    pub price: f64,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub tier: MembershipTier,
    pub benefits: Vec<String>,
    pub branch_ids: Vec<String>,
}

/// Update membership payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<MembershipTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_ids: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn membership() -> Membership {
        Membership {
            id: "m1".into(),
            name: "Gold Spa".into(),
            customer_name: Some("Lan".into()),
            discount_percent: 15.0,
            price: 120.0,
            valid_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            valid_until: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            tier: MembershipTier::Gold,
            benefits: vec!["Free sauna".into()],
            branch_ids: vec!["b1".into()],
        }
    }

    #[test]
    fn test_validity_window_inclusive() {
        let m = membership();
        assert!(m.is_valid_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(m.is_valid_on(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
        assert!(!m.is_valid_on(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
    }

    #[test]
    fn test_discounted() {
        let m = membership();
        assert!((m.discounted(100.0) - 85.0).abs() < 1e-9);
    }
}
