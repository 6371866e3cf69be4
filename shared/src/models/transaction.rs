//! Transaction Model
//!
//! Transactions are immutable once created and are the source of every
//! reporting aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sold line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    pub product_id: String,
    pub quantity: u32,
    /// Unit price at time of sale
    pub price: f64,
}

impl TransactionItem {
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

/// Completed sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub branch_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<TransactionItem>,
    pub total: f64,
    #[serde(default)]
    pub customer: Option<String>,
}

impl Transaction {
    /// Sum of line totals
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(TransactionItem::line_total).sum()
    }

    /// Number of units sold
    pub fn units(&self) -> u64 {
        self.items.iter().map(|i| i.quantity as u64).sum()
    }
}

/// Create transaction payload (POS billing)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCreate {
    pub branch_id: String,
    pub items: Vec<TransactionItem>,
    pub total: f64,
    pub customer: Option<String>,
}

impl TransactionCreate {
    /// Build a payload whose total is the sum of its items
    pub fn from_items(
        branch_id: impl Into<String>,
        items: Vec<TransactionItem>,
        customer: Option<String>,
    ) -> Self {
        let total = items.iter().map(TransactionItem::line_total).sum();
        Self {
            branch_id: branch_id.into(),
            items,
            total,
            customer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_format() {
        let json = r#"{
            "id": "t1",
            "branchId": "b1",
            "timestamp": "2024-05-01T09:30:00Z",
            "items": [{"productId": "p1", "quantity": 2, "price": 4.5}],
            "total": 9.0
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.branch_id, "b1");
        assert_eq!(tx.units(), 2);
        assert!((tx.items_total() - 9.0).abs() < 1e-9);
        assert!(tx.customer.is_none());
    }

    #[test]
    fn test_create_from_items_totals() {
        let payload = TransactionCreate::from_items(
            "b1",
            vec![
                TransactionItem { product_id: "p1".into(), quantity: 3, price: 2.0 },
                TransactionItem { product_id: "p2".into(), quantity: 1, price: 7.5 },
            ],
            Some("Linh".into()),
        );
        assert!((payload.total - 13.5).abs() < 1e-9);
    }
}
