//! Stock transaction (audit log) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Quantity;

/// An immutable record of one change to a ledger row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockTransaction {
    pub id: Uuid,
    pub drink_id: Uuid,
    pub location_id: Uuid,
    /// Signed change applied to the ledger, never zero
    pub quantity_delta: Quantity,
    pub transaction_type: TransactionType,
    pub created_at: DateTime<Utc>,
}

/// Source of a ledger adjustment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "stock_transaction_type", rename_all = "snake_case")
)]
pub enum TransactionType {
    /// Physical count reconciled against the recorded quantity
    Stocktake,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Stocktake => "stocktake",
        }
    }
}

/// Result of submitting one stocktake count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StocktakeResult {
    pub drink_id: Uuid,
    pub location_id: Uuid,
    /// False when the count matched the ledger and nothing was written
    pub applied: bool,
    pub delta: Quantity,
    /// Ledger quantity after the operation
    pub quantity: Quantity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<StockTransaction>,
}

impl StocktakeResult {
    pub fn message(&self) -> &'static str {
        if self.applied {
            "stock updated"
        } else {
            "no change"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_unchanged_result_omits_transaction() {
        let result = StocktakeResult {
            drink_id: Uuid::nil(),
            location_id: Uuid::nil(),
            applied: false,
            delta: Decimal::ZERO,
            quantity: Decimal::from(9),
            transaction: None,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["applied"], false);
        assert!(json.get("transaction").is_none());
        assert_eq!(result.message(), "no change");
    }

    #[test]
    fn test_transaction_type_wire_name() {
        let json = serde_json::to_string(&TransactionType::Stocktake).unwrap();
        assert_eq!(json, "\"stocktake\"");
        assert_eq!(TransactionType::Stocktake.as_str(), "stocktake");
    }
}
