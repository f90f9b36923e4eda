//! Stock ledger models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Quantity;

/// Current on-hand quantity of one drink at one location.
///
/// The ledger row is a materialized view of the transaction log: its
/// quantity always equals the sum of logged deltas for the same pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockEntry {
    pub drink_id: Uuid,
    pub location_id: Uuid,
    pub quantity: Quantity,
    pub updated_at: DateTime<Utc>,
}

impl StockEntry {
    pub fn key(&self) -> StockKey {
        StockKey {
            drink_id: self.drink_id,
            location_id: self.location_id,
        }
    }
}

/// Composite identity of a ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StockKey {
    pub drink_id: Uuid,
    pub location_id: Uuid,
}

/// A drink's quantity at one location, as presented in the stock view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationQuantity {
    pub location_id: Uuid,
    pub location: String,
    pub quantity: Quantity,
}

/// One drink with its per-location stock, the unit of the stock view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrinkStock {
    pub drink_id: Uuid,
    pub name: String,
    pub drink_type: String,
    pub volume_ml: i32,
    pub locations: Vec<LocationQuantity>,
}

impl DrinkStock {
    /// Quantity summed over every listed location
    pub fn total(&self) -> Quantity {
        self.locations.iter().map(|l| l.quantity).sum()
    }

    pub fn quantity_at(&self, location_id: Uuid) -> Option<Quantity> {
        self.locations
            .iter()
            .find(|l| l.location_id == location_id)
            .map(|l| l.quantity)
    }
}

/// A ledger row whose quantity no longer matches its transaction history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerDiscrepancy {
    pub drink_id: Uuid,
    pub location_id: Uuid,
    /// Quantity held in the ledger, `None` when the row is missing
    pub ledger_quantity: Option<Quantity>,
    /// Sum of logged deltas for the pair
    pub logged_quantity: Quantity,
}
