//! Drink catalog models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A drink in the master catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Drink {
    pub id: Uuid,
    pub name: String,
    /// Category, e.g. "spirit", "beer", "wine"
    pub drink_type: String,
    /// Nominal container size in millilitres
    pub volume_ml: i32,
    /// Soft-delete marker; inactive drinks keep their stock history
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of adding a drink to the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkCreated {
    pub drink: Drink,
    /// True when an inactive drink with the same name was brought back
    pub reactivated: bool,
    /// Locations that received a new zero-quantity stock row
    pub provisioned_location_ids: Vec<Uuid>,
}

impl Drink {
    /// Case-insensitive comparison on the catalog's human key
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}
