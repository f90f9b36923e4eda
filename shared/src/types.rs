//! Common types used across the service

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stock quantities are decimal so partially used containers can be counted
pub type Quantity = Decimal;

/// Maximum number of fractional digits accepted for a quantity
pub const QUANTITY_SCALE: u32 = 3;

/// Largest quantity the ledger column (NUMERIC(12,3)) can hold
/// (999_999_999.999, i.e. 999_999_999_999 at scale 3)
pub const MAX_QUANTITY: Quantity = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, QUANTITY_SCALE);

/// Order names ignoring ASCII case, then by bytes.
///
/// Storage queries sort with `LOWER(name COLLATE "C"), name COLLATE "C"`,
/// which yields the same order.
pub fn cmp_names(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Completeness policy for the stock view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewPolicy {
    /// Every active drink at every location, missing rows shown as zero
    #[default]
    Dense,
    /// Only pairs that have a ledger row
    Sparse,
}

impl ViewPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewPolicy::Dense => "dense",
            ViewPolicy::Sparse => "sparse",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown view policy '{0}', expected 'dense' or 'sparse'")]
pub struct ParseViewPolicyError(pub String);

impl FromStr for ViewPolicy {
    type Err = ParseViewPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dense" | "full" => Ok(ViewPolicy::Dense),
            "sparse" => Ok(ViewPolicy::Sparse),
            other => Err(ParseViewPolicyError(other.to_string())),
        }
    }
}

impl fmt::Display for ViewPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
