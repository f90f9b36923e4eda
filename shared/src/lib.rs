//! Shared domain types and rules for the drink stock service
//!
//! Everything here is pure: the backend loads rows from storage and hands
//! them to the view builder, the stocktake planner and the report layout.

pub mod ledger;
pub mod models;
pub mod report;
pub mod stock_view;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
