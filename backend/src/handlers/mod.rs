//! HTTP request handlers

pub mod drink;
pub mod health;
pub mod location;
pub mod report;
pub mod stock;
pub mod transaction;
pub mod user;

pub use drink::*;
pub use health::*;
pub use location::*;
pub use report::*;
pub use stock::*;
pub use transaction::*;
pub use user::*;
