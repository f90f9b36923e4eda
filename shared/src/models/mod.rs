//! Domain models for the drink stock service

mod drink;
mod location;
mod stock;
mod transaction;
mod user;

pub use drink::*;
pub use location::*;
pub use stock::*;
pub use transaction::*;
pub use user::*;
