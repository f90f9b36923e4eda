//! Business logic services for the drink stock server

pub mod drink;
pub mod location;
pub mod report;
pub mod stock;
pub mod stocktake;
pub mod user;

pub use drink::DrinkService;
pub use location::LocationService;
pub use report::ReportService;
pub use stock::StockService;
pub use stocktake::StocktakeService;
pub use user::UserService;
