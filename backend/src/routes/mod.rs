//! Route definitions for the drink stock server

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/stock", stock_routes())
        .nest("/locations", location_routes())
        .nest("/drinks", drink_routes())
        .nest("/transactions", transaction_routes())
        .nest("/users", user_routes())
        .nest("/reports", report_routes())
}

/// Stock view routes
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_stock_view))
        .route("/audit", get(handlers::audit_stock))
}

/// Location routes
fn location_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_locations).post(handlers::create_location),
        )
        .route("/:id", get(handlers::get_location))
}

/// Drink catalog routes
fn drink_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_drinks).post(handlers::create_drink))
        .route(
            "/:id",
            get(handlers::get_drink)
                .put(handlers::update_drink)
                .delete(handlers::deactivate_drink),
        )
        .route("/:id/locations", post(handlers::provision_drink))
        .route("/:id/stock", get(handlers::get_drink_stock))
}

/// Stocktake and transaction log routes
fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_transactions))
        .route("/stocktake", post(handlers::submit_stocktake))
        .route("/stocktake/batch", post(handlers::submit_stocktake_batch))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/:id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::deactivate_user),
        )
}

/// Report routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/stock", get(handlers::export_stock_report))
        .route("/stock/email", post(handlers::email_stock_report))
}
