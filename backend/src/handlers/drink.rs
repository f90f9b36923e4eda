//! HTTP handlers for drink catalog endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::services::drink::{CreateDrinkInput, ProvisionLocationsInput, UpdateDrinkInput};
use crate::services::{DrinkService, StockService};
use crate::AppState;
use shared::{Drink, DrinkCreated, StockEntry};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Serialize)]
pub struct ProvisionResponse {
    pub drink_id: Uuid,
    pub provisioned_location_ids: Vec<Uuid>,
}

/// List drinks
pub async fn list_drinks(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> AppResult<Json<Vec<Drink>>> {
    let service = DrinkService::new(state.db);
    let drinks = service.list(query.include_inactive).await?;
    Ok(Json(drinks))
}

/// Get a drink by id
pub async fn get_drink(
    State(state): State<AppState>,
    AppPath(drink_id): AppPath<Uuid>,
) -> AppResult<Json<Drink>> {
    let service = DrinkService::new(state.db);
    let drink = service.get(drink_id).await?;
    Ok(Json(drink))
}

/// Add a drink; 201 for a new drink, 200 when an inactive one was reactivated
pub async fn create_drink(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateDrinkInput>,
) -> AppResult<(StatusCode, Json<DrinkCreated>)> {
    let service = DrinkService::new(state.db);
    let created = service.create(input).await?;
    let status = if created.reactivated {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(created)))
}

/// Edit a drink
pub async fn update_drink(
    State(state): State<AppState>,
    AppPath(drink_id): AppPath<Uuid>,
    AppJson(input): AppJson<UpdateDrinkInput>,
) -> AppResult<Json<Drink>> {
    let service = DrinkService::new(state.db);
    let drink = service.update(drink_id, input).await?;
    Ok(Json(drink))
}

/// Deactivate a drink
pub async fn deactivate_drink(
    State(state): State<AppState>,
    AppPath(drink_id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    let service = DrinkService::new(state.db);
    service.deactivate(drink_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Provision an existing drink at further locations
pub async fn provision_drink(
    State(state): State<AppState>,
    AppPath(drink_id): AppPath<Uuid>,
    AppJson(input): AppJson<ProvisionLocationsInput>,
) -> AppResult<Json<ProvisionResponse>> {
    let service = DrinkService::new(state.db);
    let provisioned = service.provision_locations(drink_id, input).await?;
    Ok(Json(ProvisionResponse {
        drink_id,
        provisioned_location_ids: provisioned,
    }))
}

/// Ledger rows for one drink
pub async fn get_drink_stock(
    State(state): State<AppState>,
    AppPath(drink_id): AppPath<Uuid>,
) -> AppResult<Json<Vec<StockEntry>>> {
    let service = StockService::new(state.db);
    let entries = service.entries_for_drink(drink_id).await?;
    Ok(Json(entries))
}
