//! HTTP handlers for location endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::services::location::CreateLocationInput;
use crate::services::LocationService;
use crate::AppState;
use shared::Location;

/// List all locations
pub async fn list_locations(State(state): State<AppState>) -> AppResult<Json<Vec<Location>>> {
    let service = LocationService::new(state.db);
    let locations = service.list().await?;
    Ok(Json(locations))
}

/// Get a location by id
pub async fn get_location(
    State(state): State<AppState>,
    AppPath(location_id): AppPath<Uuid>,
) -> AppResult<Json<Location>> {
    let service = LocationService::new(state.db);
    let location = service.get(location_id).await?;
    Ok(Json(location))
}

/// Create a location
pub async fn create_location(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateLocationInput>,
) -> AppResult<(StatusCode, Json<Location>)> {
    let service = LocationService::new(state.db);
    let location = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(location)))
}
