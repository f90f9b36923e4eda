//! HTTP handlers for user endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::drink::ListQuery;
use crate::services::user::{CreateUserInput, UpdateUserInput};
use crate::services::UserService;
use crate::AppState;
use shared::{User, UserCreated};

/// List users
pub async fn list_users(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> AppResult<Json<Vec<User>>> {
    let service = UserService::new(state.db);
    let users = service.list(query.include_inactive).await?;
    Ok(Json(users))
}

/// Get a user by id
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<Uuid>,
) -> AppResult<Json<User>> {
    let service = UserService::new(state.db);
    let user = service.get(user_id).await?;
    Ok(Json(user))
}

/// Create a user; 200 instead of 201 when a deactivated user was restored
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateUserInput>,
) -> AppResult<(StatusCode, Json<UserCreated>)> {
    let service = UserService::new(state.db);
    let created = service.create(input).await?;
    let status = if created.reactivated {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(created)))
}

pub async fn update_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<Uuid>,
    AppJson(input): AppJson<UpdateUserInput>,
) -> AppResult<Json<User>> {
    let service = UserService::new(state.db);
    let user = service.update(user_id, input).await?;
    Ok(Json(user))
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    let service = UserService::new(state.db);
    service.deactivate(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
