//! Location service: the static list of places stock is held

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{normalize_name, validate_name, Location};

/// Location service
#[derive(Clone)]
pub struct LocationService {
    db: PgPool,
}

/// Input for creating a location
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLocationInput {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
}

impl LocationService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all locations ordered by name
    pub async fn list(&self) -> AppResult<Vec<Location>> {
        let locations = sqlx::query_as::<_, Location>(
            r#"SELECT id, name, created_at FROM locations ORDER BY LOWER(name COLLATE "C"), name COLLATE "C", id"#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(locations)
    }

    /// Get a location by id
    pub async fn get(&self, location_id: Uuid) -> AppResult<Location> {
        sqlx::query_as::<_, Location>("SELECT id, name, created_at FROM locations WHERE id = $1")
            .bind(location_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Location".to_string()))
    }

    /// Register a new location
    pub async fn create(&self, input: CreateLocationInput) -> AppResult<Location> {
        input.validate()?;
        let name = normalize_name(&input.name);
        validate_name(&name).map_err(|msg| AppError::validation("name", msg))?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM locations WHERE LOWER(name) = LOWER($1))",
        )
        .bind(&name)
        .fetch_one(&self.db)
        .await?;

        if exists {
            return Err(AppError::conflict(
                "location",
                format!("Location '{}' already exists", name),
            ));
        }

        let location = sqlx::query_as::<_, Location>(
            "INSERT INTO locations (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(&name)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(location_id = %location.id, name = %location.name, "Location created");

        Ok(location)
    }
}
