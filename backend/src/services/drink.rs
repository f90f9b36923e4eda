//! Drink catalog service: creation with stock provisioning, edits and
//! soft deletion

use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::ledger::provisioning_targets;
use shared::{normalize_name, validate_name, validate_volume, Drink, DrinkCreated, Location};

const DRINK_COLUMNS: &str = "id, name, drink_type, volume_ml, is_active, created_at, updated_at";

/// Drink catalog service
#[derive(Clone)]
pub struct DrinkService {
    db: PgPool,
}

/// Input for adding a drink
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDrinkInput {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 60, message = "Type must be 1-60 characters"))]
    pub drink_type: String,
    #[validate(range(min = 1, max = 20000, message = "Volume must be between 1 and 20000 ml"))]
    pub volume_ml: i32,
    /// Locations that get a zero stock row; all locations when omitted or empty
    pub location_ids: Option<Vec<Uuid>>,
}

/// Input for editing a drink
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDrinkInput {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 60, message = "Type must be 1-60 characters"))]
    pub drink_type: Option<String>,
    #[validate(range(min = 1, max = 20000, message = "Volume must be between 1 and 20000 ml"))]
    pub volume_ml: Option<i32>,
}

/// Input for provisioning an existing drink at more locations
#[derive(Debug, Deserialize)]
pub struct ProvisionLocationsInput {
    #[serde(default)]
    pub location_ids: Vec<Uuid>,
}

impl DrinkService {
    /// Create a new DrinkService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List drinks ordered by name; inactive drinks only on request
    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<Drink>> {
        let drinks = sqlx::query_as::<_, Drink>(&format!(
            r#"SELECT {} FROM drinks WHERE is_active OR $1 ORDER BY LOWER(name COLLATE "C"), name COLLATE "C", id"#,
            DRINK_COLUMNS
        ))
        .bind(include_inactive)
        .fetch_all(&self.db)
        .await?;

        Ok(drinks)
    }

    /// Get a drink by id, active or not
    pub async fn get(&self, drink_id: Uuid) -> AppResult<Drink> {
        sqlx::query_as::<_, Drink>(&format!("SELECT {} FROM drinks WHERE id = $1", DRINK_COLUMNS))
            .bind(drink_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Drink".to_string()))
    }

    /// Add a drink to the catalog.
    ///
    /// An inactive drink with the same name is reactivated instead of
    /// duplicated; an active one is a conflict. New stock rows start at
    /// zero and are not recorded as transactions.
    pub async fn create(&self, input: CreateDrinkInput) -> AppResult<DrinkCreated> {
        input.validate()?;
        let name = normalize_name(&input.name);
        let drink_type = normalize_name(&input.drink_type);
        validate_name(&name).map_err(|msg| AppError::validation("name", msg))?;
        validate_name(&drink_type).map_err(|msg| AppError::validation("drink_type", msg))?;
        validate_volume(input.volume_ml).map_err(|msg| AppError::validation("volume_ml", msg))?;

        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, Drink>(&format!(
            "SELECT {} FROM drinks WHERE LOWER(name) = LOWER($1) FOR UPDATE",
            DRINK_COLUMNS
        ))
        .bind(&name)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(drink) = existing.as_ref().filter(|d| d.is_active) {
            return Err(AppError::conflict(
                "drink",
                format!("Drink '{}' already exists", drink.name),
            ));
        }

        let locations = sqlx::query_as::<_, Location>("SELECT id, name, created_at FROM locations")
            .fetch_all(&mut *tx)
            .await?;
        let requested = input.location_ids.as_deref().unwrap_or_default();
        let targets = provisioning_targets(&locations, requested)
            .map_err(|unknown| unknown_locations_error(&unknown))?;

        let (drink, reactivated) = match existing {
            Some(inactive) => {
                let drink = sqlx::query_as::<_, Drink>(&format!(
                    r#"
                    UPDATE drinks
                    SET is_active = TRUE, drink_type = $2, volume_ml = $3, updated_at = NOW()
                    WHERE id = $1
                    RETURNING {}
                    "#,
                    DRINK_COLUMNS
                ))
                .bind(inactive.id)
                .bind(&drink_type)
                .bind(input.volume_ml)
                .fetch_one(&mut *tx)
                .await?;
                (drink, true)
            }
            None => {
                let drink = sqlx::query_as::<_, Drink>(&format!(
                    r#"
                    INSERT INTO drinks (name, drink_type, volume_ml)
                    VALUES ($1, $2, $3)
                    RETURNING {}
                    "#,
                    DRINK_COLUMNS
                ))
                .bind(&name)
                .bind(&drink_type)
                .bind(input.volume_ml)
                .fetch_one(&mut *tx)
                .await?;
                (drink, false)
            }
        };

        let provisioned = insert_zero_rows(&mut tx, drink.id, &targets).await?;

        tx.commit().await?;

        tracing::info!(
            drink_id = %drink.id,
            name = %drink.name,
            reactivated,
            provisioned = provisioned.len(),
            "Drink added"
        );

        Ok(DrinkCreated {
            drink,
            reactivated,
            provisioned_location_ids: provisioned,
        })
    }

    /// Edit a drink's attributes
    pub async fn update(&self, drink_id: Uuid, input: UpdateDrinkInput) -> AppResult<Drink> {
        input.validate()?;
        let current = self.get(drink_id).await?;

        let name = input
            .name
            .as_deref()
            .map(normalize_name)
            .unwrap_or_else(|| current.name.clone());
        let drink_type = input
            .drink_type
            .as_deref()
            .map(normalize_name)
            .unwrap_or_else(|| current.drink_type.clone());
        let volume_ml = input.volume_ml.unwrap_or(current.volume_ml);

        validate_name(&name).map_err(|msg| AppError::validation("name", msg))?;
        validate_name(&drink_type).map_err(|msg| AppError::validation("drink_type", msg))?;
        validate_volume(volume_ml).map_err(|msg| AppError::validation("volume_ml", msg))?;

        if !current.has_name(&name) {
            let taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM drinks WHERE LOWER(name) = LOWER($1) AND id <> $2)",
            )
            .bind(&name)
            .bind(drink_id)
            .fetch_one(&self.db)
            .await?;

            if taken {
                return Err(AppError::conflict(
                    "drink",
                    format!("Another drink is already named '{}'", name),
                ));
            }
        }

        let drink = sqlx::query_as::<_, Drink>(&format!(
            r#"
            UPDATE drinks
            SET name = $2, drink_type = $3, volume_ml = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            DRINK_COLUMNS
        ))
        .bind(drink_id)
        .bind(&name)
        .bind(&drink_type)
        .bind(volume_ml)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Drink".to_string()))?;

        tracing::info!(drink_id = %drink.id, "Drink updated");

        Ok(drink)
    }

    /// Soft-delete a drink. Stock and transaction rows are kept.
    pub async fn deactivate(&self, drink_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE drinks SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(drink_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Drink".to_string()));
        }

        tracing::info!(drink_id = %drink_id, "Drink deactivated");

        Ok(())
    }

    /// Give an existing drink zero stock rows at more locations.
    ///
    /// Returns the locations that actually received a new row.
    pub async fn provision_locations(
        &self,
        drink_id: Uuid,
        input: ProvisionLocationsInput,
    ) -> AppResult<Vec<Uuid>> {
        let mut tx = self.db.begin().await?;

        let active = sqlx::query_scalar::<_, bool>("SELECT is_active FROM drinks WHERE id = $1")
            .bind(drink_id)
            .fetch_optional(&mut *tx)
            .await?;
        if active != Some(true) {
            return Err(AppError::NotFound("Drink".to_string()));
        }

        let locations = sqlx::query_as::<_, Location>("SELECT id, name, created_at FROM locations")
            .fetch_all(&mut *tx)
            .await?;
        let targets = provisioning_targets(&locations, &input.location_ids)
            .map_err(|unknown| unknown_locations_error(&unknown))?;

        let provisioned = insert_zero_rows(&mut tx, drink_id, &targets).await?;
        tx.commit().await?;

        tracing::info!(drink_id = %drink_id, provisioned = provisioned.len(), "Drink provisioned");

        Ok(provisioned)
    }
}

/// Insert zero-quantity ledger rows, skipping pairs that already have one
async fn insert_zero_rows(
    conn: &mut PgConnection,
    drink_id: Uuid,
    location_ids: &[Uuid],
) -> AppResult<Vec<Uuid>> {
    if location_ids.is_empty() {
        return Ok(Vec::new());
    }

    let inserted = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO stock_entries (drink_id, location_id, quantity)
        SELECT $1, location_id, 0 FROM UNNEST($2::uuid[]) AS t(location_id)
        ON CONFLICT (drink_id, location_id) DO NOTHING
        RETURNING location_id
        "#,
    )
    .bind(drink_id)
    .bind(location_ids)
    .fetch_all(&mut *conn)
    .await?;

    // keep the caller's location order
    Ok(location_ids
        .iter()
        .filter(|id| inserted.contains(id))
        .copied()
        .collect())
}

fn unknown_locations_error(unknown: &[Uuid]) -> AppError {
    let ids: Vec<String> = unknown.iter().map(Uuid::to_string).collect();
    AppError::validation(
        "location_ids",
        format!("Unknown location(s): {}", ids.join(", ")),
    )
}
