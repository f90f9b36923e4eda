//! User service: staff accounts with soft deletion

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::{normalize_name, validate_name, User, UserCreated, UserRole};

const USER_COLUMNS: &str = "id, name, email, role, is_active, created_at, updated_at";

/// User service
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

/// Input for creating a user
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Input for updating a user
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List users ordered by name; inactive users only on request
    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {} FROM users WHERE is_active OR $1 ORDER BY LOWER(name COLLATE "C"), name COLLATE "C", id"#,
            USER_COLUMNS
        ))
        .bind(include_inactive)
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    pub async fn get(&self, user_id: Uuid) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    /// Create a user, or reactivate a deactivated one with the same email
    pub async fn create(&self, input: CreateUserInput) -> AppResult<UserCreated> {
        input.validate()?;
        let name = normalize_name(&input.name);
        validate_name(&name).map_err(|msg| AppError::validation("name", msg))?;
        let email = input.email.trim().to_lowercase();

        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = $1 FOR UPDATE",
            USER_COLUMNS
        ))
        .bind(&email)
        .fetch_optional(&mut *tx)
        .await?;

        let (user, reactivated) = match existing {
            Some(user) if user.is_active => {
                return Err(AppError::conflict(
                    "user",
                    format!("A user with email '{}' already exists", email),
                ));
            }
            Some(inactive) => {
                let user = sqlx::query_as::<_, User>(&format!(
                    r#"
                    UPDATE users
                    SET is_active = TRUE, name = $2, role = $3, updated_at = NOW()
                    WHERE id = $1
                    RETURNING {}
                    "#,
                    USER_COLUMNS
                ))
                .bind(inactive.id)
                .bind(&name)
                .bind(input.role)
                .fetch_one(&mut *tx)
                .await?;
                (user, true)
            }
            None => {
                let user = sqlx::query_as::<_, User>(&format!(
                    "INSERT INTO users (name, email, role) VALUES ($1, $2, $3) RETURNING {}",
                    USER_COLUMNS
                ))
                .bind(&name)
                .bind(&email)
                .bind(input.role)
                .fetch_one(&mut *tx)
                .await?;
                (user, false)
            }
        };

        tx.commit().await?;

        tracing::info!(
            user_id = %user.id,
            role = user.role.as_str(),
            reactivated,
            "User created"
        );

        Ok(UserCreated { user, reactivated })
    }

    /// Partially update a user
    pub async fn update(&self, user_id: Uuid, input: UpdateUserInput) -> AppResult<User> {
        input.validate()?;
        let current = self.get(user_id).await?;

        let name = input
            .name
            .as_deref()
            .map(normalize_name)
            .unwrap_or_else(|| current.name.clone());
        validate_name(&name).map_err(|msg| AppError::validation("name", msg))?;
        let email = input
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .unwrap_or_else(|| current.email.clone());
        let role = input.role.unwrap_or(current.role);

        if !email.eq_ignore_ascii_case(&current.email) {
            let taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = $1 AND id <> $2)",
            )
            .bind(&email)
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;

            if taken {
                return Err(AppError::conflict(
                    "user",
                    format!("A user with email '{}' already exists", email),
                ));
            }
        }

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = $2, email = $3, role = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(&name)
        .bind(&email)
        .bind(role)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        tracing::info!(user_id = %user.id, "User updated");

        Ok(user)
    }

    /// Soft-delete a user
    pub async fn deactivate(&self, user_id: Uuid) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(user_id)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        tracing::info!(user_id = %user_id, "User deactivated");

        Ok(())
    }
}
