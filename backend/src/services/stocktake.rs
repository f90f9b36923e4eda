//! Stocktake service: reconciles physical counts against the ledger
//!
//! A count replaces the recorded quantity. The difference is written to the
//! transaction log in the same database transaction as the ledger upsert, so
//! the ledger always equals the sum of its logged deltas.

use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::ledger::{duplicate_pairs, plan_stocktake, StocktakePlan};
use shared::{validate_quantity, Quantity, StockKey, StockTransaction, StocktakeResult, TransactionType};

/// Largest number of lines accepted in one batch submission
pub const MAX_BATCH_LINES: usize = 500;

/// Default and ceiling for transaction listings
pub const DEFAULT_TRANSACTION_LIMIT: i64 = 200;
pub const MAX_TRANSACTION_LIMIT: i64 = 1000;

/// Stocktake service
#[derive(Clone)]
pub struct StocktakeService {
    db: PgPool,
}

/// One physical count. Fields are optional so a missing one is reported
/// as a validation error on that field rather than a body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct StocktakeInput {
    pub drink_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub quantity: Option<Quantity>,
}

/// Several counts applied together, all or nothing
#[derive(Debug, Deserialize)]
pub struct BatchStocktakeInput {
    #[serde(default)]
    pub lines: Vec<StocktakeInput>,
}

/// Outcome of a batch submission, lines in submission order
#[derive(Debug, serde::Serialize)]
pub struct BatchStocktakeResult {
    pub applied: usize,
    pub unchanged: usize,
    pub results: Vec<StocktakeResult>,
}

/// Filters for listing transactions
#[derive(Debug, Default, Deserialize)]
pub struct TransactionFilter {
    pub drink_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub limit: Option<i64>,
}

/// A validated stocktake line
#[derive(Debug, Clone, Copy)]
struct Count {
    key: StockKey,
    quantity: Quantity,
}

impl StocktakeInput {
    fn validated(&self, prefix: &str) -> AppResult<Count> {
        let drink_id = self
            .drink_id
            .ok_or_else(|| AppError::validation(format!("{}drink_id", prefix), "Drink id is required"))?;
        let location_id = self.location_id.ok_or_else(|| {
            AppError::validation(format!("{}location_id", prefix), "Location id is required")
        })?;
        let quantity = self
            .quantity
            .ok_or_else(|| AppError::validation(format!("{}quantity", prefix), "Quantity is required"))?;
        validate_quantity(quantity)
            .map_err(|msg| AppError::validation(format!("{}quantity", prefix), msg))?;

        Ok(Count {
            key: StockKey {
                drink_id,
                location_id,
            },
            quantity,
        })
    }
}

impl StocktakeService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply one physical count
    pub async fn reconcile(&self, input: StocktakeInput) -> AppResult<StocktakeResult> {
        let count = input.validated("")?;

        let mut tx = self.db.begin().await?;
        let result = apply_count(&mut tx, count).await?;
        tx.commit().await?;

        Ok(result)
    }

    /// Apply several counts in one transaction.
    ///
    /// Every line is validated before anything is written. Lines are applied
    /// in pair order so concurrent batches lock rows consistently.
    pub async fn reconcile_batch(&self, input: BatchStocktakeInput) -> AppResult<BatchStocktakeResult> {
        if input.lines.is_empty() {
            return Err(AppError::validation("lines", "At least one line is required"));
        }
        if input.lines.len() > MAX_BATCH_LINES {
            return Err(AppError::validation(
                "lines",
                format!("At most {} lines per batch", MAX_BATCH_LINES),
            ));
        }

        let counts = input
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| line.validated(&format!("lines[{}].", i)))
            .collect::<AppResult<Vec<Count>>>()?;

        let keys: Vec<StockKey> = counts.iter().map(|c| c.key).collect();
        if let Some(dup) = duplicate_pairs(&keys).first() {
            return Err(AppError::validation(
                "lines",
                format!(
                    "Drink {} at location {} is counted more than once",
                    dup.drink_id, dup.location_id
                ),
            ));
        }

        let mut order: Vec<usize> = (0..counts.len()).collect();
        order.sort_by_key(|&i| counts[i].key);

        let mut results: Vec<Option<StocktakeResult>> = vec![None; counts.len()];
        let mut tx = self.db.begin().await?;
        for i in order {
            let result = apply_count(&mut tx, counts[i]).await.map_err(|e| match e {
                AppError::NotFound(resource) => {
                    AppError::validation(format!("lines[{}]", i), format!("{} not found", resource))
                }
                other => other,
            })?;
            results[i] = Some(result);
        }
        tx.commit().await?;

        let results: Vec<StocktakeResult> = results.into_iter().flatten().collect();
        let applied = results.iter().filter(|r| r.applied).count();

        tracing::info!(
            lines = results.len(),
            applied,
            "Batch stocktake committed"
        );

        Ok(BatchStocktakeResult {
            applied,
            unchanged: results.len() - applied,
            results,
        })
    }

    /// List logged transactions, newest first
    pub async fn list_transactions(&self, filter: TransactionFilter) -> AppResult<Vec<StockTransaction>> {
        let limit = filter.limit.unwrap_or(DEFAULT_TRANSACTION_LIMIT);
        if !(1..=MAX_TRANSACTION_LIMIT).contains(&limit) {
            return Err(AppError::validation(
                "limit",
                format!("Limit must be between 1 and {}", MAX_TRANSACTION_LIMIT),
            ));
        }

        let transactions = sqlx::query_as::<_, StockTransaction>(
            r#"
            SELECT id, drink_id, location_id, quantity_delta, transaction_type, created_at
            FROM stock_transactions
            WHERE ($1::uuid IS NULL OR drink_id = $1)
              AND ($2::uuid IS NULL OR location_id = $2)
            ORDER BY created_at DESC, id
            LIMIT $3
            "#,
        )
        .bind(filter.drink_id)
        .bind(filter.location_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(transactions)
    }
}

/// Reconcile one count inside the caller's transaction
async fn apply_count(conn: &mut PgConnection, count: Count) -> AppResult<StocktakeResult> {
    let StockKey {
        drink_id,
        location_id,
    } = count.key;

    // Serializes counts for the same pair until the transaction ends,
    // including the first count of a pair that has no row to lock yet.
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(format!("{}:{}", drink_id, location_id))
        .execute(&mut *conn)
        .await?;

    let drink_active = sqlx::query_scalar::<_, bool>("SELECT is_active FROM drinks WHERE id = $1")
        .bind(drink_id)
        .fetch_optional(&mut *conn)
        .await?;
    if drink_active != Some(true) {
        return Err(AppError::NotFound("Drink".to_string()));
    }

    let location_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM locations WHERE id = $1)")
            .bind(location_id)
            .fetch_one(&mut *conn)
            .await?;
    if !location_exists {
        return Err(AppError::NotFound("Location".to_string()));
    }

    let current = sqlx::query_scalar::<_, Quantity>(
        "SELECT quantity FROM stock_entries WHERE drink_id = $1 AND location_id = $2 FOR UPDATE",
    )
    .bind(drink_id)
    .bind(location_id)
    .fetch_optional(&mut *conn)
    .await?;

    let plan = plan_stocktake(current, count.quantity);

    let (delta, new_quantity) = match plan {
        StocktakePlan::NoChange { quantity } => {
            tracing::debug!(
                drink_id = %drink_id,
                location_id = %location_id,
                %quantity,
                "Stocktake matches ledger"
            );
            return Ok(StocktakeResult {
                drink_id,
                location_id,
                applied: false,
                delta: plan.delta(),
                quantity,
                transaction: None,
            });
        }
        StocktakePlan::Apply {
            delta,
            new_quantity,
            ..
        } => (delta, new_quantity),
    };

    sqlx::query(
        r#"
        INSERT INTO stock_entries (drink_id, location_id, quantity)
        VALUES ($1, $2, $3)
        ON CONFLICT (drink_id, location_id)
        DO UPDATE SET quantity = EXCLUDED.quantity, updated_at = NOW()
        "#,
    )
    .bind(drink_id)
    .bind(location_id)
    .bind(new_quantity)
    .execute(&mut *conn)
    .await?;

    let transaction = sqlx::query_as::<_, StockTransaction>(
        r#"
        INSERT INTO stock_transactions (drink_id, location_id, quantity_delta, transaction_type)
        VALUES ($1, $2, $3, $4)
        RETURNING id, drink_id, location_id, quantity_delta, transaction_type, created_at
        "#,
    )
    .bind(drink_id)
    .bind(location_id)
    .bind(delta)
    .bind(TransactionType::Stocktake)
    .fetch_one(&mut *conn)
    .await?;

    tracing::info!(
        drink_id = %drink_id,
        location_id = %location_id,
        %delta,
        quantity = %new_quantity,
        transaction_id = %transaction.id,
        "Stocktake applied"
    );

    Ok(StocktakeResult {
        drink_id,
        location_id,
        applied: true,
        delta,
        quantity: new_quantity,
        transaction: Some(transaction),
    })
}
