//! Stock view service: reads the ledger and shapes it for display

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::ledger::find_discrepancies;
use shared::stock_view::{build_stock_view, cell_count};
use shared::{Drink, DrinkStock, LedgerDiscrepancy, Location, StockEntry, StockKey, ViewPolicy};

/// Stock view service
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

impl StockService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Build the stock view of every active drink.
    ///
    /// Dense lists every drink at every location with missing rows as zero;
    /// sparse lists only rows that exist in the ledger.
    pub async fn view(&self, policy: ViewPolicy) -> AppResult<Vec<DrinkStock>> {
        let drinks = sqlx::query_as::<_, Drink>(
            r#"
            SELECT id, name, drink_type, volume_ml, is_active, created_at, updated_at
            FROM drinks
            WHERE is_active
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let locations =
            sqlx::query_as::<_, Location>("SELECT id, name, created_at FROM locations")
                .fetch_all(&self.db)
                .await?;

        let entries = sqlx::query_as::<_, StockEntry>(
            r#"
            SELECT e.drink_id, e.location_id, e.quantity, e.updated_at
            FROM stock_entries e
            JOIN drinks d ON d.id = e.drink_id
            WHERE d.is_active
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let view = build_stock_view(&drinks, &locations, &entries, policy);

        tracing::debug!(
            policy = %policy,
            drinks = view.len(),
            cells = cell_count(&view),
            "Stock view built"
        );

        Ok(view)
    }

    /// Raw ledger rows for one drink, including inactive drinks
    pub async fn entries_for_drink(&self, drink_id: Uuid) -> AppResult<Vec<StockEntry>> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM drinks WHERE id = $1)")
            .bind(drink_id)
            .fetch_one(&self.db)
            .await?;

        if !exists {
            return Err(AppError::NotFound("Drink".to_string()));
        }

        let entries = sqlx::query_as::<_, StockEntry>(
            r#"
            SELECT e.drink_id, e.location_id, e.quantity, e.updated_at
            FROM stock_entries e
            JOIN locations l ON l.id = e.location_id
            WHERE e.drink_id = $1
            ORDER BY LOWER(l.name COLLATE "C"), l.name COLLATE "C", l.id
            "#,
        )
        .bind(drink_id)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    /// Check every ledger row against the sum of its logged deltas
    pub async fn audit(&self) -> AppResult<Vec<LedgerDiscrepancy>> {
        let entries = sqlx::query_as::<_, StockEntry>(
            "SELECT drink_id, location_id, quantity, updated_at FROM stock_entries",
        )
        .fetch_all(&self.db)
        .await?;

        let sums = sqlx::query_as::<_, (Uuid, Uuid, Decimal)>(
            r#"
            SELECT drink_id, location_id, SUM(quantity_delta)
            FROM stock_transactions
            GROUP BY drink_id, location_id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let logged: Vec<(StockKey, Decimal)> = sums
            .into_iter()
            .map(|(drink_id, location_id, total)| {
                (
                    StockKey {
                        drink_id,
                        location_id,
                    },
                    total,
                )
            })
            .collect();

        let discrepancies = find_discrepancies(&entries, &logged);

        if discrepancies.is_empty() {
            tracing::info!(entries = entries.len(), "Ledger audit clean");
        } else {
            tracing::warn!(
                entries = entries.len(),
                discrepancies = discrepancies.len(),
                "Ledger audit found discrepancies"
            );
        }

        Ok(discrepancies)
    }
}
