//! HTTP handlers for the stock view

use axum::{
    extract::State,
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppQuery;
use crate::services::StockService;
use crate::AppState;
use shared::{DrinkStock, LedgerDiscrepancy, ViewPolicy};

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub view: Option<String>,
}

impl ViewQuery {
    /// The requested policy, or the configured default when none is given
    pub fn policy(&self, default: ViewPolicy) -> AppResult<ViewPolicy> {
        match self.view.as_deref() {
            None | Some("") => Ok(default),
            Some(raw) => raw
                .parse()
                .map_err(|e: shared::ParseViewPolicyError| AppError::validation("view", e.to_string())),
        }
    }
}

/// Current stock of every active drink
pub async fn get_stock_view(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ViewQuery>,
) -> AppResult<Json<Vec<DrinkStock>>> {
    let policy = query.policy(state.config.stock.default_view)?;
    let service = StockService::new(state.db);
    let view = service.view(policy).await?;
    Ok(Json(view))
}

/// Ledger rows that disagree with their transaction history
pub async fn audit_stock(State(state): State<AppState>) -> AppResult<Json<Vec<LedgerDiscrepancy>>> {
    let service = StockService::new(state.db);
    let discrepancies = service.audit().await?;
    Ok(Json(discrepancies))
}
