//! HTTP handlers for stocktake submission and the transaction log

use axum::{
    extract::State,
    Json,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::services::stocktake::{
    BatchStocktakeInput, BatchStocktakeResult, StocktakeInput, TransactionFilter,
};
use crate::services::StocktakeService;
use crate::AppState;
use shared::{StockTransaction, StocktakeResult};

#[derive(Debug, Serialize)]
pub struct StocktakeResponse {
    #[serde(flatten)]
    pub result: StocktakeResult,
    pub message: &'static str,
}

/// Submit one physical count
pub async fn submit_stocktake(
    State(state): State<AppState>,
    AppJson(input): AppJson<StocktakeInput>,
) -> AppResult<Json<StocktakeResponse>> {
    let service = StocktakeService::new(state.db);
    let result = service.reconcile(input).await?;
    let message = result.message();
    Ok(Json(StocktakeResponse { result, message }))
}

/// Submit a counting session as one all-or-nothing batch
pub async fn submit_stocktake_batch(
    State(state): State<AppState>,
    AppJson(input): AppJson<BatchStocktakeInput>,
) -> AppResult<Json<BatchStocktakeResult>> {
    let service = StocktakeService::new(state.db);
    let result = service.reconcile_batch(input).await?;
    Ok(Json(result))
}

/// List logged transactions, newest first
pub async fn list_transactions(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<TransactionFilter>,
) -> AppResult<Json<Vec<StockTransaction>>> {
    let service = StocktakeService::new(state.db);
    let transactions = service.list_transactions(filter).await?;
    Ok(Json(transactions))
}
