//! HTTP handlers for stock report export and delivery

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::handlers::stock::ViewQuery;
use crate::services::report::REPORT_CONTENT_TYPE;
use crate::services::ReportService;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct EmailReportInput {
    #[validate(email(message = "Invalid email address"))]
    pub to: String,
    pub view: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmailReportResponse {
    pub sent: bool,
    pub to: String,
}

/// Download the stock report as CSV
pub async fn export_stock_report(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ViewQuery>,
) -> AppResult<impl IntoResponse> {
    let policy = query.policy(state.config.stock.default_view)?;
    let service = ReportService::new(state.db);
    let report = service.export(policy).await?;

    let disposition = format!("attachment; filename=\"{}\"", report.filename);
    Ok((
        [
            (header::CONTENT_TYPE, REPORT_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.content,
    ))
}

/// Mail the stock report to one recipient
pub async fn email_stock_report(
    State(state): State<AppState>,
    AppJson(input): AppJson<EmailReportInput>,
) -> AppResult<Json<EmailReportResponse>> {
    input.validate()?;
    let policy = ViewQuery { view: input.view }.policy(state.config.stock.default_view)?;
    let to = input.to.trim().to_string();

    let service = ReportService::new(state.db);
    service.email(state.mailer.as_ref(), &to, policy).await?;

    Ok(Json(EmailReportResponse { sent: true, to }))
}
