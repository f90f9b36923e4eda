//! Report service: stock report export and delivery

use chrono::Utc;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::external::mailer::{Attachment, ReportMailer};
use crate::services::{LocationService, StockService};
use shared::report::{stock_sheet, StockSheet};
use shared::ViewPolicy;

pub const REPORT_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// A rendered report file
#[derive(Debug, Clone)]
pub struct StockReport {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Report service
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

impl ReportService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Render the current stock view as a CSV file
    pub async fn export(&self, policy: ViewPolicy) -> AppResult<StockReport> {
        let view = StockService::new(self.db.clone()).view(policy).await?;
        let locations = LocationService::new(self.db.clone()).list().await?;

        let sheet = stock_sheet(&view, &locations);
        let content = render_csv(&sheet)?;
        let filename = format!("stock_report_{}.csv", Utc::now().format("%Y-%m-%d"));

        tracing::info!(
            policy = %policy,
            rows = sheet.rows.len(),
            filename = %filename,
            "Stock report generated"
        );

        Ok(StockReport { filename, content })
    }

    /// Render the report and mail it to one recipient
    pub async fn email(
        &self,
        mailer: Option<&ReportMailer>,
        to: &str,
        policy: ViewPolicy,
    ) -> AppResult<()> {
        let mailer = mailer.ok_or_else(|| {
            AppError::Configuration("Mail delivery is not configured".to_string())
        })?;

        let report = self.export(policy).await?;
        let text = format!(
            "Attached is the {} stock report generated {}.",
            policy,
            Utc::now().format("%Y-%m-%d %H:%M UTC")
        );

        mailer
            .send_report(
                to,
                "Stock report",
                &text,
                Attachment {
                    filename: report.filename,
                    content_type: REPORT_CONTENT_TYPE.to_string(),
                    content: report.content,
                },
            )
            .await
    }
}

/// Write the sheet as CSV, header first
pub fn render_csv(sheet: &StockSheet) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(&sheet.header)
        .map_err(|e| AppError::Internal(format!("Failed to write report: {}", e)))?;
    for row in &sheet.rows {
        writer
            .write_record(row)
            .map_err(|e| AppError::Internal(format!("Failed to write report: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to finish report: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_csv_quotes_commas() {
        let sheet = StockSheet {
            header: vec!["Drink".to_string(), "Bar 1".to_string(), "Total".to_string()],
            rows: vec![
                vec!["Gin, London Dry".to_string(), "9".to_string(), "9".to_string()],
                vec!["Tonic".to_string(), String::new(), "0".to_string()],
            ],
        };

        let csv = String::from_utf8(render_csv(&sheet).unwrap()).unwrap();

        assert_eq!(
            csv,
            "Drink,Bar 1,Total\n\"Gin, London Dry\",9,9\nTonic,,0\n"
        );
    }
}
