//! Mail delivery client for stock reports
//!
//! Posts a JSON message with a base64 attachment to an HTTP mail API.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Serialize;

use crate::config::MailConfig;
use crate::error::{AppError, AppResult};

/// A file attached to an outgoing message
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// Report mail client
#[derive(Clone)]
pub struct ReportMailer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    from_address: String,
}

#[derive(Debug, Serialize, PartialEq)]
struct MailPayload {
    from: String,
    to: Vec<String>,
    subject: String,
    text: String,
    attachments: Vec<MailAttachment>,
}

#[derive(Debug, Serialize, PartialEq)]
struct MailAttachment {
    filename: String,
    content_type: String,
    /// Base64-encoded file body
    content: String,
}

impl ReportMailer {
    /// Build a mailer from configuration; `None` when no endpoint is set
    pub fn from_config(config: &MailConfig) -> AppResult<Option<Self>> {
        let Some(endpoint) = config.api_endpoint.as_ref().filter(|e| !e.trim().is_empty()) else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Mail client setup failed: {}", e)))?;

        Ok(Some(Self {
            client,
            endpoint: endpoint.clone(),
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
        }))
    }

    /// Send one message with an attachment. Failures are not retried.
    pub async fn send_report(
        &self,
        to: &str,
        subject: &str,
        text: &str,
        attachment: Attachment,
    ) -> AppResult<()> {
        let payload = self.payload(to, subject, text, &attachment);

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Mail API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Mail API error: {} - {}",
                status, body
            )));
        }

        tracing::info!(
            to = %to,
            filename = %attachment.filename,
            bytes = attachment.content.len(),
            "Stock report mailed"
        );

        Ok(())
    }

    fn payload(&self, to: &str, subject: &str, text: &str, attachment: &Attachment) -> MailPayload {
        MailPayload {
            from: self.from_address.clone(),
            to: vec![to.to_string()],
            subject: subject.to_string(),
            text: text.to_string(),
            attachments: vec![MailAttachment {
                filename: attachment.filename.clone(),
                content_type: attachment.content_type.clone(),
                content: STANDARD.encode(&attachment.content),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: Option<&str>) -> MailConfig {
        MailConfig {
            api_endpoint: endpoint.map(str::to_string),
            api_key: Some("secret".to_string()),
            from_address: "stock@example.com".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_unconfigured_mailer_is_none() {
        assert!(ReportMailer::from_config(&config(None)).unwrap().is_none());
        assert!(ReportMailer::from_config(&config(Some("  "))).unwrap().is_none());
    }

    #[test]
    fn test_payload_encodes_attachment() {
        let mailer = ReportMailer::from_config(&config(Some("http://mail.local/send")))
            .unwrap()
            .unwrap();
        let attachment = Attachment {
            filename: "stock_report.csv".to_string(),
            content_type: "text/csv".to_string(),
            content: b"Drink,Total\n".to_vec(),
        };

        let payload = mailer.payload("manager@example.com", "Stock", "Attached", &attachment);

        assert_eq!(payload.from, "stock@example.com");
        assert_eq!(payload.to, vec!["manager@example.com".to_string()]);
        assert_eq!(payload.attachments.len(), 1);
        assert_eq!(payload.attachments[0].content, "RHJpbmssVG90YWwK");
    }
}
