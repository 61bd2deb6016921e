//! Slack payload construction and webhook delivery

use crate::errors::{ReporterError, Result};
use crate::reporter::CostReport;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Billing console the report title links to
pub const CONSOLE_URL: &str = "https://console.aws.amazon.com/billing/home?region=ap-northeast-1#/";

/// Attachment color marking a normal report
const REPORT_COLOR: &str = "good";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub fallback: String,
    pub title: String,
    pub color: String,
    pub fields: Vec<AttachmentField>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SlackPayload {
    pub attachments: Vec<Attachment>,
}

/// Build the Slack attachment payload for a collected report, with one
/// short field per service in catalog order
pub fn build_payload(report: &CostReport) -> SlackPayload {
    let fields = report
        .services
        .iter()
        .map(|(name, cost)| AttachmentField {
            title: name.clone(),
            value: format!("{:.2} USD", cost),
            short: true,
        })
        .collect();

    SlackPayload {
        attachments: vec![Attachment {
            fallback: format!("AWS Costs Report: Total {:.2} USD", report.total),
            title: format!(
                "AWS Costs Report: Total <{}|{:.2}> USD",
                CONSOLE_URL, report.total
            ),
            color: REPORT_COLOR.to_string(),
            fields,
        }],
    }
}

/// HTTP transport for delivering reports to a Slack webhook
#[derive(Debug, Clone)]
pub struct SlackWebhook {
    client: Client,
    webhook_url: String,
}

impl SlackWebhook {
    /// Create a new webhook transport
    pub fn new(webhook_url: String, http_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(http_timeout)
            .user_agent(format!("cost_reporter/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ReporterError::Http)?;

        Ok(Self {
            client,
            webhook_url,
        })
    }

    /// Post a report payload, a single attempt with no retry
    pub async fn post_report(&self, payload: &SlackPayload) -> Result<()> {
        debug!("Posting cost report to webhook");

        let response = self
            .client
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await
            .map_err(ReporterError::Http)?;

        let status = response.status();
        if status.is_success() {
            debug!("Webhook accepted report with status {}", status);
            return Ok(());
        }

        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(ReporterError::Webhook(format!(
            "webhook responded {}: {}",
            status, error_body
        )))
    }
}
