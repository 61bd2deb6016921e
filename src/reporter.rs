//! Cost report collection and delivery orchestration

use crate::errors::{ReporterError, Result};
use crate::metrics::{MetricsSource, ReportWindow, latest_average};
use crate::slack::{SlackWebhook, build_payload};
use futures::future::try_join_all;
use tracing::info;
use uuid::Uuid;

/// Services reported individually, in display order
pub const SERVICE_NAMES: [&str; 9] = [
    "AmazonEC2",
    "AmazonRDS",
    "AmazonRoute53",
    "AmazonS3",
    "AmazonSNS",
    "AWSDataTransfer",
    "AWSLambda",
    "APIGateway",
    "AWSQueueService",
];

/// Collected costs for one window, services in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct CostReport {
    pub total: f64,
    pub services: Vec<(String, f64)>,
}

/// Orchestrates one report run: fetch costs concurrently, format, deliver
pub struct CostReporter {
    source: Box<dyn MetricsSource>,
    webhook: SlackWebhook,
    catalog: Vec<String>,
    run_id: String,
}

impl CostReporter {
    /// Create a reporter over the fixed service catalog
    pub fn new(source: Box<dyn MetricsSource>, webhook: SlackWebhook) -> Self {
        Self::with_catalog(
            source,
            webhook,
            SERVICE_NAMES.iter().map(|name| name.to_string()).collect(),
        )
    }

    /// Create a reporter over an explicit catalog
    pub fn with_catalog(
        source: Box<dyn MetricsSource>,
        webhook: SlackWebhook,
        catalog: Vec<String>,
    ) -> Self {
        Self {
            source,
            webhook,
            catalog,
            run_id: Uuid::new_v4().to_string(),
        }
    }

    /// Run one report: trailing-day window, collect, format, post
    pub async fn run(&self) -> Result<()> {
        let window = ReportWindow::trailing_day();
        info!(
            "Starting cost report run {} for window {} to {}",
            self.run_id, window.start, window.end
        );

        let report = self.collect_costs(&window).await?;
        info!(
            "Collected total {:.2} USD across {} services",
            report.total,
            report.services.len()
        );

        let payload = build_payload(&report);
        self.webhook.post_report(&payload).await?;

        info!("Cost report run {} delivered", self.run_id);
        Ok(())
    }

    /// Fetch the total and every catalog entry concurrently. The joined
    /// results keep catalog order whatever order the fetches complete in,
    /// and the first failure aborts the whole collection.
    pub async fn collect_costs(&self, window: &ReportWindow) -> Result<CostReport> {
        let service_futures = self.catalog.iter().map(|name| async move {
            let cost = self.fetch_cost(Some(name.as_str()), window).await?;
            Ok::<(String, f64), ReporterError>((name.clone(), cost))
        });

        let (total, services) = tokio::try_join!(
            self.fetch_cost(None, window),
            try_join_all(service_futures)
        )?;

        Ok(CostReport { total, services })
    }

    /// Latest average cost over the window, zero when no datapoints exist
    async fn fetch_cost(&self, service_name: Option<&str>, window: &ReportWindow) -> Result<f64> {
        let points = self.source.estimated_charges(service_name, window).await?;
        Ok(latest_average(&points))
    }
}
