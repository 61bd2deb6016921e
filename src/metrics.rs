//! Billing metric queries against CloudWatch

use crate::errors::{ReporterError, Result};
use async_trait::async_trait;
use aws_sdk_cloudwatch::Client;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudwatch::types::{Dimension, Statistic};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// CloudWatch namespace for estimated-charge metrics
pub const BILLING_NAMESPACE: &str = "AWS/Billing";

/// Metric carrying the running estimated charges
pub const ESTIMATED_CHARGES_METRIC: &str = "EstimatedCharges";

/// Region billing metrics are published to, regardless of workload region
pub const BILLING_METRICS_REGION: &str = "us-east-1";

/// Dimension names and values for billing queries
pub mod dimensions {
    pub const CURRENCY: &str = "Currency";
    pub const CURRENCY_USD: &str = "USD";
    pub const SERVICE_NAME: &str = "ServiceName";
}

/// Billing metrics are published once per day
const DAILY_PERIOD_SECONDS: i32 = 86_400;

/// Query range for one report, trailing 24 hours from invocation time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// Window ending now and starting exactly 24 hours earlier
    pub fn trailing_day() -> Self {
        let end = Utc::now();
        Self {
            start: end - Duration::hours(24),
            end,
        }
    }
}

/// One observation of the estimated-charges metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostDatapoint {
    pub timestamp: DateTime<Utc>,
    pub average: f64,
    pub maximum: f64,
}

/// Reduce a chronologically ascending series to its most recent average,
/// treating an empty series as zero cost
pub fn latest_average(points: &[CostDatapoint]) -> f64 {
    points.last().map(|point| point.average).unwrap_or(0.0)
}

/// Source of estimated-charge series for the reporter
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch the estimated-charges series over the window, for one service
    /// when `service_name` is given or across all services when it is not.
    /// Returned datapoints are chronologically ascending.
    async fn estimated_charges(
        &self,
        service_name: Option<&str>,
        window: &ReportWindow,
    ) -> Result<Vec<CostDatapoint>>;
}

/// Dimension set for a billing query: always Currency=USD, plus the
/// service dimension when a service is targeted
pub fn billing_dimensions(service_name: Option<&str>) -> Result<Vec<Dimension>> {
    let mut dims = vec![
        Dimension::builder()
            .name(dimensions::CURRENCY)
            .value(dimensions::CURRENCY_USD)
            .build(),
    ];

    if let Some(name) = service_name {
        dims.push(
            Dimension::builder()
                .name(dimensions::SERVICE_NAME)
                .value(name)
                .build(),
        );
    }

    Ok(dims)
}

/// CloudWatch-backed metrics source
#[derive(Debug, Clone)]
pub struct CloudWatchMetrics {
    client: Client,
}

impl CloudWatchMetrics {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetricsSource for CloudWatchMetrics {
    async fn estimated_charges(
        &self,
        service_name: Option<&str>,
        window: &ReportWindow,
    ) -> Result<Vec<CostDatapoint>> {
        let target = service_name.unwrap_or("all services");
        debug!("Querying estimated charges for {}", target);

        let output = self
            .client
            .get_metric_statistics()
            .namespace(BILLING_NAMESPACE)
            .metric_name(ESTIMATED_CHARGES_METRIC)
            .set_dimensions(Some(billing_dimensions(service_name)?))
            .start_time(AwsDateTime::from_millis(window.start.timestamp_millis()))
            .end_time(AwsDateTime::from_millis(window.end.timestamp_millis()))
            .period(DAILY_PERIOD_SECONDS)
            .statistics(Statistic::Maximum)
            .statistics(Statistic::Average)
            .send()
            .await
            .map_err(|e| {
                ReporterError::CloudWatch(format!(
                    "GetMetricStatistics failed for {}: {}",
                    target,
                    DisplayErrorContext(&e)
                ))
            })?;

        // GetMetricStatistics does not promise any datapoint order
        let mut points: Vec<CostDatapoint> = output
            .datapoints()
            .iter()
            .filter_map(|dp| {
                let millis = dp.timestamp()?.to_millis().ok()?;
                let timestamp = DateTime::from_timestamp_millis(millis)?;
                Some(CostDatapoint {
                    timestamp,
                    average: dp.average().unwrap_or(0.0),
                    maximum: dp.maximum().unwrap_or(0.0),
                })
            })
            .collect();
        points.sort_by_key(|point| point.timestamp);

        debug!("Received {} datapoints for {}", points.len(), target);
        Ok(points)
    }
}
