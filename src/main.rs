//! AWS Daily Cost Reporter Binary

use cost_reporter::{
    BILLING_METRICS_REGION, CloudWatchMetrics, Config, CostReporter, Result, SlackWebhook,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    initialize_tracing();

    info!("Starting AWS cost reporter v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env();

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    info!(
        "Reporter configuration - Billing region: {}, HTTP timeout: {}s",
        BILLING_METRICS_REGION,
        config.http_timeout.as_secs()
    );

    // One CloudWatch client and one HTTP client, scoped to this invocation.
    // Billing metrics only exist in us-east-1.
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(BILLING_METRICS_REGION))
        .load()
        .await;
    let source = CloudWatchMetrics::new(aws_sdk_cloudwatch::Client::new(&aws_config));
    let webhook = SlackWebhook::new(config.slack_post_url.clone(), config.http_timeout)?;

    let reporter = CostReporter::new(Box::new(source), webhook);

    if let Err(e) = reporter.run().await {
        error!("Cost report failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize structured logging
fn initialize_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .json();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
