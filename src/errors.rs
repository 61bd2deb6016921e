//! Error types for the cost reporter

use std::fmt;

pub type Result<T> = std::result::Result<T, ReporterError>;

#[derive(Debug)]
pub enum ReporterError {
    /// HTTP request failed
    Http(reqwest::Error),

    /// JSON serialization/deserialization failed
    Json(serde_json::Error),

    /// Configuration error
    Config(String),

    /// CloudWatch metric query failed
    CloudWatch(String),

    /// Webhook delivery failed
    Webhook(String),
}

impl fmt::Display for ReporterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReporterError::Http(err) => write!(f, "HTTP error: {}", err),
            ReporterError::Json(err) => write!(f, "JSON error: {}", err),
            ReporterError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ReporterError::CloudWatch(msg) => write!(f, "CloudWatch error: {}", msg),
            ReporterError::Webhook(msg) => write!(f, "Webhook error: {}", msg),
        }
    }
}

impl std::error::Error for ReporterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReporterError::Http(err) => Some(err),
            ReporterError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ReporterError {
    fn from(err: reqwest::Error) -> Self {
        ReporterError::Http(err)
    }
}

impl From<serde_json::Error> for ReporterError {
    fn from(err: serde_json::Error) -> Self {
        ReporterError::Json(err)
    }
}
