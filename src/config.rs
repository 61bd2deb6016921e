//! Configuration management for the cost reporter

use crate::errors::{ReporterError, Result};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Slack webhook URL the report is posted to
    pub slack_post_url: String,

    /// HTTP timeout for webhook requests
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            slack_post_url: String::new(),
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Load configuration through an injected variable lookup
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("SLACK_POST_URL") {
            config.slack_post_url = url;
        }

        if let Some(timeout) = lookup("HTTP_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.http_timeout = Duration::from_secs(seconds);
            }
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.slack_post_url.is_empty() {
            return Err(ReporterError::Config(
                "SLACK_POST_URL must be set to the webhook URL".to_string(),
            ));
        }

        if self.http_timeout.is_zero() {
            return Err(ReporterError::Config(
                "http_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_env_reads_webhook_url_and_timeout() {
        let vars = env_map(&[
            ("SLACK_POST_URL", "https://hooks.slack.com/services/T0/B0/x"),
            ("HTTP_TIMEOUT_SECONDS", "25"),
        ]);
        let config = Config::from_env_with(|key| vars.get(key).cloned());

        assert_eq!(
            config.slack_post_url,
            "https://hooks.slack.com/services/T0/B0/x"
        );
        assert_eq!(config.http_timeout, Duration::from_secs(25));
    }

    #[test]
    fn test_from_env_defaults_when_unset() {
        let config = Config::from_env_with(|_| None);

        assert!(config.slack_post_url.is_empty());
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_from_env_ignores_unparseable_timeout() {
        let vars = env_map(&[
            ("SLACK_POST_URL", "https://hooks.slack.com/services/T0/B0/x"),
            ("HTTP_TIMEOUT_SECONDS", "soon"),
        ]);
        let config = Config::from_env_with(|key| vars.get(key).cloned());

        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_validate_rejects_missing_webhook_url() {
        let config = Config::default();

        let err = config.validate().expect_err("expected validation error");
        assert!(err.to_string().contains("SLACK_POST_URL"));
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        let config = Config {
            slack_post_url: "https://hooks.slack.com/services/T0/B0/x".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_ok());
    }
}
