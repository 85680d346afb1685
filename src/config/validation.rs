//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation of broker settings (serde handles syntactic)
//! - Validate value ranges (port > 0, timeouts > 0, known log levels)
//! - Check the metrics address parses, even while metrics are disabled
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: &BrokerConfig → Result<(), Vec<ValidationIssue>>
//! - Route services are checked by the catalog preparer instead

use std::fmt;

use crate::config::schema::BrokerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// One problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check broker settings, collecting every issue.
pub fn validate_config(config: &BrokerConfig) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if config.broker_username.is_empty() {
        issues.push(ValidationIssue::new("broker_username", "must not be empty"));
    }
    if config.broker_password.is_empty() {
        issues.push(ValidationIssue::new("broker_password", "must not be empty"));
    }
    if config.listener.host.is_empty() {
        issues.push(ValidationIssue::new("listener.host", "must not be empty"));
    }
    if config.listener.port == 0 {
        issues.push(ValidationIssue::new("listener.port", "must be greater than 0"));
    }
    if config.listener.request_timeout_secs == 0 {
        issues.push(ValidationIssue::new(
            "listener.request_timeout_secs",
            "must be greater than 0",
        ));
    }
    if !LOG_LEVELS.contains(&config.observability.log_level.to_lowercase().as_str()) {
        issues.push(ValidationIssue::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if let Err(e) = config.observability.metrics_socket_addr() {
        issues.push(ValidationIssue::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address: {e}", config.observability.metrics_address),
        ));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&BrokerConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_all_issues() {
        let mut config = BrokerConfig::default();
        config.broker_username.clear();
        config.broker_password.clear();
        config.listener.port = 0;
        config.observability.log_level = "verbose".into();
        config.observability.metrics_address = "localhost".into();

        let issues = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = issues.iter().map(|i| i.field).collect();
        assert_eq!(
            fields,
            vec![
                "broker_username",
                "broker_password",
                "listener.port",
                "observability.log_level",
                "observability.metrics_address"
            ]
        );
        assert_eq!(issues[3].to_string(), "observability.log_level: unknown level 'verbose'");
        assert!(issues[4]
            .to_string()
            .starts_with("observability.metrics_address: 'localhost' is not a socket address"));
    }
}
