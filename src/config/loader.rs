//! Configuration sources.
//!
//! A [`ConfigSource`] yields a [`BrokerConfig`]; the composition root picks
//! one and passes the result on explicitly.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::config::schema::BrokerConfig;
use crate::config::validation::ValidationIssue;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid VCAP_SERVICES: {0}")]
    Vcap(#[from] serde_json::Error),

    #[error("no bound service named or tagged 'config' in VCAP_SERVICES")]
    NoConfigService,

    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("validation failed: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Something that can produce the raw broker configuration.
pub trait ConfigSource {
    /// Human-readable origin, for logs.
    fn describe(&self) -> String;

    fn load(&self) -> Result<BrokerConfig, ConfigError>;
}

/// TOML configuration file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn load(&self) -> Result<BrokerConfig, ConfigError> {
        load_config(&self.path)
    }
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BrokerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: BrokerConfig = toml::from_str(&content)?;

    tracing::debug!(
        path = %path.display(),
        route_services = config.route_services.len(),
        "Parsed configuration file"
    );

    Ok(config)
}

/// Cloud Foundry `VCAP_SERVICES` content.
///
/// The broker settings live in the credentials of a bound service (usually
/// user-provided) whose name contains `config` or which carries a tag
/// starting with `config`.
#[derive(Debug, Clone)]
pub struct CloudFoundrySource {
    vcap_services: String,
}

impl CloudFoundrySource {
    pub const ENV_VAR: &'static str = "VCAP_SERVICES";

    pub fn new(vcap_services: impl Into<String>) -> Self {
        Self {
            vcap_services: vcap_services.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VcapService {
    #[serde(default)]
    name: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    credentials: serde_json::Value,
}

impl VcapService {
    fn is_config(&self) -> bool {
        self.name.to_lowercase().contains("config")
            || self.tags.iter().any(|tag| tag.to_lowercase().starts_with("config"))
    }
}

impl ConfigSource for CloudFoundrySource {
    fn describe(&self) -> String {
        Self::ENV_VAR.to_string()
    }

    fn load(&self) -> Result<BrokerConfig, ConfigError> {
        let by_label: BTreeMap<String, Vec<VcapService>> = serde_json::from_str(&self.vcap_services)?;

        let (label, service) = by_label
            .into_iter()
            .flat_map(|(label, services)| services.into_iter().map(move |s| (label.clone(), s)))
            .find(|(_, service)| service.is_config())
            .ok_or(ConfigError::NoConfigService)?;

        tracing::debug!(
            label = %label,
            service = %service.name,
            "Using bound service credentials as configuration"
        );

        if service.credentials.is_null() {
            return Ok(BrokerConfig::default());
        }
        Ok(serde_json::from_value(service.credentials)?)
    }
}

/// Apply `PORT`, `BROKER_USERNAME` and `BROKER_PASSWORD` from `lookup`.
pub fn apply_env_overrides<F>(mut config: BrokerConfig, lookup: F) -> Result<BrokerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT").filter(|p| !p.is_empty()) {
        config.listener.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
            name: "PORT",
            value: port.clone(),
        })?;
        tracing::debug!(port = config.listener.port, "Port overridden from environment");
    }
    if let Some(username) = lookup("BROKER_USERNAME").filter(|u| !u.is_empty()) {
        config.broker_username = username;
    }
    if let Some(password) = lookup("BROKER_PASSWORD").filter(|p| !p.is_empty()) {
        config.broker_password = password;
    }
    Ok(config)
}
