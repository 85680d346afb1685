//! Startup orchestration.
//!
//! # Responsibilities
//! - Pick the configuration source
//! - Load, override and validate configuration
//! - Prepare the catalog and build the broker
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - No partial catalog: one invalid route service stops the process

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::broker::RouteServiceBroker;
use crate::catalog::{prepare_catalog, CatalogError};
use crate::config::{
    apply_env_overrides, validate_config, BrokerConfig, CloudFoundrySource, ConfigError, ConfigSource,
    FileSource,
};

/// Config file looked up in the working directory when nothing else is set.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Fatal error before the broker can serve.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no configuration source: pass --config, set VCAP_SERVICES or provide config.toml")]
    NoConfigSource,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid route service catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Choose where configuration comes from.
///
/// An explicit path wins, then `VCAP_SERVICES`, then `./config.toml`.
pub fn select_source(
    explicit: Option<PathBuf>,
    vcap_services: Option<String>,
    default_file: &Path,
) -> Result<Box<dyn ConfigSource>, StartupError> {
    if let Some(path) = explicit {
        return Ok(Box::new(FileSource::new(path)));
    }
    if let Some(vcap) = vcap_services {
        return Ok(Box::new(CloudFoundrySource::new(vcap)));
    }
    if default_file.is_file() {
        return Ok(Box::new(FileSource::new(default_file)));
    }
    Err(StartupError::NoConfigSource)
}

/// Load from `source`, apply environment overrides and validate.
pub fn load_config<F>(source: &dyn ConfigSource, env: F) -> Result<BrokerConfig, StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    tracing::debug!(source = %source.describe(), "Loading configuration");

    let config = apply_env_overrides(source.load()?, env)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::info!(
        source = %source.describe(),
        route_services = config.route_services.len(),
        bind_address = %config.listener.bind_address(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Prepare the catalog from `config` and build the broker over it.
pub fn build_broker(config: &BrokerConfig) -> Result<RouteServiceBroker, StartupError> {
    let services = prepare_catalog(config.route_services.clone())?;

    for service in &services {
        tracing::info!(
            service = %service.name,
            id = %service.id,
            plans = service.plans.len(),
            "Route service ready"
        );
        for plan in &service.plans {
            tracing::debug!(
                service = %service.name,
                plan = %plan.name,
                id = %plan.id,
                url = %plan.url,
                "Plan ready"
            );
        }
    }

    Ok(RouteServiceBroker::new(services))
}
