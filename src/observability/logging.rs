//! Structured logging.
//!
//! # Responsibilities
//! - Log the configuration phase before settings are known
//! - Initialize the global subscriber from configuration
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` wins over the configured level

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

/// Default filter directive for a level.
pub fn default_directive(level: &str) -> String {
    format!("route_service_broker={level},tower_http={level}")
}

/// Run the configuration phase under a temporary stdout subscriber.
///
/// With `debug_init` the phase logs at debug level and ignores `RUST_LOG`.
pub fn with_bootstrap<T>(debug_init: bool, f: impl FnOnce() -> T) -> T {
    let filter = if debug_init {
        EnvFilter::new(default_directive("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive("info")))
    };
    let subscriber = fmt().with_env_filter(filter).finish();
    tracing::subscriber::with_default(subscriber, f)
}

/// Install the global subscriber.
pub fn init(level: &str, format: LogFormat) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&level.to_lowercase())));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
    }
}
