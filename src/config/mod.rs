//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! TOML file | VCAP_SERVICES (Cloud Foundry)
//!     → loader.rs (ConfigSource: parse & deserialize)
//!     → env overrides (PORT, BROKER_USERNAME, BROKER_PASSWORD)
//!     → validation.rs (settings checks)
//!     → BrokerConfig (raw catalog still unprepared)
//!     → catalog::prepare_catalog at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Catalog entries are validated by the catalog preparer, not here

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, CloudFoundrySource, ConfigError, ConfigSource, FileSource};
pub use schema::{BrokerConfig, ListenerConfig, LogFormat, ObservabilityConfig};
pub use validation::{validate_config, ValidationIssue};
