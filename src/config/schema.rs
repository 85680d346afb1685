//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the broker.
//! All types derive Serde traits for deserialization from config files and
//! from Cloud Foundry service credentials.

use std::net::{AddrParseError, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::catalog::RawRouteService;

/// Root configuration for the broker.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Route services offered in the catalog, as written by the operator.
    pub route_services: Vec<RawRouteService>,

    /// Basic auth user the platform presents to the broker.
    pub broker_username: String,

    /// Basic auth password the platform presents to the broker.
    pub broker_password: String,

    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            route_services: Vec::new(),
            broker_username: "brokeruser".to_string(),
            broker_password: "password".to_string(),
            listener: ListenerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to bind (overridden by `PORT`).
    pub port: u16,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl ObservabilityConfig {
    /// Parsed `metrics_address`.
    pub fn metrics_socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.metrics_address.parse()
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
