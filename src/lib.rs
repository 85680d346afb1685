//! Static Route Service Broker Library
//!
//! Serves an operator-defined catalog of route services over the Open
//! Service Broker v2 API and resolves bindings to forwarding urls.
//!
//! # Architecture Overview
//!
//! ```text
//!   config source ──▶ config ──▶ catalog ──▶ broker ◀── http ◀── platform
//!   (file | VCAP)    (settings)  (prepare)  (lookup)   (OSB v2)
//!
//!   cross-cutting: observability (logs, metrics), lifecycle (startup, shutdown)
//! ```

// Core
pub mod broker;
pub mod catalog;
pub mod config;

// Protocol layer
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use broker::{RouteServiceBroker, ServiceBroker};
pub use catalog::{prepare_catalog, RawPlan, RawRouteService, RouteService};
pub use config::BrokerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
