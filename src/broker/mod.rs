//! Broker core.
//!
//! # Data Flow
//! ```text
//! Vec<RouteService> (prepared catalog)
//!     → RouteServiceBroker::new (builds the service id index once)
//!     → shared as Arc<dyn ServiceBroker>
//!     → http handlers call one operation per request
//! ```
//!
//! # Design Decisions
//! - The catalog never changes after construction; no locks on reads
//! - Only `bind` has real logic; lifecycle operations are no-ops
//! - No instance or binding state is recorded

pub mod api;
pub mod error;
pub mod route_service;

pub use api::*;
pub use error::{BrokerError, LookupError};
pub use route_service::RouteServiceBroker;

/// Operations the protocol layer dispatches to.
///
/// Mirrors the Open Service Broker v2 surface; the HTTP layer only maps
/// wire formats and status codes onto these calls.
pub trait ServiceBroker: Send + Sync {
    /// Catalog exposed on `GET /v2/catalog`.
    fn services(&self) -> Vec<Service>;

    fn provision(
        &self,
        instance_id: &str,
        details: &ProvisionDetails,
        async_allowed: bool,
    ) -> Result<ProvisionedServiceSpec, BrokerError>;

    fn deprovision(
        &self,
        instance_id: &str,
        details: &DeprovisionDetails,
        async_allowed: bool,
    ) -> Result<DeprovisionServiceSpec, BrokerError>;

    fn bind(
        &self,
        instance_id: &str,
        binding_id: &str,
        details: &BindDetails,
    ) -> Result<Binding, BrokerError>;

    fn unbind(
        &self,
        instance_id: &str,
        binding_id: &str,
        details: &UnbindDetails,
    ) -> Result<(), BrokerError>;

    fn last_operation(
        &self,
        instance_id: &str,
        operation_data: Option<&str>,
    ) -> Result<LastOperation, BrokerError>;

    fn update(
        &self,
        instance_id: &str,
        details: &UpdateDetails,
        async_allowed: bool,
    ) -> Result<UpdateServiceSpec, BrokerError>;
}
