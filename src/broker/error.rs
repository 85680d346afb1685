//! Broker errors.

use thiserror::Error;

/// A binding request referenced an id that is not in the catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Service with id {0} can't be found")]
    ServiceNotFound(String),

    #[error("Plan with id {plan_id} can't be found in service {service_id}")]
    PlanNotFound { service_id: String, plan_id: String },
}

/// Failure reported to the protocol layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BrokerError {
    /// Surfaced as a 500 carrying the underlying message.
    #[error(transparent)]
    Internal(#[from] LookupError),
}

impl BrokerError {
    /// Machine-readable error key sent alongside the description.
    pub fn error_key(&self) -> &'static str {
        match self {
            BrokerError::Internal(_) => "internal-server-error",
        }
    }
}
