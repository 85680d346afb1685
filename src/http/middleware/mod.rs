//! Middleware guarding the `/v2` broker API.

pub mod api_version;
pub mod auth;

pub use api_version::{api_version_middleware, X_BROKER_API_VERSION};
pub use auth::{basic_auth_middleware, BrokerCredentials};
