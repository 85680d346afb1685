//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, request span)
//!     → middleware/auth.rs (HTTP Basic broker credentials)
//!     → middleware/api_version.rs (X-Broker-API-Version check)
//!     → handlers.rs (wire format ↔ ServiceBroker call)
//!     → response.rs (BrokerError → status code + JSON body)
//!     → Send to platform
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{AppState, HttpServer};
