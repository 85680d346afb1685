//! Route service catalog.
//!
//! # Data Flow
//! ```text
//! Vec<RawRouteService> (operator config)
//!     → prepare.rs (defaults, validation, id derivation)
//!     → Vec<RouteService> (finalized, immutable)
//!     → handed to the broker core at startup
//! ```
//!
//! # Design Decisions
//! - Preparation is a pure transform: raw values in, prepared values out
//! - Fail fast: the first invalid service aborts the whole catalog
//! - Ids are derived from names, never read from config

pub mod error;
pub mod id;
pub mod model;
pub mod prepare;

pub use error::{CatalogError, ValidationError};
pub use id::{derive_id, ROOT_NAMESPACE};
pub use model::{Plan, RawPlan, RawRouteService, RouteService, DEFAULT_TAG};
pub use prepare::{prepare_catalog, prepare_plan, prepare_service};
