//! Catalog preparation errors.

use thiserror::Error;

/// A single service or plan failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Route must have a name")]
    MissingName,

    #[error("Plan '{0}' must have an url")]
    MissingPlanUrl(String),
}

/// The catalog as a whole cannot be served.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no route service configured")]
    Empty,

    /// `index` is the position of the offending service in the raw catalog.
    #[error("error on route number {index}: {source}")]
    InvalidRoute {
        index: usize,
        #[source]
        source: ValidationError,
    },
}
