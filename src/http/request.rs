//! Request identification.
//!
//! # Responsibilities
//! - Name the request ID header shared by every layer
//! - Build the per-request tracing span
//! - Extract JSON bodies, rejecting bad ones with an OSB error body
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing (outermost layer)
//! - A caller-supplied `x-request-id` is kept as is

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::{HeaderName, Request};
use axum::Json;
use tracing::Span;

use crate::http::response::ApiError;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID of a request, or `"unknown"` before the ID layer ran.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Span wrapping the whole request.
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        request_id = %request_id(request),
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// [`Json`] whose rejection is an [`ApiError`] (`422` with a `description`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BrokerJson<T>(pub T);

impl<S, T> FromRequest<S> for BrokerJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
