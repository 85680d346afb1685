//! `X-Broker-API-Version` enforcement.
//!
//! Platforms announce the OSB version they speak; this broker implements v2
//! and rejects anything else with 412.

use axum::{
    body::Body,
    http::{HeaderName, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::response::ApiError;

pub const X_BROKER_API_VERSION: HeaderName = HeaderName::from_static("x-broker-api-version");

/// Major API version served.
pub const SUPPORTED_MAJOR_VERSION: &str = "2";

/// Check a header value such as `2.14`.
pub fn check_version(value: Option<&str>) -> Result<(), String> {
    let value = value.ok_or_else(|| "X-Broker-API-Version header is missing".to_string())?;
    match value.trim().split('.').next() {
        Some(major) if major == SUPPORTED_MAJOR_VERSION => Ok(()),
        _ => Err(format!(
            "X-Broker-API-Version {value} is not supported, expected {SUPPORTED_MAJOR_VERSION}.x"
        )),
    }
}

pub async fn api_version_middleware(request: Request<Body>, next: Next) -> Response {
    let value = request
        .headers()
        .get(&X_BROKER_API_VERSION)
        .and_then(|h| h.to_str().ok());

    match check_version(value) {
        Ok(()) => next.run(request).await,
        Err(description) => {
            tracing::warn!(reason = %description, "Rejected request with unsupported API version");
            ApiError::precondition_failed(description).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_version() {
        assert!(check_version(Some("2.14")).is_ok());
        assert!(check_version(Some("2")).is_ok());
        assert!(check_version(Some("3.0")).is_err());
        assert!(check_version(Some("")).is_err());
        assert_eq!(
            check_version(None).unwrap_err(),
            "X-Broker-API-Version header is missing"
        );
    }
}
