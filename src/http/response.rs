//! Error responses.
//!
//! # Responsibilities
//! - Map broker failures to HTTP status codes
//! - Render the OSB error body (`error`, `description`)
//!
//! # Design Decisions
//! - Unknown service or plan on bind is a 500, not a 404
//! - Every body rejection is a 422, whatever axum's own status would be
//! - 401 responses always carry a `WWW-Authenticate` challenge

use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::broker::BrokerError;

/// Realm announced in Basic auth challenges.
pub const AUTH_REALM: &str = "route-service-broker";

/// OSB error body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub description: String,
}

/// HTTP error returned by handlers and middleware.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: Option<&'static str>,
    description: String,
}

impl ApiError {
    pub fn new(status: StatusCode, description: impl Into<String>) -> Self {
        Self {
            status,
            error: None,
            description: description.into(),
        }
    }

    /// Missing or wrong broker credentials.
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    /// Unsupported or missing API version header.
    pub fn precondition_failed(description: impl Into<String>) -> Self {
        Self::new(StatusCode::PRECONDITION_FAILED, description)
    }

    /// Request body that is not the expected JSON document.
    pub fn unprocessable(description: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, description)
    }

    pub fn internal(error: &'static str, description: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: Some(error),
            description: description.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<BrokerError> for ApiError {
    fn from(err: BrokerError) -> Self {
        match &err {
            BrokerError::Internal(_) => Self::internal(err.error_key(), err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::unprocessable(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error.map(str::to_string),
            description: self.description,
        };
        let mut response = (self.status, Json(body)).into_response();

        if self.status == StatusCode::UNAUTHORIZED {
            if let Ok(challenge) = HeaderValue::from_str(&format!("Basic realm=\"{AUTH_REALM}\"")) {
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, challenge);
            }
        }

        response
    }
}
