//! HTTP Basic authentication of the platform calling the broker.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::http::response::ApiError;

/// Credentials the platform must present.
///
/// Only SHA-256 digests are kept; comparisons run in constant time over
/// fixed-length digests so neither content nor length leaks.
#[derive(Debug, Clone)]
pub struct BrokerCredentials {
    username_digest: [u8; 32],
    password_digest: [u8; 32],
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

impl BrokerCredentials {
    pub fn new(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        Self {
            username_digest: digest(username.as_ref()),
            password_digest: digest(password.as_ref()),
        }
    }

    /// Constant-time check of a username/password pair.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let username_ok = digest(username)[..].ct_eq(&self.username_digest[..]);
        let password_ok = digest(password)[..].ct_eq(&self.password_digest[..]);
        (username_ok & password_ok).into()
    }

    /// True when an `Authorization` header value carries these credentials.
    pub fn matches_header(&self, value: &str) -> bool {
        let Some((scheme, encoded)) = value.trim().split_once(' ') else {
            return false;
        };
        if !scheme.eq_ignore_ascii_case("basic") {
            return false;
        }

        let Ok(decoded) = STANDARD.decode(encoded.trim()) else {
            return false;
        };
        let Ok(decoded) = String::from_utf8(decoded) else {
            return false;
        };

        match decoded.split_once(':') {
            Some((username, password)) => self.verify(username, password),
            None => false,
        }
    }
}

pub async fn basic_auth_middleware(
    State(credentials): State<Arc<BrokerCredentials>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|value| credentials.matches_header(value))
        .unwrap_or(false);

    if authorized {
        return next.run(request).await;
    }

    tracing::warn!(path = %request.uri().path(), "Rejected request with invalid broker credentials");
    ApiError::unauthorized().into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_for(user: &str, pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
    }

    #[test]
    fn test_matching_credentials() {
        let creds = BrokerCredentials::new("brokeruser", "password");
        assert!(creds.matches_header(&header_for("brokeruser", "password")));
        assert!(creds.matches_header(&header_for("brokeruser", "password").replace("Basic", "basic")));
    }

    #[test]
    fn test_password_may_contain_colon() {
        let creds = BrokerCredentials::new("u", "p:with:colons");
        assert!(creds.matches_header(&header_for("u", "p:with:colons")));
    }

    #[test]
    fn test_verify() {
        let creds = BrokerCredentials::new("brokeruser", "password");
        assert!(creds.verify("brokeruser", "password"));
        assert!(!creds.verify("brokeruser", "password2"));
        assert!(!creds.verify("brokeruse", "password"));
        assert!(!creds.verify("", ""));
    }

    #[test]
    fn test_rejected_credentials() {
        let creds = BrokerCredentials::new("brokeruser", "password");
        assert!(!creds.matches_header(&header_for("brokeruser", "wrong")));
        assert!(!creds.matches_header(&header_for("other", "password")));
        assert!(!creds.matches_header("Bearer token"));
        assert!(!creds.matches_header("Basic !!!not-base64"));
        assert!(!creds.matches_header(&format!("Basic {}", STANDARD.encode("nocolon"))));
        assert!(!creds.matches_header(""));
    }
}
