use std::{fmt, sync::Arc, time::Duration};

use axum::http::{HeaderMap, header};

use super::claims::{Claims, Identity};
use super::error::{AuthError, TokenError};
use super::token::TokenCodec;

/// Bearer-token verifier used by the auth middleware.
///
/// Holds the shared HS256 secret (configuration, shared out of band with the
/// issuing auth service) and the codec. Key material is not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    codec: TokenCodec,
    secret: Arc<[u8]>,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(secret: &str, leeway_seconds: u64) -> Self {
        Self {
            codec: TokenCodec::new(leeway_seconds),
            secret: Arc::from(secret.as_bytes()),
        }
    }

    /// Extract `Authorization: Bearer <token>` and verify it.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let token = extract_bearer(headers)?;
        self.verify(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        Ok(self.codec.verify(token, &self.secret)?)
    }

    /// Mint a token with the shared secret (dev tooling and tests; production tokens come from the auth service).
    pub fn issue(&self, identity: &Identity, ttl: Duration) -> Result<String, TokenError> {
        self.codec.sign(identity, &self.secret, ttl)
    }
}

/// Only `Bearer <token>`: exactly two space-separated parts, the first literally `Bearer`.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::NoTokenFound)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::NoTokenFound),
    }
}
