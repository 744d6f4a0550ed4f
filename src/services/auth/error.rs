use thiserror::Error;

/// Errors from signing / verifying an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
    #[error("token ttl must be at least one second")]
    InvalidTtl,
    #[error("failed to encode token")]
    Encode,
}

/// Errors raised while authenticating / authorizing one request.
///
/// `NoTokenFound`, `Token(_)` and `NoClaims` mean "not authenticated" (401).
/// `RoleMismatch` and `OriginRejected` mean "authenticated or identified, but not allowed" (403).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no token found")]
    NoTokenFound,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("no claims in request context")]
    NoClaims,
    #[error("insufficient permissions")]
    RoleMismatch,
    #[error("origin not allowed")]
    OriginRejected,
}

impl AuthError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, AuthError::RoleMismatch | AuthError::OriginRejected)
    }
}
