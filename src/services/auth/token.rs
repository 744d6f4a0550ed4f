//! HS256 access-token codec.
//!
//! Wire format: compact JWS `header.payload.signature`, payload
//! `{user_id, email, role, exp, iat, nbf}`.
//!
//! The signing algorithm is pinned here. The `alg` a token advertises is only
//! compared against the pinned one and never used to pick a verifier.
//! The shared secret is always passed in by the caller; the codec keeps none.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::claims::{Claims, Identity, Role};
use super::error::TokenError;

pub const PINNED_ALGORITHM: Algorithm = Algorithm::HS256;
const PINNED_ALGORITHM_NAME: &str = "HS256";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireClaims {
    user_id: String,
    email: String,
    role: Role,
    exp: i64,
    iat: i64,
    nbf: i64,
}

impl TryFrom<WireClaims> for Claims {
    type Error = TokenError;

    fn try_from(wire: WireClaims) -> Result<Self, Self::Error> {
        if wire.user_id.trim().is_empty() || wire.exp <= wire.iat {
            return Err(TokenError::Malformed);
        }

        let at = |secs: i64| DateTime::<Utc>::from_timestamp(secs, 0).ok_or(TokenError::Malformed);

        Ok(Claims {
            issued_at: at(wire.iat)?,
            expires_at: at(wire.exp)?,
            not_before: at(wire.nbf)?,
            subject_id: wire.user_id,
            email: wire.email,
            role: wire.role,
        })
    }
}

#[derive(Clone, Debug)]
pub struct TokenCodec {
    validation: Validation,
}

impl Default for TokenCodec {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TokenCodec {
    /// `leeway_seconds` widens both the `exp` and `nbf` checks.
    pub fn new(leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(PINNED_ALGORITHM);
        validation.leeway = leeway_seconds;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "iat", "nbf"]);

        Self { validation }
    }

    pub fn sign(
        &self,
        identity: &Identity,
        secret: &[u8],
        ttl: Duration,
    ) -> Result<String, TokenError> {
        self.sign_at(identity, secret, ttl, Utc::now())
    }

    /// Sign with an explicit clock: `iat = nbf = now`, `exp = now + ttl`.
    pub fn sign_at(
        &self,
        identity: &Identity,
        secret: &[u8],
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let ttl_secs = i64::try_from(ttl.as_secs()).map_err(|_| TokenError::InvalidTtl)?;
        if ttl_secs == 0 {
            return Err(TokenError::InvalidTtl);
        }

        let iat = now.timestamp();
        let exp = iat.checked_add(ttl_secs).ok_or(TokenError::InvalidTtl)?;

        let claims = WireClaims {
            user_id: identity.subject_id.clone(),
            email: identity.email.clone(),
            role: identity.role,
            exp,
            iat,
            nbf: iat,
        };

        jsonwebtoken::encode(
            &Header::new(PINNED_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| {
            error!(error = %e, "failed to sign access token");
            TokenError::Encode
        })
    }

    pub fn verify(&self, token: &str, secret: &[u8]) -> Result<Claims, TokenError> {
        let segments: Vec<&str> = token.split('.').collect();
        let [header, _, _] = segments.as_slice() else {
            return Err(TokenError::Malformed);
        };

        ensure_pinned_algorithm(header)?;

        let data = jsonwebtoken::decode::<WireClaims>(
            token,
            &DecodingKey::from_secret(secret),
            &self.validation,
        )
        .map_err(classify)?;

        Claims::try_from(data.claims)
    }
}

fn ensure_pinned_algorithm(header_segment: &str) -> Result<(), TokenError> {
    let raw = URL_SAFE_NO_PAD
        .decode(header_segment)
        .map_err(|_| TokenError::Malformed)?;
    let header: serde_json::Value =
        serde_json::from_slice(&raw).map_err(|_| TokenError::Malformed)?;

    match header.get("alg").and_then(|v| v.as_str()) {
        Some(PINNED_ALGORITHM_NAME) => Ok(()),
        Some(_) => Err(TokenError::InvalidSignature),
        None => Err(TokenError::Malformed),
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::ImmatureSignature => TokenError::NotYetValid,
        _ => TokenError::Malformed,
    }
}
