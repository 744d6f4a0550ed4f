/*
 * Responsibility
 * - The "verified request context" type seen by handlers
 * - The auth middleware derives it and stores it in request extensions;
 *   handlers only ever read it
 *
 * Notes
 * - Anonymous (no claims) and Authenticated are distinct states. A role
 *   mismatch is decided by the role gate, never encoded here.
 */
use std::sync::Arc;

use crate::services::auth::{AuthError, Claims};

#[derive(Debug, Clone, Default)]
pub enum AuthContext {
    #[default]
    Anonymous,
    Authenticated(Arc<Claims>),
}

impl AuthContext {
    /// Derive a context that resolves to `claims`. `self` is left untouched.
    pub fn with_claims(&self, claims: Claims) -> Self {
        AuthContext::Authenticated(Arc::new(claims))
    }

    pub fn claims_of(&self) -> Result<&Claims, AuthError> {
        match self {
            AuthContext::Authenticated(claims) => Ok(claims),
            AuthContext::Anonymous => Err(AuthError::NoClaims),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthContext::Authenticated(_))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::services::auth::Role;

    fn claims(subject_id: &str) -> Claims {
        let now = Utc::now();
        Claims {
            subject_id: subject_id.to_string(),
            email: format!("{subject_id}@example.com"),
            role: Role::User,
            issued_at: now,
            expires_at: now + Duration::minutes(5),
            not_before: now,
        }
    }

    #[test]
    fn anonymous_context_has_no_claims() {
        let ctx = AuthContext::default();
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.claims_of(), Err(AuthError::NoClaims));
    }

    #[test]
    fn with_claims_derives_without_touching_base() {
        let base = AuthContext::Anonymous;
        let expected = claims("u-1");
        let derived = base.with_claims(expected.clone());

        assert_eq!(derived.claims_of(), Ok(&expected));
        assert_eq!(base.claims_of(), Err(AuthError::NoClaims));
    }

    #[test]
    fn child_of_authenticated_context_resolves_to_newest_claims() {
        let first = AuthContext::Anonymous.with_claims(claims("u-1"));
        let second = first.with_claims(claims("u-2"));

        assert_eq!(first.claims_of().unwrap().subject_id, "u-1");
        assert_eq!(second.claims_of().unwrap().subject_id, "u-2");
    }
}
