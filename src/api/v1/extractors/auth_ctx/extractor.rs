use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::Claims;

use super::AuthContext;

/// Handler-side access to the verified claims.
/// Assumes the auth middleware already inserted an `AuthContext` into request extensions.
/// Missing context (route not behind the middleware) is `NoClaims` -> 401.
pub struct AuthCtxExtractor(pub Claims);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .unwrap_or_default();

        let claims = ctx.claims_of().map_err(AppError::Auth)?;
        Ok(AuthCtxExtractor(claims.clone()))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::services::auth::{AuthError, Role};

    #[tokio::test]
    async fn reads_claims_inserted_by_middleware() {
        let now = Utc::now();
        let claims = Claims {
            subject_id: "auth-1".to_string(),
            email: "auth-1@example.com".to_string(),
            role: Role::User,
            issued_at: now,
            expires_at: now + Duration::minutes(5),
            not_before: now,
        };
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        parts
            .extensions
            .insert(AuthContext::default().with_claims(claims.clone()));

        let AuthCtxExtractor(got) = AuthCtxExtractor::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(got, claims);
    }

    #[tokio::test]
    async fn missing_context_is_no_claims() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();

        let err = AuthCtxExtractor::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Auth(AuthError::NoClaims)));
    }
}
