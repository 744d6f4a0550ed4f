//! access token (HS256 JWT) 検証 → AuthContext を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` 以外は 401 (handler は呼ばれない)
//! - 検証成功時は既存の AuthContext から派生させた context を入れ直す

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthContext;
use crate::error::AppError;
use crate::state::AppState;

/// 認証必須の Router に middleware を適用する。
///
/// ```ignore
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = match state.auth.authenticate(req.headers()) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                error = %err,
                method = %req.method(),
                path = %req.uri().path(),
                "access token verification failed"
            );
            return Err(AppError::Auth(err));
        }
    };

    tracing::debug!(subject_id = %claims.subject_id, role = %claims.role, "access token verified");

    // middleware → extractor への受け渡し
    let base = req
        .extensions()
        .get::<AuthContext>()
        .cloned()
        .unwrap_or_default();
    req.extensions_mut().insert(base.with_claims(claims));

    Ok(next.run(req).await)
}
