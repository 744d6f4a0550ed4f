//! Role gate.
//!
//! Verifies the bearer token on its own (it does not rely on `access::apply`
//! having run) and then requires `claims.role == role` exactly.
//! - no / bad token → 401
//! - wrong role → 403

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
use crate::services::auth::{AuthError, Role};
use crate::state::AppState;

#[derive(Clone)]
struct RoleGate {
    state: AppState,
    role: Role,
}

pub fn require_role(router: Router<AppState>, state: AppState, role: Role) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(
        RoleGate { state, role },
        role_middleware,
    ))
}

async fn role_middleware(
    State(gate): State<RoleGate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = gate.state.auth.authenticate(req.headers()).map_err(|err| {
        tracing::warn!(error = %err, path = %req.uri().path(), "access token verification failed");
        AppError::Auth(err)
    })?;

    if !claims.has_role(gate.role) {
        tracing::warn!(
            subject_id = %claims.subject_id,
            role = %claims.role,
            required = %gate.role,
            "role denied"
        );
        return Err(AuthError::RoleMismatch.into());
    }

    let base = req
        .extensions()
        .get::<AuthContext>()
        .cloned()
        .unwrap_or_default();
    req.extensions_mut().insert(base.with_claims(claims));

    Ok(next.run(req).await)
}
