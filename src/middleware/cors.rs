//! CORS policy for browser clients.
//!
//! Note:
//! - CORS is enforced by browsers. Native mobile apps and server-to-server calls are not
//!   restricted by CORS.
//! - This middleware should be applied at the Router level (not inside handlers).
//!
//! Policy:
//! - Origins are matched exactly, by `*`, or by `*.<domain>` (suffix match on `.<domain>`).
//! - A request from an origin outside the policy is answered with an empty 403.
//! - Preflight (`OPTIONS` with `Origin`) is answered here with 204; handlers never see it.
//! - Requests without `Origin` pass through untouched.
//!
//! `tower_http::cors::CorsLayer` silently omits headers for unknown origins instead of
//! rejecting them, so the policy is enforced by this middleware.

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::AuthError;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPattern {
    Any,
    Exact(String),
    /// Stored with the leading dot (`.example.com`).
    Subdomain(String),
}

impl OriginPattern {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == "*" {
            OriginPattern::Any
        } else if let Some(domain) = raw.strip_prefix("*.") {
            OriginPattern::Subdomain(format!(".{domain}"))
        } else {
            OriginPattern::Exact(raw.to_string())
        }
    }

    pub fn matches(&self, origin: &str) -> bool {
        match self {
            OriginPattern::Any => true,
            OriginPattern::Exact(allowed) => allowed == origin,
            OriginPattern::Subdomain(suffix) => origin.ends_with(suffix.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origins: Vec<OriginPattern>,
    methods: Vec<Method>,
    headers: Vec<HeaderName>,
    max_age: Duration,
    allow_credentials: bool,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            origins: vec![OriginPattern::Any],
            methods: vec![
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ],
            headers: vec![
                header::ACCEPT,
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                HeaderName::from_static("x-csrf-token"),
                HeaderName::from_static("x-request-id"),
            ],
            max_age: Duration::from_secs(86_400),
            allow_credentials: true,
        }
    }
}

impl CorsPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self::default()
            .with_origins(config.cors_allowed_origins.iter().map(String::as_str))
            .with_max_age(Duration::from_secs(config.cors_max_age_seconds))
    }

    /// Replaces the origin set. An empty set rejects every cross-origin request.
    pub fn with_origins<'a>(mut self, origins: impl IntoIterator<Item = &'a str>) -> Self {
        // Empty is deny-all, not allow-all. Allowing everything needs an explicit "*".
        self.origins = origins.into_iter().map(OriginPattern::parse).collect();
        self
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = HeaderName>) -> Self {
        self.headers = headers.into_iter().collect();
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_credentials(mut self, allow: bool) -> Self {
        self.allow_credentials = allow;
        self
    }

    pub fn is_allowed_origin(&self, origin: &str) -> bool {
        self.origins.iter().any(|p| p.matches(origin))
    }

    fn joined_methods(&self) -> String {
        self.methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn joined_headers(&self) -> String {
        self.headers
            .iter()
            .map(HeaderName::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn apply_origin_headers(&self, headers: &mut HeaderMap, origin: &HeaderValue) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        if self.allow_credentials {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
    }

    fn preflight(&self, origin: &HeaderValue) -> Response {
        let mut res = StatusCode::NO_CONTENT.into_response();
        let headers = res.headers_mut();

        self.apply_origin_headers(headers, origin);
        if let Ok(v) = HeaderValue::from_str(&self.joined_methods()) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, v);
        }
        if let Ok(v) = HeaderValue::from_str(&self.joined_headers()) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, v);
        }
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from(self.max_age.as_secs()),
        );
        for vary in [
            header::ORIGIN,
            header::ACCESS_CONTROL_REQUEST_METHOD,
            header::ACCESS_CONTROL_REQUEST_HEADERS,
        ] {
            headers.append(header::VARY, HeaderValue::from(vary));
        }

        res
    }
}

/// Apply the CORS policy held in `AppState` to the given Router.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, cors_middleware))
}

async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    enforce(&state.cors, req, next).await
}

async fn enforce(policy: &CorsPolicy, req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let Some(origin) = req.headers().get(header::ORIGIN).cloned() else {
        return Ok(next.run(req).await);
    };

    let allowed = origin
        .to_str()
        .map(|o| policy.is_allowed_origin(o))
        .unwrap_or(false);
    if !allowed {
        tracing::warn!(origin = ?origin, path = %req.uri().path(), "cors origin rejected");
        return Err(AuthError::OriginRejected.into());
    }

    if req.method() == Method::OPTIONS {
        tracing::debug!(origin = ?origin, "cors preflight");
        return Ok(policy.preflight(&origin));
    }

    let mut res = next.run(req).await;
    let headers = res.headers_mut();
    policy.apply_origin_headers(headers, &origin);
    headers.append(header::VARY, HeaderValue::from(header::ORIGIN));

    Ok(res)
}
