/*
 * Responsibility
 * - App-wide ApiError (AppError)
 * - IntoResponse (HTTP status + `{"error": "..."}` JSON body)
 * - Converts auth / policy / repo / validation errors in one place
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;
use crate::services::policy::PolicyError;
use crate::services::validation::{ValidationErrors, Violation};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("validation failed")]
    Validation(ValidationErrors),
    #[error("{}", auth_message(.0))]
    Auth(AuthError),
    #[error(transparent)]
    Forbidden(#[from] PolicyError),
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("{0}")]
    Conflict(&'static str),
    #[error("internal server error")]
    Internal,
}

fn auth_message(err: &AuthError) -> String {
    match err {
        AuthError::RoleMismatch => "forbidden: insufficient permissions".to_string(),
        AuthError::OriginRejected => "forbidden: origin not allowed".to_string(),
        other => format!("unauthorized: {other}"),
    }
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(e) if e.is_forbidden() => StatusCode::FORBIDDEN,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Rejected origins get an empty 403; browsers only look at the status.
        if matches!(self, AppError::Auth(AuthError::OriginRejected)) {
            return status.into_response();
        }

        let body = ErrorResponse {
            error: self.to_string(),
            violations: match self {
                AppError::Validation(errors) => errors.violations().to_vec(),
                _ => Vec::new(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        AppError::Validation(e)
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::Conflict("profile already exists"),
            RepoError::Db(err) => {
                tracing::error!(error = %err, "repository failure");
                AppError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;
    use crate::services::auth::TokenError;
    use crate::services::policy::ProfileAction;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unauthenticated_errors_are_401_with_cause() {
        let (status, body) = body_json(AppError::Auth(AuthError::NoTokenFound)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({"error": "unauthorized: no token found"}));

        let (status, body) =
            body_json(AppError::Auth(AuthError::Token(TokenError::Expired))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized: token expired");

        let (status, _) = body_json(AppError::Auth(AuthError::NoClaims)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn role_mismatch_is_403() {
        let (status, body) = body_json(AppError::Auth(AuthError::RoleMismatch)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body,
            serde_json::json!({"error": "forbidden: insufficient permissions"})
        );
    }

    #[tokio::test]
    async fn ownership_violation_is_403_with_policy_message() {
        let (status, body) =
            body_json(PolicyError::Forbidden(ProfileAction::Update).into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body,
            serde_json::json!({"error": "Unauthorized to modify this profile"})
        );
    }

    #[tokio::test]
    async fn rejected_origin_has_empty_body() {
        let res = AppError::Auth(AuthError::OriginRejected).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }
}
