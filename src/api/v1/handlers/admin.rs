/*
 * Responsibility
 * - /admin 系 handler (role gate は routes 側で適用済み)
 */
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::{
    api::v1::{
        dto::profiles::{ListQuery, ProfileResponse},
        handlers::profiles::query_params,
    },
    error::AppError,
    state::AppState,
};

pub async fn list_profiles(
    State(state): State<AppState>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<ProfileResponse>>, AppError> {
    let query = query_params(params)?;
    let rows = state
        .profiles
        .list_profiles(query.page, query.limit)
        .await?;

    Ok(Json(rows.into_iter().map(ProfileResponse::from).collect()))
}
