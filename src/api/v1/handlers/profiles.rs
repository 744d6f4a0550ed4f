/*
 * Responsibility
 * - /users, /public/users 系 handler
 * - Path/Query/Json を extractor で受け、ProfileService 呼び出し → DTO に詰め替え
 * - 認可 (owner-or-admin) と validation は service 側
 */
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::profiles::{
            CreateProfileRequest, MessageResponse, ProfileResponse, SearchQuery,
            UpdateProfileRequest,
        },
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

pub(crate) fn parse_profile_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request("invalid profile id"))
}

pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

pub(crate) fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

pub async fn create_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(claims): AuthCtxExtractor,
    payload: Result<Json<CreateProfileRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProfileResponse>), AppError> {
    let req = json_body(payload)?;
    let row = state.profiles.create_profile(&claims, req.into()).await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_my_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(claims): AuthCtxExtractor,
) -> Result<Json<ProfileResponse>, AppError> {
    let row = state.profiles.get_own_profile(&claims).await?;
    Ok(Json(row.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(claims): AuthCtxExtractor,
    Path(profile_id): Path<String>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_profile_id(&profile_id)?;
    let req = json_body(payload)?;

    state
        .profiles
        .update_profile(&claims, id, req.into())
        .await?;

    Ok(Json(MessageResponse {
        message: "Profile updated successfully",
    }))
}

pub async fn delete_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(claims): AuthCtxExtractor,
    Path(profile_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_profile_id(&profile_id)?;
    state.profiles.delete_profile(&claims, id).await?;

    Ok(Json(MessageResponse {
        message: "Profile deleted successfully",
    }))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let id = parse_profile_id(&profile_id)?;
    let row = state.profiles.get_profile(id).await?;
    Ok(Json(row.into()))
}

pub async fn get_profile_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let row = state.profiles.get_profile_by_username(&username).await?;
    Ok(Json(row.into()))
}

pub async fn search_profiles(
    State(state): State<AppState>,
    params: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<ProfileResponse>>, AppError> {
    let query = query_params(params)?;
    let rows = state.profiles.search_profiles(&query.q).await?;
    Ok(Json(rows.into_iter().map(ProfileResponse::from).collect()))
}
