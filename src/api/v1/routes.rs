/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - public (認証なし) / users (bearer 必須) / admin (bearer + admin role) を merge
 * - 認証 middleware はここで範囲ごとに適用する
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::api::v1::handlers::{
    admin::list_profiles,
    profiles::{
        create_profile, delete_profile, get_my_profile, get_profile, get_profile_by_username,
        search_profiles, update_profile,
    },
};
use crate::middleware::auth::{access, role::require_role};
use crate::services::auth::Role;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    // `/search` と `/username/..` は `/{id}` より具体的なので先にマッチする
    let public = Router::new()
        .route("/public/users/search", get(search_profiles))
        .route(
            "/public/users/username/{username}",
            get(get_profile_by_username),
        )
        .route("/public/users/{id}", get(get_profile));

    let users = Router::new()
        .route("/users", post(create_profile))
        .route("/users/me", get(get_my_profile))
        .route("/users/{id}", put(update_profile).delete(delete_profile));
    let users = access::apply(users, state.clone());

    let admin = Router::new().route("/admin/users", get(list_profiles));
    let admin = require_role(admin, state, Role::Admin);

    public.merge(users).merge(admin)
}
