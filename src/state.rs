/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - profiles: ProfileService, auth: AuthService, cors: CorsPolicy
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::middleware::cors::CorsPolicy;
use crate::services::{auth::AuthService, profile_service::ProfileService};

#[derive(Clone, Debug)]
pub struct AppState {
    pub profiles: ProfileService,
    pub auth: Arc<AuthService>,
    pub cors: Arc<CorsPolicy>,
}

impl AppState {
    pub fn new(profiles: ProfileService, auth: Arc<AuthService>, cors: Arc<CorsPolicy>) -> Self {
        Self {
            profiles,
            auth,
            cors,
        }
    }
}
