/*
 * Responsibility
 * - Profile use cases (create / read / update / soft delete / search / admin listing)
 * - Runs the ownership policy and validation before touching the repo
 * - Handlers stay thin: they only map DTOs in and out
 */
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::repos::{NewProfile, ProfileChanges, ProfileRepo, ProfileRow};
use crate::services::auth::Claims;
use crate::services::policy::{self, ProfileAction};
use crate::services::validation;

pub const SEARCH_LIMIT: i64 = 20;
pub const SEARCH_MIN_CHARS: usize = 2;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Caller-supplied fields of a new profile. Ownership and email come from the verified claims.
#[derive(Debug, Clone, Default)]
pub struct ProfileDraft {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: crate::repos::Address,
    pub avatar: Option<String>,
}

#[derive(Clone)]
pub struct ProfileService {
    repo: Arc<dyn ProfileRepo>,
}

impl std::fmt::Debug for ProfileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileService").finish_non_exhaustive()
    }
}

impl ProfileService {
    pub fn new(repo: Arc<dyn ProfileRepo>) -> Self {
        Self { repo }
    }

    pub async fn create_profile(
        &self,
        claims: &Claims,
        draft: ProfileDraft,
    ) -> Result<ProfileRow, AppError> {
        let profile = NewProfile {
            auth_id: claims.subject_id.clone(),
            email: claims.email.clone(),
            username: draft.username.trim().to_string(),
            first_name: draft.first_name,
            last_name: draft.last_name,
            phone_number: draft.phone_number,
            address: draft.address,
            avatar: draft.avatar,
        };
        validation::validate_new_profile(&profile)?;

        if self
            .repo
            .get_profile_by_username(&profile.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("username already exists"));
        }
        if self
            .repo
            .get_profile_by_auth_id(&profile.auth_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("profile already exists"));
        }

        let row = self.repo.create(&profile).await?;
        info!(profile_id = %row.id, auth_id = %row.auth_id, "profile created");
        Ok(row)
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<ProfileRow, AppError> {
        self.repo
            .get_profile_by_id(id)
            .await?
            .ok_or(AppError::not_found("profile"))
    }

    pub async fn get_profile_by_username(&self, username: &str) -> Result<ProfileRow, AppError> {
        self.repo
            .get_profile_by_username(username)
            .await?
            .ok_or(AppError::not_found("profile"))
    }

    pub async fn get_own_profile(&self, claims: &Claims) -> Result<ProfileRow, AppError> {
        self.repo
            .get_profile_by_auth_id(&claims.subject_id)
            .await?
            .ok_or(AppError::not_found("profile"))
    }

    /// Ownership is checked before the payload is validated, so non-owners learn nothing about it.
    pub async fn update_profile(
        &self,
        claims: &Claims,
        id: Uuid,
        mut changes: ProfileChanges,
    ) -> Result<(), AppError> {
        changes.username = changes.username.map(|u| u.trim().to_string());

        let profile = self.get_profile(id).await?;
        policy::authorize(claims, &profile, ProfileAction::Update)?;

        validation::validate_changes(&changes)?;

        if let Some(username) = changes.username.as_deref()
            && let Some(existing) = self.repo.get_profile_by_username(username).await?
            && existing.id != id
        {
            return Err(AppError::Conflict("username already exists"));
        }

        if changes.is_empty() {
            debug!(profile_id = %id, "empty profile update, nothing to do");
            return Ok(());
        }

        self.repo
            .update(id, &changes)
            .await?
            .ok_or(AppError::not_found("profile"))?;

        info!(profile_id = %id, "profile updated");
        Ok(())
    }

    pub async fn delete_profile(&self, claims: &Claims, id: Uuid) -> Result<(), AppError> {
        let profile = self.get_profile(id).await?;
        policy::authorize(claims, &profile, ProfileAction::Delete)?;

        if !self.repo.soft_delete(id).await? {
            return Err(AppError::not_found("profile"));
        }

        info!(profile_id = %id, deleted_by = %claims.subject_id, "profile deactivated");
        Ok(())
    }

    pub async fn search_profiles(&self, query: &str) -> Result<Vec<ProfileRow>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::bad_request("Search query is required"));
        }
        if query.chars().count() < SEARCH_MIN_CHARS {
            return Err(AppError::bad_request(
                "search query must be at least 2 characters",
            ));
        }

        Ok(self.repo.search(query, SEARCH_LIMIT).await?)
    }

    /// `page` is 1-based; out-of-range values fall back to page 1 / 10 rows.
    pub async fn list_profiles(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<ProfileRow>, AppError> {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = limit
            .filter(|l| (1..=MAX_PAGE_SIZE).contains(l))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = (page - 1).saturating_mul(limit);

        Ok(self.repo.list(limit, offset).await?)
    }
}
