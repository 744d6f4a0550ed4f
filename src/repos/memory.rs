//! In-memory `ProfileRepo` for router and service tests.
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::repos::profile_repo::{
    NewProfile, ProfileChanges, ProfileRepo, ProfileRow, ProfileStatus,
};

#[derive(Debug, Default)]
pub struct MemoryProfileRepo {
    rows: Mutex<Vec<ProfileRow>>,
}

impl MemoryProfileRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> std::sync::MutexGuard<'_, Vec<ProfileRow>> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl ProfileRepo for MemoryProfileRepo {
    async fn create(&self, profile: &NewProfile) -> Result<ProfileRow, RepoError> {
        let mut rows = self.rows();
        if rows
            .iter()
            .any(|r| r.username == profile.username || r.auth_id == profile.auth_id)
        {
            return Err(RepoError::Conflict);
        }

        let now = Utc::now();
        let row = ProfileRow {
            id: Uuid::new_v4(),
            auth_id: profile.auth_id.clone(),
            email: profile.email.clone(),
            username: profile.username.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            phone_number: profile.phone_number.clone(),
            street: profile.address.street.clone(),
            city: profile.address.city.clone(),
            state: profile.address.state.clone(),
            postal_code: profile.address.postal_code.clone(),
            country: profile.address.country.clone(),
            avatar: profile.avatar.clone(),
            status: ProfileStatus::Active,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn get_profile_by_id(&self, id: Uuid) -> Result<Option<ProfileRow>, RepoError> {
        Ok(self.rows().iter().find(|r| r.id == id).cloned())
    }

    async fn get_profile_by_auth_id(&self, auth_id: &str) -> Result<Option<ProfileRow>, RepoError> {
        Ok(self.rows().iter().find(|r| r.auth_id == auth_id).cloned())
    }

    async fn get_profile_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ProfileRow>, RepoError> {
        Ok(self.rows().iter().find(|r| r.username == username).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<ProfileRow>, RepoError> {
        let mut rows = self.rows();

        if let Some(username) = &changes.username
            && rows.iter().any(|r| r.id != id && &r.username == username)
        {
            return Err(RepoError::Conflict);
        }

        let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        if let Some(v) = &changes.username {
            row.username = v.clone();
        }
        if let Some(v) = &changes.first_name {
            row.first_name = v.clone();
        }
        if let Some(v) = &changes.last_name {
            row.last_name = v.clone();
        }
        if let Some(v) = &changes.phone_number {
            row.phone_number = v.clone();
        }
        if let Some(a) = &changes.address {
            row.street = a.street.clone();
            row.city = a.city.clone();
            row.state = a.state.clone();
            row.postal_code = a.postal_code.clone();
            row.country = a.country.clone();
        }
        if let Some(v) = &changes.avatar {
            row.avatar = v.clone();
        }
        row.updated_at = Utc::now();

        Ok(Some(row.clone()))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut rows = self.rows();
        match rows.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.status = ProfileStatus::Inactive;
                row.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<ProfileRow>, RepoError> {
        let mut hits: Vec<ProfileRow> = self
            .rows()
            .iter()
            .filter(|r| r.status == ProfileStatus::Active)
            .filter(|r| {
                contains_ci(&r.username, query)
                    || contains_ci(&r.first_name, query)
                    || contains_ci(&r.last_name, query)
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.username.cmp(&b.username));
        hits.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(hits)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ProfileRow>, RepoError> {
        let mut rows: Vec<ProfileRow> = self.rows().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }
}
