/*
 * Responsibility
 * - profiles table access (SQLx / Postgres)
 * - ProfileRepo trait so services can run against another store (in-memory in tests)
 * - Deletion is a soft delete (status -> inactive); rows are never removed
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

// Stored as TEXT (CHECK constraint in the migration), not a Postgres enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum ProfileStatus {
    Active,
    Inactive,
    Suspended,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    // Ownership link: subject id of the identity that created the profile.
    pub auth_id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub avatar: Option<String>,
    pub status: ProfileStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    pub fn address(&self) -> Address {
        Address {
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub auth_id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: Address,
    pub avatar: Option<String>,
}

/// Partial update. `None` leaves the column as is.
///
/// avatar tri-state:
/// - None: do not update
/// - Some(None): set NULL
/// - Some(Some(v)): set v
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<Address>,
    pub avatar: Option<Option<String>>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone_number.is_none()
            && self.address.is_none()
            && self.avatar.is_none()
    }
}

#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn create(&self, profile: &NewProfile) -> Result<ProfileRow, RepoError>;

    async fn get_profile_by_id(&self, id: Uuid) -> Result<Option<ProfileRow>, RepoError>;

    async fn get_profile_by_auth_id(&self, auth_id: &str) -> Result<Option<ProfileRow>, RepoError>;

    async fn get_profile_by_username(&self, username: &str)
    -> Result<Option<ProfileRow>, RepoError>;

    async fn update(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<ProfileRow>, RepoError>;

    // Returns false when no such profile exists.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepoError>;

    // Active profiles whose username / first name / last name contain `query` (case-insensitive).
    async fn search(&self, query: &str, limit: i64) -> Result<Vec<ProfileRow>, RepoError>;

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ProfileRow>, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgProfileRepo {
    pool: PgPool,
}

impl PgProfileRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COLUMNS: &str = r#"
    id, auth_id, email, username, first_name, last_name, phone_number,
    street, city, state, postal_code, country, avatar, status, created_at, updated_at
"#;

fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl ProfileRepo for PgProfileRepo {
    async fn create(&self, profile: &NewProfile) -> Result<ProfileRow, RepoError> {
        let sql = format!(
            r#"
            INSERT INTO profiles (
                auth_id, email, username, first_name, last_name, phone_number,
                street, city, state, postal_code, country, avatar, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(&profile.auth_id)
            .bind(&profile.email)
            .bind(&profile.username)
            .bind(&profile.first_name)
            .bind(&profile.last_name)
            .bind(&profile.phone_number)
            .bind(&profile.address.street)
            .bind(&profile.address.city)
            .bind(&profile.address.state)
            .bind(&profile.address.postal_code)
            .bind(&profile.address.country)
            .bind(profile.avatar.as_deref())
            .bind(ProfileStatus::Active)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn get_profile_by_id(&self, id: Uuid) -> Result<Option<ProfileRow>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");

        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn get_profile_by_auth_id(&self, auth_id: &str) -> Result<Option<ProfileRow>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM profiles WHERE auth_id = $1");

        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(auth_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn get_profile_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ProfileRow>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM profiles WHERE username = $1");

        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<ProfileRow>, RepoError> {
        // $6 / $12 are "set this group" flags, same trick as a nullable tri-state column.
        let sql = format!(
            r#"
            UPDATE profiles
            SET
                username = COALESCE($2, username),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                phone_number = COALESCE($5, phone_number),
                street = CASE WHEN $6 THEN $7 ELSE street END,
                city = CASE WHEN $6 THEN $8 ELSE city END,
                state = CASE WHEN $6 THEN $9 ELSE state END,
                postal_code = CASE WHEN $6 THEN $10 ELSE postal_code END,
                country = CASE WHEN $6 THEN $11 ELSE country END,
                avatar = CASE WHEN $12 THEN $13 ELSE avatar END,
                updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        let address = changes.address.as_ref();

        sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(id)
            .bind(changes.username.as_deref())
            .bind(changes.first_name.as_deref())
            .bind(changes.last_name.as_deref())
            .bind(changes.phone_number.as_deref())
            .bind(address.is_some())
            .bind(address.map(|a| a.street.as_str()))
            .bind(address.map(|a| a.city.as_str()))
            .bind(address.map(|a| a.state.as_str()))
            .bind(address.map(|a| a.postal_code.as_str()))
            .bind(address.map(|a| a.country.as_str()))
            .bind(changes.avatar.is_some())
            .bind(changes.avatar.clone().flatten())
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET status = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(ProfileStatus::Inactive)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<ProfileRow>, RepoError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM profiles
            WHERE status = $1
              AND (username ILIKE $2 OR first_name ILIKE $2 OR last_name ILIKE $2)
            ORDER BY username ASC
            LIMIT $3
            "#
        );

        let rows = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(ProfileStatus::Active)
            .bind(like_pattern(query))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ProfileRow>, RepoError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM profiles
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        );

        let rows = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
