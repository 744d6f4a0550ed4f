/*
 * Responsibility
 * - Profiles の request/response DTO
 * - 形式チェックは services::validation 側 (ここでは変換のみ)
 * - auth_id / email は request から受け取らない (claims 由来)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::repos::{Address, ProfileChanges, ProfileRow, ProfileStatus};
use crate::services::profile_service::ProfileDraft;

// 欠けた field は空文字として validation に回す (Required/Length で報告される)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateProfileRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: Address,
    pub avatar: Option<String>,
}

impl From<CreateProfileRequest> for ProfileDraft {
    fn from(req: CreateProfileRequest) -> Self {
        ProfileDraft {
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            address: req.address,
            avatar: req.avatar,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<Address>,
    // Tri-state:
    // - None: field missing (do not update)
    // - Some(None): null (set NULL)
    // - Some(Some(v)): set value
    #[serde(default, deserialize_with = "double_option")]
    pub avatar: Option<Option<String>>,
}

fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileChanges {
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            address: req.address,
            avatar: req.avatar,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub auth_id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: Address,
    pub avatar: Option<String>,
    pub status: ProfileStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for ProfileResponse {
    fn from(row: ProfileRow) -> Self {
        let address = row.address();
        ProfileResponse {
            id: row.id,
            auth_id: row.auth_id,
            email: row.email,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            phone_number: row.phone_number,
            address,
            avatar: row.avatar,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_distinguishes_missing_null_and_value() {
        let missing: UpdateProfileRequest = serde_json::from_str(r#"{"first_name":"Kim"}"#).unwrap();
        assert_eq!(missing.avatar, None);

        let null: UpdateProfileRequest = serde_json::from_str(r#"{"avatar":null}"#).unwrap();
        assert_eq!(null.avatar, Some(None));

        let set: UpdateProfileRequest =
            serde_json::from_str(r#"{"avatar":"https://cdn.example.com/a.png"}"#).unwrap();
        assert_eq!(set.avatar, Some(Some("https://cdn.example.com/a.png".to_string())));
    }

    #[test]
    fn create_request_tolerates_missing_fields() {
        let req: CreateProfileRequest = serde_json::from_str(r#"{"username":"minji"}"#).unwrap();
        let draft = ProfileDraft::from(req);

        assert_eq!(draft.username, "minji");
        assert!(draft.address.street.is_empty());
        assert_eq!(draft.avatar, None);
    }
}
