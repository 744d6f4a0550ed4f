/*
 * Responsibility
 * - Object-level authorization for profiles (who may touch which row)
 * - Coarse role gating lives in middleware::auth::role; this is the per-resource check
 */
use thiserror::Error;

use crate::repos::ProfileRow;
use crate::services::auth::{Claims, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileAction {
    Update,
    Delete,
}

impl ProfileAction {
    fn verb(&self) -> &'static str {
        match self {
            ProfileAction::Update => "modify",
            ProfileAction::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("Unauthorized to {} this profile", .0.verb())]
    Forbidden(ProfileAction),
}

/// - Update: owner only (no admin bypass)
/// - Delete: owner or admin
pub fn authorize(
    claims: &Claims,
    profile: &ProfileRow,
    action: ProfileAction,
) -> Result<(), PolicyError> {
    let is_owner = claims.is_subject(&profile.auth_id);

    let allowed = match action {
        ProfileAction::Update => is_owner,
        ProfileAction::Delete => is_owner || claims.has_role(Role::Admin),
    };

    if allowed {
        Ok(())
    } else {
        Err(PolicyError::Forbidden(action))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::repos::ProfileStatus;

    fn claims(subject_id: &str, role: Role) -> Claims {
        let now = Utc::now();
        Claims {
            subject_id: subject_id.to_string(),
            email: "someone@example.com".to_string(),
            role,
            issued_at: now,
            expires_at: now + Duration::hours(1),
            not_before: now,
        }
    }

    fn profile_owned_by(auth_id: &str) -> ProfileRow {
        let now = Utc::now();
        ProfileRow {
            id: Uuid::new_v4(),
            auth_id: auth_id.to_string(),
            email: "owner@example.com".to_string(),
            username: "owner".to_string(),
            first_name: "Owen".to_string(),
            last_name: "Er".to_string(),
            phone_number: "0101234567".to_string(),
            street: "1 Main St".to_string(),
            city: "Busan".to_string(),
            state: String::new(),
            postal_code: String::new(),
            country: "KR".to_string(),
            avatar: None,
            status: ProfileStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owner_may_update_and_delete() {
        let profile = profile_owned_by("user-a");
        let owner = claims("user-a", Role::User);

        assert_eq!(authorize(&owner, &profile, ProfileAction::Update), Ok(()));
        assert_eq!(authorize(&owner, &profile, ProfileAction::Delete), Ok(()));
    }

    #[test]
    fn admin_may_delete_but_not_update_someone_elses_profile() {
        let profile = profile_owned_by("user-a");
        let admin = claims("admin-1", Role::Admin);

        assert_eq!(authorize(&admin, &profile, ProfileAction::Delete), Ok(()));
        assert_eq!(
            authorize(&admin, &profile, ProfileAction::Update),
            Err(PolicyError::Forbidden(ProfileAction::Update))
        );
    }

    #[test]
    fn stranger_is_forbidden_with_action_specific_message() {
        let profile = profile_owned_by("user-a");
        let stranger = claims("user-b", Role::Seller);

        let update = authorize(&stranger, &profile, ProfileAction::Update).unwrap_err();
        let delete = authorize(&stranger, &profile, ProfileAction::Delete).unwrap_err();

        assert_eq!(update.to_string(), "Unauthorized to modify this profile");
        assert_eq!(delete.to_string(), "Unauthorized to delete this profile");
    }

    #[test]
    fn subject_match_is_exact() {
        let profile = profile_owned_by("User-A");
        let lookalike = claims("user-a", Role::User);

        assert!(authorize(&lookalike, &profile, ProfileAction::Update).is_err());
    }
}
