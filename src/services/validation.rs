//! Field validation for profile input.
//!
//! Every rule runs; the result is the full list of violations, not the first one.

use std::fmt;

use serde::Serialize;

use crate::repos::{Address, NewProfile, ProfileChanges};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Required,
    Length,
    Charset,
    Format,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub rule: Rule,
    pub message: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, rule: Rule, message: &'static str) {
        self.0.push(Violation {
            field,
            rule,
            message,
        });
    }

    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn contains(&self, field: &str, rule: Rule) -> bool {
        self.0.iter().any(|v| v.field == field && v.rule == rule)
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.iter().map(|v| v.field).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 30;
const NAME_MAX: usize = 50;
const AVATAR_MAX: usize = 256;

fn username(errors: &mut ValidationErrors, value: &str) {
    let value = value.trim();
    let len = value.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        errors.push(
            "username",
            Rule::Length,
            "username must be between 3 and 30 characters",
        );
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        errors.push(
            "username",
            Rule::Charset,
            "username can only contain letters, numbers, underscores, and hyphens",
        );
    }
}

fn name(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    let value = value.trim();
    let len = value.chars().count();
    if !(1..=NAME_MAX).contains(&len) {
        errors.push(field, Rule::Length, "name must be between 1 and 50 characters");
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_ascii_whitespace() || c == '-')
    {
        errors.push(
            field,
            Rule::Charset,
            "name can only contain letters, spaces, and hyphens",
        );
    }
}

// ^\+?[0-9]{10,15}$
fn phone_number(errors: &mut ValidationErrors, value: &str) {
    let value = value.trim();
    let digits = value.strip_prefix('+').unwrap_or(value);
    let ok = (10..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit());
    if !ok {
        errors.push("phone_number", Rule::Format, "invalid phone number format");
    }
}

fn address(errors: &mut ValidationErrors, value: &Address) {
    let required = [
        ("address.street", &value.street, "street is required"),
        ("address.city", &value.city, "city is required"),
        ("address.country", &value.country, "country is required"),
    ];
    for (field, v, message) in required {
        if v.trim().is_empty() {
            errors.push(field, Rule::Required, message);
        }
    }
}

fn avatar(errors: &mut ValidationErrors, value: &str) {
    if value.chars().count() > AVATAR_MAX {
        errors.push("avatar", Rule::Length, "avatar must be <= 256 chars");
    }
}

pub fn validate_new_profile(profile: &NewProfile) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    username(&mut errors, &profile.username);
    name(&mut errors, "first_name", &profile.first_name);
    name(&mut errors, "last_name", &profile.last_name);
    phone_number(&mut errors, &profile.phone_number);
    address(&mut errors, &profile.address);
    if let Some(v) = &profile.avatar {
        avatar(&mut errors, v);
    }

    errors.into_result()
}

pub fn validate_changes(changes: &ProfileChanges) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if let Some(v) = &changes.username {
        username(&mut errors, v);
    }
    if let Some(v) = &changes.first_name {
        name(&mut errors, "first_name", v);
    }
    if let Some(v) = &changes.last_name {
        name(&mut errors, "last_name", v);
    }
    if let Some(v) = &changes.phone_number {
        phone_number(&mut errors, v);
    }
    if let Some(v) = &changes.address {
        address(&mut errors, v);
    }
    if let Some(Some(v)) = &changes.avatar {
        avatar(&mut errors, v);
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_profile() -> NewProfile {
        NewProfile {
            auth_id: "sub-1".into(),
            email: "alice@example.com".into(),
            username: "alice_01".into(),
            first_name: "Alice".into(),
            last_name: "Smith-Jones".into(),
            phone_number: "+821012345678".into(),
            address: Address {
                street: "1 Main St".into(),
                city: "Seoul".into(),
                state: String::new(),
                postal_code: "04524".into(),
                country: "KR".into(),
            },
            avatar: None,
        }
    }

    #[test]
    fn valid_profile_passes() {
        assert_eq!(validate_new_profile(&valid_profile()), Ok(()));
    }

    #[test]
    fn every_invalid_field_is_reported() {
        let profile = NewProfile {
            username: "a!".into(),
            first_name: "".into(),
            last_name: "R2D2".into(),
            phone_number: "12345".into(),
            address: Address::default(),
            ..valid_profile()
        };

        let errors = validate_new_profile(&profile).unwrap_err();

        assert!(errors.contains("username", Rule::Length));
        assert!(errors.contains("username", Rule::Charset));
        assert!(errors.contains("first_name", Rule::Length));
        assert!(errors.contains("last_name", Rule::Charset));
        assert!(errors.contains("phone_number", Rule::Format));
        assert!(errors.contains("address.street", Rule::Required));
        assert!(errors.contains("address.city", Rule::Required));
        assert!(errors.contains("address.country", Rule::Required));
        assert_eq!(errors.violations().len(), 8);
    }

    #[test]
    fn username_bounds_count_characters_after_trimming() {
        let longest = "x".repeat(30);
        let too_long = "x".repeat(31);

        for ok in ["abc", "  abc  ", "a-b_c", longest.as_str()] {
            let p = NewProfile {
                username: ok.to_string(),
                ..valid_profile()
            };
            assert_eq!(validate_new_profile(&p), Ok(()), "{ok:?}");
        }
        for bad in ["ab", too_long.as_str()] {
            let p = NewProfile {
                username: bad.to_string(),
                ..valid_profile()
            };
            assert!(validate_new_profile(&p).unwrap_err().contains("username", Rule::Length));
        }
    }

    #[test]
    fn names_only_accept_ascii_spaces() {
        let spaced = NewProfile {
            first_name: "Mary Ann".into(),
            ..valid_profile()
        };
        assert_eq!(validate_new_profile(&spaced), Ok(()));

        for first_name in ["Mary\u{00A0}Ann", "Mary\u{3000}Ann"] {
            let profile = NewProfile {
                first_name: first_name.into(),
                ..valid_profile()
            };
            let errors = validate_new_profile(&profile).unwrap_err();
            assert!(errors.contains("first_name", Rule::Charset), "{first_name:?}");
        }
    }

    #[test]
    fn phone_number_format() {
        for ok in ["0101234567", "+821012345678", "123456789012345"] {
            let p = NewProfile {
                phone_number: ok.into(),
                ..valid_profile()
            };
            assert_eq!(validate_new_profile(&p), Ok(()), "{ok}");
        }
        for bad in ["010-1234-5678", "+", "++1234567890", "1234567890123456", "abcdefghij"] {
            let p = NewProfile {
                phone_number: bad.into(),
                ..valid_profile()
            };
            assert!(
                validate_new_profile(&p)
                    .unwrap_err()
                    .contains("phone_number", Rule::Format),
                "{bad}"
            );
        }
    }

    #[test]
    fn changes_only_validate_present_fields() {
        assert_eq!(validate_changes(&ProfileChanges::default()), Ok(()));

        let changes = ProfileChanges {
            last_name: Some("O'Brien".into()),
            avatar: Some(Some("x".repeat(257))),
            ..Default::default()
        };
        let errors = validate_changes(&changes).unwrap_err();
        assert!(errors.contains("last_name", Rule::Charset));
        assert!(errors.contains("avatar", Rule::Length));
        assert_eq!(errors.violations().len(), 2);

        let clear_avatar = ProfileChanges {
            avatar: Some(None),
            ..Default::default()
        };
        assert_eq!(validate_changes(&clear_avatar), Ok(()));
    }
}
