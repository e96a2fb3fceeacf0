use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::users::{EditCsrNoteEntity, EditUserEntity, UserEntity};
use crate::domain::value_objects::{
    enums::account_statuses::AccountStatus, field_errors::FieldErrors,
};

pub const CANCELLED_BY_CSR: &str = "csr";
pub const MIN_PHONE_LENGTH: usize = 10;
pub const DEFAULT_SEARCH_LIMIT: i64 = 10;
pub const MAX_SEARCH_LIMIT: i64 = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct UpdateUserModel {
    #[validate(range(min = 1, message = "Invalid user"))]
    pub id: i64,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub account_status: String,
}

impl UpdateUserModel {
    /// Name and email are checked as they will be stored.
    pub fn validate_fields(&self) -> Result<(), FieldErrors> {
        let trimmed = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self.clone()
        };
        let mut errors = match trimmed.validate() {
            Ok(()) => FieldErrors::new(),
            Err(err) => FieldErrors::from(err),
        };

        if self
            .phone()
            .is_some_and(|phone| phone.chars().count() < MIN_PHONE_LENGTH)
        {
            errors.push(
                "phone",
                format!("Phone number must be at least {} characters", MIN_PHONE_LENGTH),
            );
        }

        if AccountStatus::parse(&self.account_status).is_none() {
            errors.push("account_status", "Please select a valid account status");
        }

        errors.into_result()
    }

    pub fn phone(&self) -> Option<&str> {
        non_blank(self.phone.as_deref())
    }

    pub fn address(&self) -> Option<&str> {
        non_blank(self.address.as_deref())
    }

    /// Changeset against the stored row. Cancelling stamps who and when;
    /// reactivating clears the stamp.
    pub fn to_entity(&self, current: &UserEntity, now: DateTime<Utc>) -> EditUserEntity {
        let status = AccountStatus::parse(&self.account_status).unwrap_or_default();

        let (cancelled_at, cancelled_by) = match status {
            AccountStatus::Active => (None, None),
            AccountStatus::Cancelled if current.account_status == status.to_string() => {
                (current.cancelled_at, current.cancelled_by.clone())
            }
            AccountStatus::Cancelled => (Some(now), Some(CANCELLED_BY_CSR.to_string())),
        };

        EditUserEntity {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone().map(str::to_string),
            address: self.address().map(str::to_string),
            account_status: status.to_string(),
            cancelled_at,
            cancelled_by,
            updated_at: Some(now),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct AddCsrNoteModel {
    #[validate(length(
        min = 10,
        max = 500,
        message = "Note must be between 10 and 500 characters"
    ))]
    pub csr_notes: String,
}

impl AddCsrNoteModel {
    pub fn validate_fields(&self) -> Result<(), FieldErrors> {
        Self {
            csr_notes: self.csr_notes.trim().to_string(),
        }
        .validate()
        .map_err(FieldErrors::from)
    }

    pub fn to_entity(&self, now: DateTime<Utc>) -> EditCsrNoteEntity {
        EditCsrNoteEntity {
            csr_notes: Some(self.csr_notes.trim().to_string()),
            updated_at: Some(now),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub account_status: String,
    pub csr_notes: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<String>,
    pub cancelled_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<UserEntity> for UserDto {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            phone: value.phone,
            address: value.address,
            account_status: value.account_status,
            csr_notes: value.csr_notes,
            cancelled_at: value.cancelled_at,
            cancelled_by: value.cancelled_by,
            cancelled_reason: value.cancelled_reason,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UserSearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<i64>,
}

impl UserSearchQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSearchResultDto {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn stored(status: &str) -> UserEntity {
        UserEntity {
            id: 1,
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            address: None,
            account_status: status.to_string(),
            csr_notes: None,
            cancelled_at: None,
            cancelled_by: None,
            cancelled_reason: None,
            created_at: Utc::now() - Duration::days(90),
            updated_at: None,
            deleted_at: None,
        }
    }

    fn update(status: &str) -> UpdateUserModel {
        UpdateUserModel {
            id: 1,
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: Some("555-010-0199".to_string()),
            address: Some("  ".to_string()),
            account_status: status.to_string(),
        }
    }

    #[test]
    fn rejects_bad_email_short_phone_and_unknown_status() {
        let model = UpdateUserModel {
            email: "not-an-email".to_string(),
            phone: Some("12345".to_string()),
            account_status: "paused".to_string(),
            ..update("active")
        };
        let errors = model.validate_fields().unwrap_err();

        assert_eq!(
            errors.get("email"),
            Some(&["Invalid email address".to_string()][..])
        );
        assert!(errors.get("phone").is_some());
        assert!(errors.get("account_status").is_some());
    }

    #[test]
    fn whitespace_name_is_treated_as_missing() {
        let model = UpdateUserModel {
            name: "   ".to_string(),
            email: "  jane@example.com  ".to_string(),
            ..update("active")
        };
        let errors = model.validate_fields().unwrap_err();

        assert_eq!(errors.get("name"), Some(&["Name is required".to_string()][..]));
        assert_eq!(errors.get("email"), None);
    }

    #[test]
    fn blank_optional_fields_are_cleared() {
        let model = UpdateUserModel {
            phone: Some(String::new()),
            ..update("active")
        };
        assert!(model.validate_fields().is_ok());

        let entity = model.to_entity(&stored("active"), Utc::now());
        assert_eq!(entity.phone, None);
        assert_eq!(entity.address, None);
    }

    #[test]
    fn cancelling_stamps_actor_and_time() {
        let now = Utc::now();
        let entity = update("cancelled").to_entity(&stored("active"), now);

        assert_eq!(entity.account_status, "cancelled");
        assert_eq!(entity.cancelled_at, Some(now));
        assert_eq!(entity.cancelled_by.as_deref(), Some("csr"));
    }

    #[test]
    fn already_cancelled_keeps_original_stamp() {
        let earlier = Utc::now() - Duration::days(3);
        let mut current = stored("cancelled");
        current.cancelled_at = Some(earlier);
        current.cancelled_by = Some("csr".to_string());

        let entity = update("cancelled").to_entity(&current, Utc::now());
        assert_eq!(entity.cancelled_at, Some(earlier));
    }

    #[test]
    fn reactivating_clears_stamp() {
        let mut current = stored("cancelled");
        current.cancelled_at = Some(Utc::now());
        current.cancelled_by = Some("csr".to_string());

        let entity = update("active").to_entity(&current, Utc::now());
        assert_eq!(entity.cancelled_at, None);
        assert_eq!(entity.cancelled_by, None);
    }

    #[test]
    fn note_length_bounds() {
        let short = AddCsrNoteModel {
            csr_notes: "too short".to_string(),
        };
        assert!(short.validate_fields().is_err());

        let ok = AddCsrNoteModel {
            csr_notes: "Customer called about billing".to_string(),
        };
        assert!(ok.validate_fields().is_ok());

        let long = AddCsrNoteModel {
            csr_notes: "x".repeat(501),
        };
        assert!(long.validate_fields().is_err());

        let padded = AddCsrNoteModel {
            csr_notes: format!("   {}   ", "short"),
        };
        assert!(padded.validate_fields().is_err());
    }

    #[test]
    fn search_limit_is_clamped() {
        let query = UserSearchQuery::default();
        assert_eq!(query.effective_limit(), 10);

        let query = UserSearchQuery {
            q: "jo".to_string(),
            limit: Some(500),
        };
        assert_eq!(query.effective_limit(), 50);
    }
}
