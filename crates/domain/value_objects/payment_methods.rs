use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::payment_methods::{InsertPaymentMethodEntity, PaymentMethodEntity};
use crate::domain::value_objects::field_errors::FieldErrors;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct CreatePaymentMethodModel {
    #[validate(range(min = 1, message = "Please select a user"))]
    pub user_id: i64,
    pub card_last4: String,
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub card_exp_month: i32,
    pub card_exp_year: i32,
    pub is_default: bool,
}

impl CreatePaymentMethodModel {
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(err) => FieldErrors::from(err),
        };

        let last4_ok =
            self.card_last4.len() == 4 && self.card_last4.chars().all(|c| c.is_ascii_digit());
        if !last4_ok {
            errors.push("card_last4", "Must be exactly 4 digits");
        }

        if self.card_exp_year < now.year() {
            errors.push("card_exp_year", "Card is expired");
        } else if self.card_exp_year == now.year()
            && (1..=12).contains(&self.card_exp_month)
            && (self.card_exp_month as u32) < now.month()
        {
            errors.push("card_exp_month", "Card is expired");
        }

        errors.into_result()
    }

    pub fn to_entity(&self, now: DateTime<Utc>) -> InsertPaymentMethodEntity {
        InsertPaymentMethodEntity {
            user_id: self.user_id,
            card_last4: self.card_last4.clone(),
            card_exp_month: self.card_exp_month,
            card_exp_year: self.card_exp_year,
            is_default: self.is_default,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentMethodDto {
    pub id: i64,
    pub user_id: i64,
    pub card_last4: String,
    pub card_exp_month: i32,
    pub card_exp_year: i32,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentMethodEntity> for PaymentMethodDto {
    fn from(value: PaymentMethodEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            card_last4: value.card_last4,
            card_exp_month: value.card_exp_month,
            card_exp_year: value.card_exp_year,
            is_default: value.is_default,
            created_at: value.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap()
    }

    fn card(month: i32, year: i32) -> CreatePaymentMethodModel {
        CreatePaymentMethodModel {
            user_id: 1,
            card_last4: "4242".to_string(),
            card_exp_month: month,
            card_exp_year: year,
            is_default: true,
        }
    }

    #[test]
    fn accepts_card_expiring_this_month() {
        assert!(card(6, 2025).validate_at(now()).is_ok());
        assert!(card(1, 2026).validate_at(now()).is_ok());
    }

    #[test]
    fn rejects_expired_cards() {
        let errors = card(5, 2025).validate_at(now()).unwrap_err();
        assert_eq!(
            errors.get("card_exp_month"),
            Some(&["Card is expired".to_string()][..])
        );

        let errors = card(12, 2024).validate_at(now()).unwrap_err();
        assert_eq!(
            errors.get("card_exp_year"),
            Some(&["Card is expired".to_string()][..])
        );
    }

    #[test]
    fn last4_must_be_four_digits() {
        for bad in ["424", "42424", "42a2", ""] {
            let mut model = card(6, 2026);
            model.card_last4 = bad.to_string();
            let errors = model.validate_at(now()).unwrap_err();
            assert!(errors.get("card_last4").is_some(), "{} accepted", bad);
        }
    }

    #[test]
    fn month_out_of_range() {
        let errors = card(13, 2026).validate_at(now()).unwrap_err();
        assert!(errors.get("card_exp_month").is_some());
    }
}
