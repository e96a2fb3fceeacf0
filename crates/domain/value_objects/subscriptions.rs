use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{
    payments::InsertPaymentEntity,
    subscription_plans::SubscriptionPlanEntity,
    subscription_transfers::{InsertSubscriptionTransferEntity, SubscriptionTransferEntity},
    subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
};
use crate::domain::value_objects::{
    enums::{
        item_types::ItemType, payment_statuses::PaymentStatus,
        subscription_statuses::SubscriptionStatus,
    },
    field_errors::FieldErrors,
    payments::PaymentDto,
    plans::{PlanDto, PlanModel},
};

pub const BILLING_PERIOD_DAYS: i64 = 30;
pub const DEFAULT_TRANSFERRED_BY: &str = "system";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct CreateSubscriptionModel {
    #[validate(range(min = 1, message = "Please select a user"))]
    pub user_id: i64,
    #[validate(range(min = 1, message = "Please select a vehicle"))]
    pub vehicle_id: i64,
    #[validate(range(min = 1, message = "Please select a plan"))]
    pub plan_id: i64,
    #[validate(range(min = 1, message = "Please select a payment method"))]
    pub payment_method_id: i64,
}

impl CreateSubscriptionModel {
    pub fn validate_fields(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }

    /// Opening subscription row for `plan`, billed from `now`.
    pub fn to_entity(&self, plan: &PlanModel, now: DateTime<Utc>) -> InsertSubscriptionEntity {
        InsertSubscriptionEntity {
            user_id: self.user_id,
            vehicle_id: self.vehicle_id,
            plan_id: plan.id,
            remaining_washes: plan.washes_per_month,
            status: SubscriptionStatus::Active.to_string(),
            billing_period_start: now,
            payment_due_date: now + Duration::days(BILLING_PERIOD_DAYS),
            last_payment_date: Some(now),
            last_payment_status: Some(PaymentStatus::Paid.to_string()),
            created_at: now,
        }
    }

    /// Payment for the first billing period. `subscription_id` is filled in
    /// once the subscription row exists.
    pub fn to_opening_payment(&self, plan: &PlanModel, now: DateTime<Utc>) -> InsertPaymentEntity {
        InsertPaymentEntity {
            user_id: self.user_id,
            payment_method_id: self.payment_method_id,
            item_type: ItemType::Subscription.to_string(),
            subscription_id: None,
            wash_id: None,
            coupon_id: None,
            base_amount_minor: plan.price_minor,
            discount_amount_minor: 0,
            final_amount_minor: plan.price_minor,
            status: PaymentStatus::Paid.to_string(),
            status_reason: None,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct TransferSubscriptionModel {
    #[validate(range(min = 1, message = "Please select a subscription"))]
    pub subscription_id: i64,
    #[validate(range(min = 1, message = "Please select a vehicle"))]
    pub from_vehicle_id: i64,
    #[validate(range(min = 1, message = "Please select a vehicle"))]
    pub to_vehicle_id: i64,
    #[validate(length(max = 500, message = "Reason must be 500 characters or less"))]
    pub transfer_reason: Option<String>,
    pub transferred_by: Option<String>,
}

impl TransferSubscriptionModel {
    pub fn validate_fields(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(err) => FieldErrors::from(err),
        };

        if self.to_vehicle_id >= 1 && self.to_vehicle_id == self.from_vehicle_id {
            errors.push(
                "to_vehicle_id",
                "Destination vehicle must differ from the current vehicle",
            );
        }

        errors.into_result()
    }

    pub fn to_transfer_entity(&self, now: DateTime<Utc>) -> InsertSubscriptionTransferEntity {
        let transferred_by = self
            .transferred_by
            .as_deref()
            .map(str::trim)
            .filter(|actor| !actor.is_empty())
            .unwrap_or(DEFAULT_TRANSFERRED_BY)
            .to_string();

        InsertSubscriptionTransferEntity {
            subscription_id: self.subscription_id,
            from_vehicle_id: self.from_vehicle_id,
            to_vehicle_id: self.to_vehicle_id,
            transfer_reason: self.transfer_reason.clone(),
            transferred_at: now,
            transferred_by,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionDto {
    pub id: i64,
    pub user_id: i64,
    pub vehicle_id: i64,
    pub plan_id: i64,
    pub remaining_washes: i32,
    pub status: String,
    pub billing_period_start: DateTime<Utc>,
    pub payment_due_date: DateTime<Utc>,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub last_payment_status: Option<String>,
    pub cancellation_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<SubscriptionEntity> for SubscriptionDto {
    fn from(value: SubscriptionEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            vehicle_id: value.vehicle_id,
            plan_id: value.plan_id,
            remaining_washes: value.remaining_washes,
            status: value.status,
            billing_period_start: value.billing_period_start,
            payment_due_date: value.payment_due_date,
            last_payment_date: value.last_payment_date,
            last_payment_status: value.last_payment_status,
            cancellation_date: value.cancellation_date,
            created_at: value.created_at,
        }
    }
}

/// Subscription joined with its plan, as listed on a user's page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionWithPlanDto {
    #[serde(flatten)]
    pub subscription: SubscriptionDto,
    pub plan: PlanDto,
}

impl From<(SubscriptionEntity, SubscriptionPlanEntity)> for SubscriptionWithPlanDto {
    fn from((subscription, plan): (SubscriptionEntity, SubscriptionPlanEntity)) -> Self {
        Self {
            subscription: subscription.into(),
            plan: PlanDto::from(&PlanModel::from(plan)),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionTransferDto {
    pub id: i64,
    pub subscription_id: i64,
    pub from_vehicle_id: i64,
    pub to_vehicle_id: i64,
    pub transfer_reason: Option<String>,
    pub transferred_at: DateTime<Utc>,
    pub transferred_by: String,
}

impl From<SubscriptionTransferEntity> for SubscriptionTransferDto {
    fn from(value: SubscriptionTransferEntity) -> Self {
        Self {
            id: value.id,
            subscription_id: value.subscription_id,
            from_vehicle_id: value.from_vehicle_id,
            to_vehicle_id: value.to_vehicle_id,
            transfer_reason: value.transfer_reason,
            transferred_at: value.transferred_at,
            transferred_by: value.transferred_by,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreatedSubscriptionDto {
    pub subscription: SubscriptionDto,
    pub payment: PaymentDto,
}

/// Result of a transfer: the retired source row, its continuation on the
/// destination vehicle and the audit record linking them.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransferredSubscriptionDto {
    pub previous: SubscriptionDto,
    pub subscription: SubscriptionDto,
    pub transfer: SubscriptionTransferDto,
}

/// Rows written by a successful transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOutcome {
    pub previous: SubscriptionEntity,
    pub subscription: SubscriptionEntity,
    pub transfer: SubscriptionTransferEntity,
}

impl From<TransferOutcome> for TransferredSubscriptionDto {
    fn from(value: TransferOutcome) -> Self {
        Self {
            previous: value.previous.into(),
            subscription: value.subscription.into(),
            transfer: value.transfer.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silver() -> PlanModel {
        PlanModel {
            id: 2,
            name: "silver".to_string(),
            price_minor: 3000,
            washes_per_month: 8,
        }
    }

    #[test]
    fn missing_ids_become_field_errors() {
        let model: CreateSubscriptionModel = serde_json::from_str(r#"{"user_id": 1}"#).unwrap();
        let errors = model.validate_fields().unwrap_err();

        assert_eq!(
            errors.get("vehicle_id"),
            Some(&["Please select a vehicle".to_string()][..])
        );
        assert_eq!(
            errors.get("plan_id"),
            Some(&["Please select a plan".to_string()][..])
        );
        assert!(errors.get("payment_method_id").is_some());
        assert!(errors.get("user_id").is_none());
    }

    #[test]
    fn opening_rows_follow_the_plan() {
        let now = Utc::now();
        let model = CreateSubscriptionModel {
            user_id: 1,
            vehicle_id: 10,
            plan_id: 2,
            payment_method_id: 5,
        };

        let subscription = model.to_entity(&silver(), now);
        assert_eq!(subscription.remaining_washes, 8);
        assert_eq!(subscription.status, "active");
        assert_eq!(subscription.payment_due_date, now + Duration::days(30));
        assert_eq!(subscription.last_payment_status.as_deref(), Some("paid"));

        let payment = model.to_opening_payment(&silver(), now);
        assert_eq!(payment.final_amount_minor, 3000);
        assert_eq!(payment.discount_amount_minor, 0);
        assert_eq!(payment.item_type, "subscription");
        assert_eq!(payment.status, "paid");
        assert_eq!(payment.payment_method_id, 5);
    }

    #[test]
    fn transfer_to_same_vehicle_is_rejected() {
        let model = TransferSubscriptionModel {
            subscription_id: 7,
            from_vehicle_id: 10,
            to_vehicle_id: 10,
            ..Default::default()
        };
        let errors = model.validate_fields().unwrap_err();
        assert!(errors.get("to_vehicle_id").is_some());
    }

    #[test]
    fn transfer_reason_is_capped() {
        let model = TransferSubscriptionModel {
            subscription_id: 7,
            from_vehicle_id: 10,
            to_vehicle_id: 11,
            transfer_reason: Some("x".repeat(501)),
            transferred_by: None,
        };
        let errors = model.validate_fields().unwrap_err();
        assert!(errors.get("transfer_reason").is_some());
    }

    #[test]
    fn transferred_by_defaults_to_system() {
        let model = TransferSubscriptionModel {
            subscription_id: 7,
            from_vehicle_id: 10,
            to_vehicle_id: 11,
            transfer_reason: None,
            transferred_by: Some("  ".to_string()),
        };
        let entity = model.to_transfer_entity(Utc::now());
        assert_eq!(entity.transferred_by, "system");
    }
}
