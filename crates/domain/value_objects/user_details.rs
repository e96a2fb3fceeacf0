use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{
    payment_methods::PaymentMethodEntity, payments::PaymentEntity,
    subscription_plans::SubscriptionPlanEntity, subscriptions::SubscriptionEntity,
    users::UserEntity, vehicles::VehicleEntity, washes::WashEntity,
};
use crate::domain::value_objects::{
    enums::subscription_statuses::SubscriptionStatus,
    payment_methods::PaymentMethodDto,
    payments::PaymentDto,
    subscriptions::SubscriptionWithPlanDto,
    users::UserDto,
    vehicles::VehicleDto,
};

/// A subscription is overdue when flagged so, or when it is still active
/// past its payment due date.
pub fn is_subscription_overdue(subscription: &SubscriptionEntity, now: DateTime<Utc>) -> bool {
    match SubscriptionStatus::from_stored(&subscription.status) {
        SubscriptionStatus::Overdue => true,
        SubscriptionStatus::Active => subscription.payment_due_date < now,
        _ => false,
    }
}

pub fn is_user_overdue<'a>(
    subscriptions: impl IntoIterator<Item = &'a SubscriptionEntity>,
    now: DateTime<Utc>,
) -> bool {
    subscriptions
        .into_iter()
        .any(|subscription| is_subscription_overdue(subscription, now))
}

/// Earliest due date among subscriptions still being billed.
pub fn next_payment_date<'a>(
    subscriptions: impl IntoIterator<Item = &'a SubscriptionEntity>,
) -> Option<DateTime<Utc>> {
    subscriptions
        .into_iter()
        .filter(|subscription| {
            matches!(
                SubscriptionStatus::from_stored(&subscription.status),
                SubscriptionStatus::Active | SubscriptionStatus::Overdue
            )
        })
        .map(|subscription| subscription.payment_due_date)
        .min()
}

pub fn last_wash_date<'a>(washes: impl IntoIterator<Item = &'a WashEntity>) -> Option<DateTime<Utc>> {
    washes.into_iter().map(|wash| wash.created_at).max()
}

/// Everything stored about one user, as loaded by the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDetailRecord {
    pub user: UserEntity,
    pub vehicles: Vec<VehicleEntity>,
    pub subscriptions: Vec<(SubscriptionEntity, SubscriptionPlanEntity)>,
    pub payments: Vec<PaymentEntity>,
    pub payment_methods: Vec<PaymentMethodEntity>,
    pub washes: Vec<WashEntity>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WashDto {
    pub id: i64,
    pub user_id: i64,
    pub vehicle_id: i64,
    pub subscription_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<WashEntity> for WashDto {
    fn from(value: WashEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            vehicle_id: value.vehicle_id,
            subscription_id: value.subscription_id,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserDetailDto {
    pub user: UserDto,
    pub vehicles: Vec<VehicleDto>,
    pub subscriptions: Vec<SubscriptionWithPlanDto>,
    pub payments: Vec<PaymentDto>,
    pub payment_methods: Vec<PaymentMethodDto>,
    pub washes: Vec<WashDto>,
    pub next_payment_date: Option<DateTime<Utc>>,
    pub last_wash_date: Option<DateTime<Utc>>,
    pub is_overdue: bool,
}

impl UserDetailDto {
    pub fn from_record(record: UserDetailRecord, now: DateTime<Utc>) -> Self {
        let subscriptions = || record.subscriptions.iter().map(|(subscription, _)| subscription);
        let next_payment_date = next_payment_date(subscriptions());
        let is_overdue = is_user_overdue(subscriptions(), now);
        let last_wash_date = last_wash_date(&record.washes);

        Self {
            user: record.user.into(),
            vehicles: record.vehicles.into_iter().map(VehicleDto::from).collect(),
            subscriptions: record
                .subscriptions
                .into_iter()
                .map(SubscriptionWithPlanDto::from)
                .collect(),
            payments: record.payments.into_iter().map(PaymentDto::from).collect(),
            payment_methods: record
                .payment_methods
                .into_iter()
                .map(PaymentMethodDto::from)
                .collect(),
            washes: record.washes.into_iter().map(WashDto::from).collect(),
            next_payment_date,
            last_wash_date,
            is_overdue,
        }
    }
}
