use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::subscriptions;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscriptions)]
pub struct SubscriptionEntity {
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
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = subscriptions)]
pub struct InsertSubscriptionEntity {
    pub user_id: i64,
    pub vehicle_id: i64,
    pub plan_id: i64,
    pub remaining_washes: i32,
    pub status: String,
    pub billing_period_start: DateTime<Utc>,
    pub payment_due_date: DateTime<Utc>,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub last_payment_status: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl InsertSubscriptionEntity {
    /// Row that continues `source` on another vehicle. Plan, wash balance and
    /// billing dates carry over unchanged.
    pub fn continuation_of(
        source: &SubscriptionEntity,
        to_vehicle_id: i64,
        status: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: source.user_id,
            vehicle_id: to_vehicle_id,
            plan_id: source.plan_id,
            remaining_washes: source.remaining_washes,
            status,
            billing_period_start: source.billing_period_start,
            payment_due_date: source.payment_due_date,
            last_payment_date: source.last_payment_date,
            last_payment_status: source.last_payment_status.clone(),
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = subscriptions)]
pub struct UpdateSubscriptionStatusEntity {
    pub status: String,
    pub cancellation_date: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
