use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::subscription_plans;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscription_plans)]
pub struct SubscriptionPlanEntity {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i32,
    pub washes_per_month: i32,
    pub created_at: DateTime<Utc>,
}
