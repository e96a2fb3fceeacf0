use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{count, count_distinct, sum};
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;
use tokio::task;

use crate::{
    domain::{
        repositories::dashboard::DashboardRepository,
        value_objects::{
            dashboard::{PlanCount, StatusCount},
            enums::{
                account_statuses::AccountStatus, payment_statuses::PaymentStatus,
                subscription_statuses::SubscriptionStatus,
            },
        },
    },
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{payments, subscription_plans, subscriptions, users},
    },
};

pub struct DashboardPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl DashboardPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl DashboardRepository for DashboardPostgres {
    async fn count_active_users(&self) -> Result<i64> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<i64> {
            let mut conn = db_pool.get()?;

            let total = users::table
                .filter(users::account_status.eq(AccountStatus::Active.to_string()))
                .filter(users::deleted_at.is_null())
                .count()
                .get_result::<i64>(&mut conn)?;

            Ok(total)
        })
        .await?
    }

    async fn count_users_with_overdue_subscriptions(&self, now: DateTime<Utc>) -> Result<i64> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<i64> {
            let mut conn = db_pool.get()?;

            let total = subscriptions::table
                .filter(subscriptions::deleted_at.is_null())
                .filter(
                    subscriptions::status
                        .eq(SubscriptionStatus::Overdue.to_string())
                        .or(subscriptions::status
                            .eq(SubscriptionStatus::Active.to_string())
                            .and(subscriptions::payment_due_date.lt(now))),
                )
                .select(count_distinct(subscriptions::user_id))
                .get_result::<i64>(&mut conn)?;

            Ok(total)
        })
        .await?
    }

    async fn subscription_status_counts(&self) -> Result<Vec<StatusCount>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<StatusCount>> {
            let mut conn = db_pool.get()?;

            let rows = subscriptions::table
                .filter(subscriptions::deleted_at.is_null())
                .group_by(subscriptions::status)
                .select((subscriptions::status, count(subscriptions::id)))
                .order(subscriptions::status.asc())
                .load::<(String, i64)>(&mut conn)?;

            Ok(rows
                .into_iter()
                .map(|(status, count)| StatusCount { status, count })
                .collect())
        })
        .await?
    }

    async fn subscription_plan_counts(&self) -> Result<Vec<PlanCount>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<PlanCount>> {
            let mut conn = db_pool.get()?;

            let rows = subscriptions::table
                .inner_join(subscription_plans::table)
                .filter(subscriptions::status.eq(SubscriptionStatus::Active.to_string()))
                .filter(subscriptions::deleted_at.is_null())
                .group_by(subscription_plans::name)
                .select((subscription_plans::name, count(subscriptions::id)))
                .load::<(String, i64)>(&mut conn)?;

            let mut counts: Vec<PlanCount> = rows
                .into_iter()
                .map(|(plan, count)| PlanCount { plan, count })
                .collect();
            counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.plan.cmp(&b.plan)));

            Ok(counts)
        })
        .await?
    }

    async fn paid_revenue_since(&self, since: DateTime<Utc>) -> Result<i64> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<i64> {
            let mut conn = db_pool.get()?;

            let total = payments::table
                .filter(payments::status.eq(PaymentStatus::Paid.to_string()))
                .filter(payments::created_at.ge(since))
                .filter(payments::deleted_at.is_null())
                .select(sum(payments::final_amount_minor))
                .get_result::<Option<i64>>(&mut conn)?;

            Ok(total.unwrap_or(0))
        })
        .await?
    }
}
