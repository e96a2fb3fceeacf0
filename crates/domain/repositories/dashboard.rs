use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::domain::value_objects::dashboard::{PlanCount, StatusCount};

#[automock]
#[async_trait]
pub trait DashboardRepository {
    async fn count_active_users(&self) -> Result<i64>;

    /// Distinct users holding at least one subscription overdue at `now`.
    async fn count_users_with_overdue_subscriptions(&self, now: DateTime<Utc>) -> Result<i64>;

    async fn subscription_status_counts(&self) -> Result<Vec<StatusCount>>;

    /// Ordered by count, highest first.
    async fn subscription_plan_counts(&self) -> Result<Vec<PlanCount>>;

    /// Sum of `final_amount_minor` over paid payments created since `since`.
    async fn paid_revenue_since(&self, since: DateTime<Utc>) -> Result<i64>;
}
