use anyhow::Result;
use chrono::{Duration, Utc};
use portal::domain::{
    repositories::dashboard::DashboardRepository,
    value_objects::{
        dashboard::{DashboardHeaderMetrics, DashboardMetrics},
        money::format_minor,
    },
};
use std::sync::Arc;
use tracing::error;

pub const REVENUE_WINDOW_DAYS: i64 = 30;

pub struct DashboardUseCase<D>
where
    D: DashboardRepository + Send + Sync + 'static,
{
    dashboard_repository: Arc<D>,
}

impl<D> DashboardUseCase<D>
where
    D: DashboardRepository + Send + Sync + 'static,
{
    pub fn new(dashboard_repository: Arc<D>) -> Self {
        Self {
            dashboard_repository,
        }
    }

    /// Runs the header queries concurrently. Any failing query fails the call.
    pub async fn header_metrics(&self) -> Result<DashboardHeaderMetrics> {
        let now = Utc::now();
        let repo = &self.dashboard_repository;

        let (total_active_users, users_with_overdue_subscriptions, subscription_status_count) =
            tokio::try_join!(
                repo.count_active_users(),
                repo.count_users_with_overdue_subscriptions(now),
                repo.subscription_status_counts(),
            )
            .inspect_err(|err| error!(db_error = ?err, "dashboard: header metrics failed"))?;

        Ok(DashboardHeaderMetrics {
            total_active_users,
            users_with_overdue_subscriptions,
            subscription_status_count,
        })
    }

    pub async fn metrics(&self) -> Result<DashboardMetrics> {
        let now = Utc::now();
        let repo = &self.dashboard_repository;

        let (
            total_active_users,
            users_with_overdue_subscriptions,
            subscription_status_count,
            subscription_plan_count,
            monthly_revenue_minor,
        ) = tokio::try_join!(
            repo.count_active_users(),
            repo.count_users_with_overdue_subscriptions(now),
            repo.subscription_status_counts(),
            repo.subscription_plan_counts(),
            repo.paid_revenue_since(now - Duration::days(REVENUE_WINDOW_DAYS)),
        )
        .inspect_err(|err| error!(db_error = ?err, "dashboard: metrics failed"))?;

        Ok(DashboardMetrics {
            total_active_users,
            users_with_overdue_subscriptions,
            subscription_status_count,
            subscription_plan_count,
            monthly_revenue: format_minor(monthly_revenue_minor),
        })
    }
}
