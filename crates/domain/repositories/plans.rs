use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::subscription_plans::SubscriptionPlanEntity;

#[automock]
#[async_trait]
pub trait PlanRepository {
    async fn list_plans(&self) -> Result<Vec<SubscriptionPlanEntity>>;
}
