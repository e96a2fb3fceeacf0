use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;
use tokio::task;

use crate::{
    domain::{
        entities::subscription_plans::SubscriptionPlanEntity,
        repositories::plans::PlanRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::subscription_plans},
};

pub struct PlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PlanRepository for PlanPostgres {
    async fn list_plans(&self) -> Result<Vec<SubscriptionPlanEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<SubscriptionPlanEntity>> {
            let mut conn = db_pool.get()?;

            let plans = subscription_plans::table
                .select(SubscriptionPlanEntity::as_select())
                .order(subscription_plans::id.asc())
                .load::<SubscriptionPlanEntity>(&mut conn)?;

            Ok(plans)
        })
        .await?
    }
}
