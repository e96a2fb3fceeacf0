use anyhow::Result;
use chrono::{Duration, Utc};
use portal::domain::{
    repositories::plans::PlanRepository,
    value_objects::plans::{PlanCatalog, PlanModel},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Versioned in-process cache of `subscription_plans`. Reloaded lazily once
/// the snapshot is older than the TTL, or on demand.
pub struct PlanCatalogUseCase<P>
where
    P: PlanRepository + Send + Sync + 'static,
{
    plan_repository: Arc<P>,
    ttl: Duration,
    catalog: RwLock<Option<Arc<PlanCatalog>>>,
}

impl<P> PlanCatalogUseCase<P>
where
    P: PlanRepository + Send + Sync + 'static,
{
    pub fn new(plan_repository: Arc<P>, ttl_seconds: u64) -> Self {
        Self {
            plan_repository,
            ttl: i64::try_from(ttl_seconds)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
            catalog: RwLock::new(None),
        }
    }

    /// Current snapshot, reloading first when it is missing or stale. A failed
    /// lazy reload keeps serving the previous snapshot.
    pub async fn snapshot(&self) -> Result<Arc<PlanCatalog>> {
        {
            let guard = self.catalog.read().await;
            if let Some(catalog) = guard.as_ref() {
                if !catalog.is_stale(Utc::now(), self.ttl) {
                    return Ok(Arc::clone(catalog));
                }
            }
        }

        match self.reload(false).await {
            Ok(catalog) => Ok(catalog),
            Err(err) => match self.catalog.read().await.as_ref() {
                Some(previous) => {
                    warn!(
                        version = previous.version,
                        db_error = ?err,
                        "plan_catalog: reload failed, serving stale catalog"
                    );
                    Ok(Arc::clone(previous))
                }
                None => Err(err),
            },
        }
    }

    /// Reloads from the database and bumps the version.
    pub async fn refresh(&self) -> Result<Arc<PlanCatalog>> {
        self.reload(true).await
    }

    pub async fn find_plan(&self, plan_id: i64) -> Result<Option<PlanModel>> {
        Ok(self.snapshot().await?.find(plan_id).cloned())
    }

    async fn reload(&self, force: bool) -> Result<Arc<PlanCatalog>> {
        let mut guard = self.catalog.write().await;

        // Another task may have reloaded while this one waited for the lock.
        if let Some(catalog) = guard.as_ref() {
            if !force && !catalog.is_stale(Utc::now(), self.ttl) {
                return Ok(Arc::clone(catalog));
            }
        }

        let plans = self.plan_repository.list_plans().await?;
        let version = guard.as_ref().map_or(1, |catalog| catalog.version + 1);
        let catalog = Arc::new(PlanCatalog::new(
            version,
            Utc::now(),
            plans.into_iter().map(PlanModel::from).collect(),
        ));

        info!(
            version,
            plans = catalog.plans.len(),
            "plan_catalog: loaded subscription plans"
        );

        *guard = Some(Arc::clone(&catalog));
        Ok(catalog)
    }
}
