use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::entities::subscription_plans::SubscriptionPlanEntity;
use crate::domain::value_objects::money::format_minor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanModel {
    pub id: i64,
    pub name: String,
    pub price_minor: i32,
    pub washes_per_month: i32,
}

impl From<SubscriptionPlanEntity> for PlanModel {
    fn from(value: SubscriptionPlanEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            price_minor: value.price_minor,
            washes_per_month: value.washes_per_month,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanDto {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub washes_per_month: i32,
}

impl From<&PlanModel> for PlanDto {
    fn from(value: &PlanModel) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            price: format_minor(value.price_minor.into()),
            washes_per_month: value.washes_per_month,
        }
    }
}

/// In-process copy of `subscription_plans`. Each reload produces a new
/// snapshot with a higher `version`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanCatalog {
    pub version: u64,
    pub loaded_at: DateTime<Utc>,
    pub plans: Vec<PlanModel>,
}

impl PlanCatalog {
    pub fn new(version: u64, loaded_at: DateTime<Utc>, plans: Vec<PlanModel>) -> Self {
        Self {
            version,
            loaded_at,
            plans,
        }
    }

    pub fn find(&self, plan_id: i64) -> Option<&PlanModel> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }

    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.loaded_at >= ttl
    }

    pub fn to_dto(&self) -> PlanCatalogDto {
        PlanCatalogDto {
            version: self.version,
            loaded_at: self.loaded_at,
            plans: self.plans.iter().map(PlanDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanCatalogDto {
    pub version: u64,
    pub loaded_at: DateTime<Utc>,
    pub plans: Vec<PlanDto>,
}
