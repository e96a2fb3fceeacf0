use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::subscription_transfers;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscription_transfers)]
pub struct SubscriptionTransferEntity {
    pub id: i64,
    pub subscription_id: i64,
    pub from_vehicle_id: i64,
    pub to_vehicle_id: i64,
    pub transfer_reason: Option<String>,
    pub transferred_at: DateTime<Utc>,
    pub transferred_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = subscription_transfers)]
pub struct InsertSubscriptionTransferEntity {
    pub subscription_id: i64,
    pub from_vehicle_id: i64,
    pub to_vehicle_id: i64,
    pub transfer_reason: Option<String>,
    pub transferred_at: DateTime<Utc>,
    pub transferred_by: String,
    pub created_at: DateTime<Utc>,
}
