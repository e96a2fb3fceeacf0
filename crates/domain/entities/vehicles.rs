use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::vehicles;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = vehicles)]
pub struct VehicleEntity {
    pub id: i64,
    pub user_id: i64,
    pub make: String,
    pub model: String,
    pub color: String,
    pub year: i32,
    pub license_plate: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = vehicles)]
pub struct InsertVehicleEntity {
    pub user_id: i64,
    pub make: String,
    pub model: String,
    pub color: String,
    pub year: i32,
    pub license_plate: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
