use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::payments;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: i64,
    pub user_id: i64,
    pub payment_method_id: i64,
    pub item_type: String,
    pub subscription_id: Option<i64>,
    pub wash_id: Option<i64>,
    pub coupon_id: Option<i64>,
    pub base_amount_minor: i32,
    pub discount_amount_minor: i32,
    pub final_amount_minor: i32,
    pub status: String,
    pub status_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = payments)]
pub struct InsertPaymentEntity {
    pub user_id: i64,
    pub payment_method_id: i64,
    pub item_type: String,
    pub subscription_id: Option<i64>,
    pub wash_id: Option<i64>,
    pub coupon_id: Option<i64>,
    pub base_amount_minor: i32,
    pub discount_amount_minor: i32,
    pub final_amount_minor: i32,
    pub status: String,
    pub status_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
