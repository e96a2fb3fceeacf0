use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::payment_methods;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payment_methods)]
pub struct PaymentMethodEntity {
    pub id: i64,
    pub user_id: i64,
    pub card_last4: String,
    pub card_exp_month: i32,
    pub card_exp_year: i32,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = payment_methods)]
pub struct InsertPaymentMethodEntity {
    pub user_id: i64,
    pub card_last4: String,
    pub card_exp_month: i32,
    pub card_exp_year: i32,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}
