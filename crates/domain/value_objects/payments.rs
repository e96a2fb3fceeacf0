use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::payments::PaymentEntity;
use crate::domain::value_objects::money::format_minor;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentDto {
    pub id: i64,
    pub user_id: i64,
    pub payment_method_id: i64,
    pub item_type: String,
    pub subscription_id: Option<i64>,
    pub wash_id: Option<i64>,
    pub coupon_id: Option<i64>,
    pub base_amount: String,
    pub discount_amount: String,
    pub final_amount: String,
    pub status: String,
    pub status_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentEntity> for PaymentDto {
    fn from(value: PaymentEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            payment_method_id: value.payment_method_id,
            item_type: value.item_type,
            subscription_id: value.subscription_id,
            wash_id: value.wash_id,
            coupon_id: value.coupon_id,
            base_amount: format_minor(value.base_amount_minor.into()),
            discount_amount: format_minor(value.discount_amount_minor.into()),
            final_amount: format_minor(value.final_amount_minor.into()),
            status: value.status,
            status_reason: value.status_reason,
            created_at: value.created_at,
        }
    }
}
