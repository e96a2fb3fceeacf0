use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::domain::entities::{
    payments::{InsertPaymentEntity, PaymentEntity},
    subscription_transfers::InsertSubscriptionTransferEntity,
    subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
};
use crate::domain::value_objects::{
    enums::subscription_statuses::SubscriptionStatus, subscriptions::TransferOutcome,
};

#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    async fn find_by_id(&self, subscription_id: i64) -> Result<Option<SubscriptionEntity>>;

    /// Inserts the subscription and its opening payment in one transaction.
    async fn create_with_opening_payment(
        &self,
        subscription: InsertSubscriptionEntity,
        payment: InsertPaymentEntity,
    ) -> Result<(SubscriptionEntity, PaymentEntity)>;

    /// Records the transfer, retires the source row with `retired_status` and
    /// opens an active continuation on the destination vehicle, all in one
    /// transaction. Fails if the source is no longer active.
    async fn transfer(
        &self,
        transfer: InsertSubscriptionTransferEntity,
        retired_status: SubscriptionStatus,
    ) -> Result<TransferOutcome>;

    /// Moves the row from `expected` to `status`. Returns `None` when the row
    /// no longer holds `expected`.
    async fn update_status(
        &self,
        subscription_id: i64,
        expected: SubscriptionStatus,
        status: SubscriptionStatus,
        cancellation_date: Option<DateTime<Utc>>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<SubscriptionEntity>>;
}
