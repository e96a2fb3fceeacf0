use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use tokio::task;

use crate::{
    domain::{
        entities::{
            payments::{InsertPaymentEntity, PaymentEntity},
            subscription_transfers::{
                InsertSubscriptionTransferEntity, SubscriptionTransferEntity,
            },
            subscriptions::{
                InsertSubscriptionEntity, SubscriptionEntity, UpdateSubscriptionStatusEntity,
            },
        },
        repositories::subscriptions::SubscriptionRepository,
        value_objects::{
            enums::subscription_statuses::SubscriptionStatus, subscriptions::TransferOutcome,
        },
    },
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{payments, subscription_transfers, subscriptions},
    },
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn find_by_id(&self, subscription_id: i64) -> Result<Option<SubscriptionEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Option<SubscriptionEntity>> {
            let mut conn = db_pool.get()?;

            let subscription = subscriptions::table
                .filter(subscriptions::id.eq(subscription_id))
                .select(SubscriptionEntity::as_select())
                .first::<SubscriptionEntity>(&mut conn)
                .optional()?;

            Ok(subscription)
        })
        .await?
    }

    async fn create_with_opening_payment(
        &self,
        subscription: InsertSubscriptionEntity,
        mut payment: InsertPaymentEntity,
    ) -> Result<(SubscriptionEntity, PaymentEntity)> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<(SubscriptionEntity, PaymentEntity)> {
            let mut conn = db_pool.get()?;

            let created = conn.transaction::<_, diesel::result::Error, _>(|tx| {
                let subscription = insert_into(subscriptions::table)
                    .values(&subscription)
                    .returning(SubscriptionEntity::as_returning())
                    .get_result::<SubscriptionEntity>(tx)?;

                payment.subscription_id = Some(subscription.id);
                let payment = insert_into(payments::table)
                    .values(&payment)
                    .returning(PaymentEntity::as_returning())
                    .get_result::<PaymentEntity>(tx)?;

                Ok((subscription, payment))
            })?;

            Ok(created)
        })
        .await?
    }

    async fn transfer(
        &self,
        transfer: InsertSubscriptionTransferEntity,
        retired_status: SubscriptionStatus,
    ) -> Result<TransferOutcome> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<TransferOutcome> {
            let mut conn = db_pool.get()?;
            let now = transfer.transferred_at;

            let outcome = conn.transaction::<_, diesel::result::Error, _>(|tx| {
                let audit = insert_into(subscription_transfers::table)
                    .values(&transfer)
                    .returning(SubscriptionTransferEntity::as_returning())
                    .get_result::<SubscriptionTransferEntity>(tx)?;

                // Only an active row on the source vehicle may be retired; a
                // concurrent transfer that committed first leaves nothing to match.
                let previous = update(
                    subscriptions::table
                        .filter(subscriptions::id.eq(transfer.subscription_id))
                        .filter(subscriptions::vehicle_id.eq(transfer.from_vehicle_id))
                        .filter(subscriptions::status.eq(SubscriptionStatus::Active.to_string())),
                )
                .set(&UpdateSubscriptionStatusEntity {
                    status: retired_status.to_string(),
                    cancellation_date: None,
                    updated_at: Some(now),
                })
                .returning(SubscriptionEntity::as_returning())
                .get_result::<SubscriptionEntity>(tx)?;

                let continuation = InsertSubscriptionEntity::continuation_of(
                    &previous,
                    transfer.to_vehicle_id,
                    SubscriptionStatus::Active.to_string(),
                    now,
                );
                let subscription = insert_into(subscriptions::table)
                    .values(&continuation)
                    .returning(SubscriptionEntity::as_returning())
                    .get_result::<SubscriptionEntity>(tx)?;

                Ok(TransferOutcome {
                    previous,
                    subscription,
                    transfer: audit,
                })
            })?;

            Ok(outcome)
        })
        .await?
    }

    async fn update_status(
        &self,
        subscription_id: i64,
        expected: SubscriptionStatus,
        status: SubscriptionStatus,
        cancellation_date: Option<DateTime<Utc>>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<SubscriptionEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Option<SubscriptionEntity>> {
            let mut conn = db_pool.get()?;

            let subscription = update(
                subscriptions::table
                    .filter(subscriptions::id.eq(subscription_id))
                    .filter(subscriptions::status.eq(expected.to_string())),
            )
            .set(&UpdateSubscriptionStatusEntity {
                status: status.to_string(),
                cancellation_date,
                updated_at: Some(updated_at),
            })
            .returning(SubscriptionEntity::as_returning())
            .get_result::<SubscriptionEntity>(&mut conn)
            .optional()?;

            Ok(subscription)
        })
        .await?
    }
}
