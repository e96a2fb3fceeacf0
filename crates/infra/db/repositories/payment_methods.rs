use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use tokio::task;

use crate::{
    domain::{
        entities::payment_methods::{InsertPaymentMethodEntity, PaymentMethodEntity},
        repositories::payment_methods::PaymentMethodRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::payment_methods},
};

pub struct PaymentMethodPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentMethodPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentMethodRepository for PaymentMethodPostgres {
    async fn create(
        &self,
        payment_method: InsertPaymentMethodEntity,
    ) -> Result<PaymentMethodEntity> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<PaymentMethodEntity> {
            let mut conn = db_pool.get()?;

            let created = conn.transaction::<_, diesel::result::Error, _>(|tx| {
                if payment_method.is_default {
                    update(
                        payment_methods::table
                            .filter(payment_methods::user_id.eq(payment_method.user_id))
                            .filter(payment_methods::is_default.eq(true)),
                    )
                    .set((
                        payment_methods::is_default.eq(false),
                        payment_methods::updated_at.eq(Some(payment_method.created_at)),
                    ))
                    .execute(tx)?;
                }

                insert_into(payment_methods::table)
                    .values(&payment_method)
                    .returning(PaymentMethodEntity::as_returning())
                    .get_result::<PaymentMethodEntity>(tx)
            })?;

            Ok(created)
        })
        .await?
    }
}
