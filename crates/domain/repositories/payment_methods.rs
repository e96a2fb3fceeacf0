use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::payment_methods::{InsertPaymentMethodEntity, PaymentMethodEntity};

#[automock]
#[async_trait]
pub trait PaymentMethodRepository {
    /// Inserts the method. When it is the new default, the user's previous
    /// default is demoted in the same transaction.
    async fn create(&self, payment_method: InsertPaymentMethodEntity)
    -> Result<PaymentMethodEntity>;
}
