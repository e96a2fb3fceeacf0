use chrono::Utc;
use portal::domain::{
    repositories::payment_methods::PaymentMethodRepository,
    value_objects::payment_methods::{CreatePaymentMethodModel, PaymentMethodDto},
};
use std::sync::Arc;
use tracing::{error, info};

use crate::usecases::action_errors::{ActionError, ActionResult};

pub struct PaymentMethodUseCase<M>
where
    M: PaymentMethodRepository + Send + Sync + 'static,
{
    payment_method_repository: Arc<M>,
}

impl<M> PaymentMethodUseCase<M>
where
    M: PaymentMethodRepository + Send + Sync + 'static,
{
    pub fn new(payment_method_repository: Arc<M>) -> Self {
        Self {
            payment_method_repository,
        }
    }

    pub async fn create(&self, model: CreatePaymentMethodModel) -> ActionResult<PaymentMethodDto> {
        let now = Utc::now();
        model.validate_at(now)?;

        let payment_method = self
            .payment_method_repository
            .create(model.to_entity(now))
            .await
            .map_err(|err| {
                error!(
                    user_id = model.user_id,
                    db_error = ?err,
                    "payment_methods: failed to create payment method"
                );
                ActionError::persistence("Failed to add payment method. Please try again.", err)
            })?;

        info!(
            payment_method_id = payment_method.id,
            user_id = payment_method.user_id,
            is_default = payment_method.is_default,
            "payment_methods: created"
        );

        Ok(payment_method.into())
    }
}
