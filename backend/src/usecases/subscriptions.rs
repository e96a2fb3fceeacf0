use chrono::Utc;
use portal::domain::{
    repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
    value_objects::{
        enums::subscription_statuses::{SubscriptionAction, SubscriptionStatus, Transition},
        subscriptions::{
            CreateSubscriptionModel, CreatedSubscriptionDto, SubscriptionDto,
            TransferSubscriptionModel, TransferredSubscriptionDto,
        },
    },
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::usecases::{
    action_errors::{ActionError, ActionResult},
    plan_catalog::PlanCatalogUseCase,
};

const CREATE_FAILED: &str = "Failed to create subscription. Please try again.";
const TRANSFER_FAILED: &str = "Failed to transfer subscription. Please try again.";
const CANCEL_FAILED: &str = "Failed to cancel subscription. Please try again.";
const SUBSCRIPTION_NOT_FOUND: &str = "Subscription not found";
const STATUS_CHANGED: &str = "Subscription was changed by another request. Please reload.";

pub struct SubscriptionUseCase<S, P>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    subscription_repository: Arc<S>,
    plan_catalog: Arc<PlanCatalogUseCase<P>>,
}

impl<S, P> SubscriptionUseCase<S, P>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    pub fn new(subscription_repository: Arc<S>, plan_catalog: Arc<PlanCatalogUseCase<P>>) -> Self {
        Self {
            subscription_repository,
            plan_catalog,
        }
    }

    pub async fn create(&self, model: CreateSubscriptionModel) -> ActionResult<CreatedSubscriptionDto> {
        model.validate_fields()?;

        let plan = self
            .plan_catalog
            .find_plan(model.plan_id)
            .await
            .map_err(|err| {
                error!(plan_id = model.plan_id, db_error = ?err, "subscriptions: plan catalog unavailable");
                ActionError::persistence(CREATE_FAILED, err)
            })?
            .ok_or_else(|| {
                warn!(plan_id = model.plan_id, status = 422, "subscriptions: unknown plan");
                ActionError::field("plan_id", "Invalid plan selected")
            })?;

        let now = Utc::now();
        let (subscription, payment) = self
            .subscription_repository
            .create_with_opening_payment(model.to_entity(&plan, now), model.to_opening_payment(&plan, now))
            .await
            .map_err(|err| {
                error!(
                    user_id = model.user_id,
                    vehicle_id = model.vehicle_id,
                    plan_id = plan.id,
                    db_error = ?err,
                    "subscriptions: failed to create subscription"
                );
                ActionError::persistence(CREATE_FAILED, err)
            })?;

        info!(
            subscription_id = subscription.id,
            payment_id = payment.id,
            user_id = subscription.user_id,
            vehicle_id = subscription.vehicle_id,
            plan = %plan.name,
            "subscriptions: created"
        );

        Ok(CreatedSubscriptionDto {
            subscription: subscription.into(),
            payment: payment.into(),
        })
    }

    pub async fn transfer(
        &self,
        model: TransferSubscriptionModel,
    ) -> ActionResult<TransferredSubscriptionDto> {
        model.validate_fields()?;

        let subscription = self
            .subscription_repository
            .find_by_id(model.subscription_id)
            .await
            .map_err(|err| {
                error!(subscription_id = model.subscription_id, db_error = ?err, "subscriptions: lookup failed");
                ActionError::persistence(TRANSFER_FAILED, err)
            })?
            .ok_or(ActionError::NotFound {
                field: "subscription_id",
                message: SUBSCRIPTION_NOT_FOUND,
            })?;

        if subscription.vehicle_id != model.from_vehicle_id {
            warn!(
                subscription_id = subscription.id,
                vehicle_id = subscription.vehicle_id,
                from_vehicle_id = model.from_vehicle_id,
                status = 422,
                "subscriptions: transfer source vehicle mismatch"
            );
            return Err(ActionError::field(
                "from_vehicle_id",
                "Subscription does not belong to this vehicle",
            ));
        }

        let retired_status = match SubscriptionStatus::from_stored(&subscription.status)
            .apply(SubscriptionAction::Transfer)
        {
            Ok(Transition::To(next)) => next,
            Ok(Transition::Unchanged) => {
                return Err(ActionError::field(
                    "subscription_id",
                    "Subscription has already been transferred",
                ));
            }
            Err(rejected) => {
                warn!(
                    subscription_id = subscription.id,
                    current_status = %subscription.status,
                    status = 422,
                    "subscriptions: transfer rejected"
                );
                return Err(ActionError::field("subscription_id", rejected.to_string()));
            }
        };

        let outcome = self
            .subscription_repository
            .transfer(model.to_transfer_entity(Utc::now()), retired_status)
            .await
            .map_err(|err| {
                error!(
                    subscription_id = model.subscription_id,
                    to_vehicle_id = model.to_vehicle_id,
                    db_error = ?err,
                    "subscriptions: failed to transfer subscription"
                );
                ActionError::persistence(TRANSFER_FAILED, err)
            })?;

        info!(
            subscription_id = outcome.previous.id,
            new_subscription_id = outcome.subscription.id,
            from_vehicle_id = outcome.transfer.from_vehicle_id,
            to_vehicle_id = outcome.transfer.to_vehicle_id,
            transferred_by = %outcome.transfer.transferred_by,
            "subscriptions: transferred"
        );

        Ok(outcome.into())
    }

    pub async fn cancel(&self, subscription_id: i64) -> ActionResult<SubscriptionDto> {
        let not_found = ActionError::NotFound {
            field: "subscription_id",
            message: SUBSCRIPTION_NOT_FOUND,
        };
        if subscription_id < 1 {
            return Err(not_found);
        }

        let subscription = self
            .subscription_repository
            .find_by_id(subscription_id)
            .await
            .map_err(|err| {
                error!(subscription_id, db_error = ?err, "subscriptions: lookup failed");
                ActionError::persistence(CANCEL_FAILED, err)
            })?
            .ok_or(not_found)?;

        let current = SubscriptionStatus::from_stored(&subscription.status);
        let next = match current.apply(SubscriptionAction::Cancel) {
            Ok(Transition::To(next)) => next,
            Ok(Transition::Unchanged) => {
                info!(subscription_id, "subscriptions: already inactive, nothing to cancel");
                return Ok(subscription.into());
            }
            Err(rejected) => {
                warn!(
                    subscription_id,
                    current_status = %subscription.status,
                    status = 422,
                    "subscriptions: cancel rejected"
                );
                return Err(ActionError::field("subscription_id", rejected.to_string()));
            }
        };

        let now = Utc::now();
        let cancelled = self
            .subscription_repository
            .update_status(subscription_id, current, next, Some(now), now)
            .await
            .map_err(|err| {
                error!(subscription_id, db_error = ?err, "subscriptions: failed to cancel subscription");
                ActionError::persistence(CANCEL_FAILED, err)
            })?
            .ok_or_else(|| {
                warn!(
                    subscription_id,
                    expected_status = %current,
                    status = 422,
                    "subscriptions: status changed before cancel was written"
                );
                ActionError::field("subscription_id", STATUS_CHANGED)
            })?;

        info!(subscription_id, user_id = cancelled.user_id, "subscriptions: cancelled");

        Ok(cancelled.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use mockall::predicate::{always, eq};
    use portal::domain::{
        entities::{
            payments::{InsertPaymentEntity, PaymentEntity},
            subscription_plans::SubscriptionPlanEntity,
            subscription_transfers::{InsertSubscriptionTransferEntity, SubscriptionTransferEntity},
            subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
        },
        repositories::{plans::MockPlanRepository, subscriptions::MockSubscriptionRepository},
        value_objects::subscriptions::TransferOutcome,
    };

    fn plan_catalog(times: usize) -> Arc<PlanCatalogUseCase<MockPlanRepository>> {
        let mut plan_repo = MockPlanRepository::new();
        plan_repo.expect_list_plans().times(times).returning(|| {
            Ok([("bronze", 2000, 4), ("silver", 3000, 8), ("gold", 4000, 12), ("platinum", 5000, 16)]
                .into_iter()
                .zip(1..)
                .map(|((name, price_minor, washes_per_month), id)| SubscriptionPlanEntity {
                    id,
                    name: name.to_string(),
                    description: None,
                    price_minor,
                    washes_per_month,
                    created_at: Utc::now(),
                })
                .collect())
        });
        Arc::new(PlanCatalogUseCase::new(Arc::new(plan_repo), 300))
    }

    fn stored(entity: InsertSubscriptionEntity, id: i64) -> SubscriptionEntity {
        SubscriptionEntity {
            id,
            user_id: entity.user_id,
            vehicle_id: entity.vehicle_id,
            plan_id: entity.plan_id,
            remaining_washes: entity.remaining_washes,
            status: entity.status,
            billing_period_start: entity.billing_period_start,
            payment_due_date: entity.payment_due_date,
            last_payment_date: entity.last_payment_date,
            last_payment_status: entity.last_payment_status,
            cancellation_date: None,
            created_at: entity.created_at,
            updated_at: None,
            deleted_at: None,
        }
    }

    fn stored_payment(entity: InsertPaymentEntity, id: i64, subscription_id: i64) -> PaymentEntity {
        PaymentEntity {
            id,
            user_id: entity.user_id,
            payment_method_id: entity.payment_method_id,
            item_type: entity.item_type,
            subscription_id: Some(subscription_id),
            wash_id: None,
            coupon_id: None,
            base_amount_minor: entity.base_amount_minor,
            discount_amount_minor: entity.discount_amount_minor,
            final_amount_minor: entity.final_amount_minor,
            status: entity.status,
            status_reason: None,
            created_at: entity.created_at,
            updated_at: None,
            deleted_at: None,
        }
    }

    fn existing(id: i64, vehicle_id: i64, status: &str) -> SubscriptionEntity {
        let start: DateTime<Utc> = Utc::now() - Duration::days(10);
        SubscriptionEntity {
            id,
            user_id: 1,
            vehicle_id,
            plan_id: 2,
            remaining_washes: 5,
            status: status.to_string(),
            billing_period_start: start,
            payment_due_date: start + Duration::days(30),
            last_payment_date: Some(start),
            last_payment_status: Some("paid".to_string()),
            cancellation_date: None,
            created_at: start,
            updated_at: None,
            deleted_at: None,
        }
    }

    fn silver_request() -> CreateSubscriptionModel {
        CreateSubscriptionModel {
            user_id: 1,
            vehicle_id: 10,
            plan_id: 2,
            payment_method_id: 5,
        }
    }

    #[tokio::test]
    async fn create_opens_silver_subscription_with_paid_payment() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_create_with_opening_payment()
            .withf(|subscription, payment| {
                subscription.plan_id == 2
                    && subscription.remaining_washes == 8
                    && payment.final_amount_minor == 3000
                    && payment.payment_method_id == 5
            })
            .times(1)
            .returning(|subscription, payment| {
                Ok((stored(subscription, 42), stored_payment(payment, 900, 42)))
            });

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), plan_catalog(1));
        let created = usecase.create(silver_request()).await.unwrap();

        assert_eq!(created.subscription.remaining_washes, 8);
        assert_eq!(created.subscription.status, "active");
        assert_eq!(created.subscription.vehicle_id, 10);
        assert_eq!(created.payment.final_amount, "30.00");
        assert_eq!(created.payment.status, "paid");
        assert_eq!(created.payment.item_type, "subscription");
        assert_eq!(created.payment.subscription_id, Some(42));
    }

    #[tokio::test]
    async fn create_rejects_unknown_plan_without_writing() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo.expect_create_with_opening_payment().never();

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), plan_catalog(1));
        let err = usecase
            .create(CreateSubscriptionModel {
                plan_id: 9,
                ..silver_request()
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.field_errors().get("plan_id"),
            Some(&["Invalid plan selected".to_string()][..])
        );
    }

    #[tokio::test]
    async fn create_validates_before_touching_the_catalog() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo.expect_create_with_opening_payment().never();

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), plan_catalog(0));
        let err = usecase
            .create(CreateSubscriptionModel {
                vehicle_id: 0,
                ..silver_request()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ActionError::Validation(_)));
        assert!(err.field_errors().get("vehicle_id").is_some());
    }

    #[tokio::test]
    async fn create_surfaces_constraint_violation_as_form_error() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_create_with_opening_payment()
            .returning(|_, _| {
                Err(anyhow::anyhow!(
                    "duplicate key value violates unique constraint \"subscriptions_one_active_per_vehicle\""
                ))
            });

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), plan_catalog(1));
        let err = usecase.create(silver_request()).await.unwrap_err();

        assert!(matches!(err, ActionError::Persistence { .. }));
        assert_eq!(
            err.field_errors().get("form"),
            Some(&["Failed to create subscription. Please try again.".to_string()][..])
        );
    }

    fn transfer_request() -> TransferSubscriptionModel {
        TransferSubscriptionModel {
            subscription_id: 7,
            from_vehicle_id: 10,
            to_vehicle_id: 11,
            transfer_reason: Some("Customer sold the car".to_string()),
            transferred_by: None,
        }
    }

    #[tokio::test]
    async fn transfer_moves_subscription_to_new_vehicle() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_by_id()
            .with(eq(7))
            .returning(|_| Ok(Some(existing(7, 10, "active"))));
        subscription_repo
            .expect_transfer()
            .with(always(), eq(SubscriptionStatus::Transferred))
            .times(1)
            .returning(|transfer: InsertSubscriptionTransferEntity, retired| {
                let mut previous = existing(7, 10, "active");
                previous.status = retired.to_string();
                let mut subscription = existing(8, transfer.to_vehicle_id, "active");
                subscription.remaining_washes = previous.remaining_washes;
                Ok(TransferOutcome {
                    previous,
                    subscription,
                    transfer: SubscriptionTransferEntity {
                        id: 1,
                        subscription_id: transfer.subscription_id,
                        from_vehicle_id: transfer.from_vehicle_id,
                        to_vehicle_id: transfer.to_vehicle_id,
                        transfer_reason: transfer.transfer_reason,
                        transferred_at: transfer.transferred_at,
                        transferred_by: transfer.transferred_by,
                        created_at: transfer.created_at,
                    },
                })
            });

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), plan_catalog(0));
        let transferred = usecase.transfer(transfer_request()).await.unwrap();

        assert_eq!(transferred.previous.id, 7);
        assert_eq!(transferred.previous.status, "transferred");
        assert_eq!(transferred.subscription.vehicle_id, 11);
        assert_eq!(transferred.subscription.status, "active");
        assert_eq!(transferred.subscription.remaining_washes, 5);
        assert_eq!(transferred.transfer.subscription_id, 7);
        assert_eq!(transferred.transfer.from_vehicle_id, 10);
        assert_eq!(transferred.transfer.to_vehicle_id, 11);
        assert_eq!(transferred.transfer.transferred_by, "system");
    }

    #[tokio::test]
    async fn transfer_of_missing_subscription_is_not_found() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo.expect_find_by_id().returning(|_| Ok(None));
        subscription_repo.expect_transfer().never();

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), plan_catalog(0));
        let err = usecase.transfer(transfer_request()).await.unwrap_err();

        assert!(matches!(err, ActionError::NotFound { field: "subscription_id", .. }));
    }

    #[tokio::test]
    async fn transfer_from_wrong_vehicle_is_rejected() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(existing(7, 12, "active"))));
        subscription_repo.expect_transfer().never();

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), plan_catalog(0));
        let err = usecase.transfer(transfer_request()).await.unwrap_err();

        assert!(err.field_errors().get("from_vehicle_id").is_some());
    }

    #[tokio::test]
    async fn transfer_of_overdue_subscription_is_rejected() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(existing(7, 10, "overdue"))));
        subscription_repo.expect_transfer().never();

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), plan_catalog(0));
        let err = usecase.transfer(transfer_request()).await.unwrap_err();

        assert_eq!(
            err.field_errors().get("subscription_id"),
            Some(&["Cannot transfer a subscription that is overdue".to_string()][..])
        );
    }

    #[tokio::test]
    async fn cancel_marks_subscription_inactive() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_by_id()
            .with(eq(7))
            .returning(|_| Ok(Some(existing(7, 10, "active"))));
        subscription_repo
            .expect_update_status()
            .with(
                eq(7),
                eq(SubscriptionStatus::Active),
                eq(SubscriptionStatus::Inactive),
                always(),
                always(),
            )
            .times(1)
            .returning(|id, _, status, cancellation_date, _| {
                let mut subscription = existing(id, 10, &status.to_string());
                subscription.cancellation_date = cancellation_date;
                Ok(Some(subscription))
            });

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), plan_catalog(0));
        let cancelled = usecase.cancel(7).await.unwrap();

        assert_eq!(cancelled.status, "inactive");
        assert!(cancelled.cancellation_date.is_some());
        assert_eq!(cancelled.remaining_washes, 5);
    }

    #[tokio::test]
    async fn cancelling_inactive_subscription_writes_nothing() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(existing(7, 10, "inactive"))));
        subscription_repo.expect_update_status().never();

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), plan_catalog(0));
        let result = usecase.cancel(7).await.unwrap();

        assert_eq!(result.status, "inactive");
    }

    #[tokio::test]
    async fn cancelling_unknown_subscription_is_not_found() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo.expect_find_by_id().returning(|_| Ok(None));

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), plan_catalog(0));
        let err = usecase.cancel(404).await.unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
        assert_eq!(
            err.field_errors().get("subscription_id"),
            Some(&["Subscription not found".to_string()][..])
        );
    }

    #[tokio::test]
    async fn cancelling_transferred_subscription_is_rejected() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(existing(7, 10, "transferred"))));
        subscription_repo.expect_update_status().never();

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), plan_catalog(0));
        let err = usecase.cancel(7).await.unwrap_err();

        assert!(matches!(err, ActionError::Validation(_)));
    }

    #[tokio::test]
    async fn cancel_losing_to_concurrent_transfer_is_rejected() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(existing(7, 10, "active"))));
        subscription_repo
            .expect_update_status()
            .with(
                eq(7),
                eq(SubscriptionStatus::Active),
                eq(SubscriptionStatus::Inactive),
                always(),
                always(),
            )
            .times(1)
            .returning(|_, _, _, _, _| Ok(None));

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), plan_catalog(0));
        let err = usecase.cancel(7).await.unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.field_errors().get("subscription_id"),
            Some(&[STATUS_CHANGED.to_string()][..])
        );
    }
}
