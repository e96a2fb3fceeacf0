use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::Response,
    routing::post,
};
use portal::{
    domain::{
        repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
        value_objects::subscriptions::{CreateSubscriptionModel, TransferSubscriptionModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{plans::PlanPostgres, subscriptions::SubscriptionPostgres},
    },
};

use crate::{
    axum_http::action_responses::{action_response, rejected_body},
    usecases::{plan_catalog::PlanCatalogUseCase, subscriptions::SubscriptionUseCase},
};

pub fn routes(db_pool: Arc<PgPoolSquad>, plan_catalog: Arc<PlanCatalogUseCase<PlanPostgres>>) -> Router {
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let subscription_usecase =
        SubscriptionUseCase::new(Arc::new(subscription_repository), plan_catalog);

    Router::new()
        .route("/", post(create::<SubscriptionPostgres, PlanPostgres>))
        .route("/transfer", post(transfer::<SubscriptionPostgres, PlanPostgres>))
        .route("/:id/cancel", post(cancel::<SubscriptionPostgres, PlanPostgres>))
        .with_state(Arc::new(subscription_usecase))
}

pub async fn create<S, P>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S, P>>>,
    body: Result<Json<CreateSubscriptionModel>, JsonRejection>,
) -> Response
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    let Json(model) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected_body(rejection),
    };

    action_response(subscription_usecase.create(model).await, StatusCode::CREATED)
}

pub async fn transfer<S, P>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S, P>>>,
    body: Result<Json<TransferSubscriptionModel>, JsonRejection>,
) -> Response
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    let Json(model) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected_body(rejection),
    };

    action_response(subscription_usecase.transfer(model).await, StatusCode::CREATED)
}

pub async fn cancel<S, P>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<S, P>>>,
    path: Result<Path<i64>, PathRejection>,
) -> Response
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    let Path(subscription_id) = match path {
        Ok(path) => path,
        Err(rejection) => return rejected_body(rejection),
    };

    action_response(subscription_usecase.cancel(subscription_id).await, StatusCode::OK)
}
