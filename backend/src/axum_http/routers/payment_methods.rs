use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
    routing::post,
};
use portal::{
    domain::{
        repositories::payment_methods::PaymentMethodRepository,
        value_objects::payment_methods::CreatePaymentMethodModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::payment_methods::PaymentMethodPostgres,
    },
};

use crate::{
    axum_http::action_responses::{action_response, rejected_body},
    usecases::payment_methods::PaymentMethodUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let payment_method_repository = PaymentMethodPostgres::new(Arc::clone(&db_pool));
    let payment_method_usecase = PaymentMethodUseCase::new(Arc::new(payment_method_repository));

    Router::new()
        .route("/", post(create::<PaymentMethodPostgres>))
        .with_state(Arc::new(payment_method_usecase))
}

pub async fn create<T>(
    State(payment_method_usecase): State<Arc<PaymentMethodUseCase<T>>>,
    body: Result<Json<CreatePaymentMethodModel>, JsonRejection>,
) -> Response
where
    T: PaymentMethodRepository + Send + Sync + 'static,
{
    let Json(model) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected_body(rejection),
    };

    action_response(payment_method_usecase.create(model).await, StatusCode::CREATED)
}
