use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
    routing::post,
};
use portal::{
    domain::{repositories::vehicles::VehicleRepository, value_objects::vehicles::CreateVehicleModel},
    infra::db::{postgres::postgres_connection::PgPoolSquad, repositories::vehicles::VehiclePostgres},
};

use crate::{
    axum_http::action_responses::{action_response, rejected_body},
    usecases::vehicles::VehicleUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let vehicle_repository = VehiclePostgres::new(Arc::clone(&db_pool));
    let vehicle_usecase = VehicleUseCase::new(Arc::new(vehicle_repository));

    Router::new()
        .route("/", post(create::<VehiclePostgres>))
        .with_state(Arc::new(vehicle_usecase))
}

pub async fn create<T>(
    State(vehicle_usecase): State<Arc<VehicleUseCase<T>>>,
    body: Result<Json<CreateVehicleModel>, JsonRejection>,
) -> Response
where
    T: VehicleRepository + Send + Sync + 'static,
{
    let Json(model) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected_body(rejection),
    };

    action_response(vehicle_usecase.create(model).await, StatusCode::CREATED)
}
