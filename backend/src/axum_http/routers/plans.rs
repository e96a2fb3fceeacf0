use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use portal::{domain::repositories::plans::PlanRepository, infra::db::repositories::plans::PlanPostgres};
use tracing::info;

use crate::{axum_http::error_responses::AppError, usecases::plan_catalog::PlanCatalogUseCase};

pub fn routes(plan_catalog: Arc<PlanCatalogUseCase<PlanPostgres>>) -> Router {
    Router::new()
        .route("/", get(list::<PlanPostgres>))
        .route("/refresh", post(refresh::<PlanPostgres>))
        .with_state(plan_catalog)
}

pub async fn list<T>(State(plan_catalog): State<Arc<PlanCatalogUseCase<T>>>) -> Response
where
    T: PlanRepository + Send + Sync + 'static,
{
    match plan_catalog.snapshot().await {
        Ok(catalog) => (StatusCode::OK, Json(catalog.to_dto())).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn refresh<T>(State(plan_catalog): State<Arc<PlanCatalogUseCase<T>>>) -> Response
where
    T: PlanRepository + Send + Sync + 'static,
{
    match plan_catalog.refresh().await {
        Ok(catalog) => {
            info!(version = catalog.version, "plans: catalog refreshed on request");
            (StatusCode::OK, Json(catalog.to_dto())).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}
