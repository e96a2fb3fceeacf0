use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use portal::{
    domain::repositories::dashboard::DashboardRepository,
    infra::db::{postgres::postgres_connection::PgPoolSquad, repositories::dashboard::DashboardPostgres},
};

use crate::{axum_http::error_responses::AppError, usecases::dashboard::DashboardUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let dashboard_repository = DashboardPostgres::new(Arc::clone(&db_pool));
    let dashboard_usecase = DashboardUseCase::new(Arc::new(dashboard_repository));

    Router::new()
        .route("/header", get(header::<DashboardPostgres>))
        .route("/metrics", get(metrics::<DashboardPostgres>))
        .with_state(Arc::new(dashboard_usecase))
}

pub async fn header<T>(State(dashboard_usecase): State<Arc<DashboardUseCase<T>>>) -> Response
where
    T: DashboardRepository + Send + Sync + 'static,
{
    match dashboard_usecase.header_metrics().await {
        Ok(metrics) => (StatusCode::OK, Json(metrics)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn metrics<T>(State(dashboard_usecase): State<Arc<DashboardUseCase<T>>>) -> Response
where
    T: DashboardRepository + Send + Sync + 'static,
{
    match dashboard_usecase.metrics().await {
        Ok(metrics) => (StatusCode::OK, Json(metrics)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
