use crate::{
    axum_http::{default_routers, routers},
    config::config_model::DotEnvyConfig,
    usecases::plan_catalog::PlanCatalogUseCase,
};
use anyhow::Result;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use portal::infra::db::{
    postgres::postgres_connection::PgPoolSquad, repositories::plans::PlanPostgres,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let plan_catalog = Arc::new(PlanCatalogUseCase::new(
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        config.plan_catalog.ttl_seconds,
    ));
    let catalog = plan_catalog.refresh().await?;
    info!(
        version = catalog.version,
        plans = catalog.plans.len(),
        "Plan catalog has been loaded"
    );

    let app = app(&config, db_pool, plan_catalog)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn app(
    config: &DotEnvyConfig,
    db_pool: Arc<PgPoolSquad>,
    plan_catalog: Arc<PlanCatalogUseCase<PlanPostgres>>,
) -> Result<Router> {
    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest("/api/v1/dashboard", routers::dashboard::routes(Arc::clone(&db_pool)))
        .nest("/api/v1/users", routers::users::routes(Arc::clone(&db_pool)))
        .nest("/api/v1/vehicles", routers::vehicles::routes(Arc::clone(&db_pool)))
        .nest(
            "/api/v1/payment-methods",
            routers::payment_methods::routes(Arc::clone(&db_pool)),
        )
        .nest("/api/v1/plans", routers::plans::routes(Arc::clone(&plan_catalog)))
        .nest(
            "/api/v1/subscriptions",
            routers::subscriptions::routes(Arc::clone(&db_pool), plan_catalog),
        )
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
