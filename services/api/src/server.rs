use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState};
use crate::routes::with_allocation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bed_allocator::config::AppConfig;
use bed_allocator::error::AppError;
use bed_allocator::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    args.dataset.apply(&mut config);

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let allocation_service = build_service(&config.allocation);
    if let Err(err) = allocation_service.refresh() {
        // serve anyway; POST /api/v1/forecast/refresh can load it later
        warn!(
            error = %err,
            forecast = %config.allocation.forecast_csv.display(),
            distances = %config.allocation.distance_csv.display(),
            "starting without a forecast dataset"
        );
    }

    let app = with_allocation_routes(allocation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        policy = %config.allocation.severity_policy,
        "bed allocation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
