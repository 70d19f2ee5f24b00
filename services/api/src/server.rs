use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_funnel_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fire_funnel::config::{AppConfig, BackendConfig};
use fire_funnel::error::AppError;
use fire_funnel::telemetry;
use fire_funnel::workflows::funnel::{FunnelService, HttpBackend};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(backend_url) = args.backend_url.take() {
        config.backend = BackendConfig::new(backend_url, config.backend.timeout)?;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let backend = Arc::new(HttpBackend::new(&config.backend)?);
    let funnel_service = Arc::new(FunnelService::new(backend));

    let app = with_funnel_routes(funnel_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        backend = %config.backend.base_url,
        "fire funnel api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
