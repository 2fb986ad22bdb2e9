use crate::cli::ServeArgs;
use crate::infra::{seed_demo_data, AppState};
use crate::routes::with_registrar_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use campus_ops::config::AppConfig;
use campus_ops::error::AppError;
use campus_ops::registrar::{EnrollmentService, MemoryStore};
use campus_ops::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(MemoryStore::default());
    if args.seed_demo {
        seed_demo_data(&store);
        info!("in-memory store seeded with demo roster");
    }
    let service = Arc::new(EnrollmentService::new(store));

    let app = with_registrar_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "enrollment backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}
