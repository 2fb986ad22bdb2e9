use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use campus_ops::registrar::{registrar_router, EnrollmentService, MemoryStore};

pub(crate) fn with_registrar_routes(service: Arc<EnrollmentService<MemoryStore>>) -> axum::Router {
    registrar_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusHandle;
    use std::sync::atomic::AtomicBool;
    use std::sync::OnceLock;
    use tower::ServiceExt;

    // The Prometheus recorder is process-global; install it once and share
    // the handle across tests.
    fn metrics_handle() -> Arc<PrometheusHandle> {
        static HANDLE: OnceLock<Arc<PrometheusHandle>> = OnceLock::new();
        HANDLE
            .get_or_init(|| {
                let (_, handle) = axum_prometheus::PrometheusMetricLayer::pair();
                Arc::new(handle)
            })
            .clone()
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let service = Arc::new(EnrollmentService::new(Arc::new(MemoryStore::default())));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: metrics_handle(),
        };
        let app = with_registrar_routes(service).layer(Extension(state));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let service = Arc::new(EnrollmentService::new(Arc::new(MemoryStore::default())));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: metrics_handle(),
        };
        let app = with_registrar_routes(service).layer(Extension(state));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
