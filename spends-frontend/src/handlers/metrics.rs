use axum::http::header;
use axum::response::IntoResponse;

/// Prometheus text exposition: HTTP, backend-call and workflow-action series.
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::services::metrics::get_metrics(),
    )
}
