use axum::{
    middleware::from_fn,
    routing::{delete, get, post, put},
    Router,
};
use spends_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    actions, app::health_check, dashboard, dictionaries, distribution, export_contracts,
    metrics::metrics, notifications, requests, sub_registrar, workflow,
};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // Requests
        .route(
            "/requests",
            get(requests::list_requests).post(requests::create_request),
        )
        .route("/requests/statistics", get(requests::request_statistics))
        .route(
            "/requests/:id",
            get(requests::get_request).put(requests::update_request),
        )
        .route("/requests/:id/events", get(requests::request_events))
        .route(
            "/requests/:id/check-splits",
            post(requests::check_request_splits),
        )
        .route(
            "/requests/:id/check-allocations",
            post(requests::check_request_allocations),
        )
        // Workflow actions
        .route("/requests/:id/submit", post(actions::submit))
        .route("/requests/:id/classify", post(actions::classify))
        .route("/requests/:id/approve", post(actions::approve))
        .route(
            "/requests/:id/approve-on-behalf",
            post(actions::approve_on_behalf),
        )
        .route("/requests/:id/return", post(actions::return_request))
        .route("/requests/:id/decline", post(actions::decline))
        .route("/requests/:id/add-to-registry", post(actions::add_to_registry))
        .route(
            "/requests/:id/send-to-distributor",
            post(actions::send_to_distributor),
        )
        .route("/requests/:id/status", post(actions::change_status))
        // Workflow model
        .route("/workflow/statuses", get(workflow::list_statuses))
        .route("/workflow/statuses/:status", get(workflow::get_status))
        .route("/workflow/transitions/:status", get(workflow::transitions))
        // Dashboards
        .route("/dashboard/:role", get(dashboard::role_dashboard))
        .route("/dashboard/:role/recent", get(dashboard::recent))
        .route("/dashboard/:role/backend", get(dashboard::backend_metrics))
        // Notifications
        .route(
            "/notifications",
            get(notifications::list_notifications).delete(notifications::clear_notifications),
        )
        .route("/notifications/:id/read", post(notifications::mark_read))
        // Dictionaries
        .route(
            "/dictionaries/:kind",
            get(dictionaries::list_dictionary).post(dictionaries::create_dictionary_entry),
        )
        .route(
            "/dictionaries/:kind/cache",
            delete(dictionaries::invalidate_dictionary),
        )
        .route(
            "/dictionaries/:kind/:id",
            get(dictionaries::get_dictionary_entry)
                .put(dictionaries::update_dictionary_entry)
                .delete(dictionaries::delete_dictionary_entry),
        )
        // Distribution
        .route(
            "/distribution/contract-status/:counterparty_id",
            get(distribution::contract_status),
        )
        .route(
            "/distribution/sub-registrars",
            get(distribution::sub_registrars),
        )
        .route(
            "/distribution/pending-requests",
            get(distribution::pending_requests),
        )
        .route(
            "/distribution/expense-splits/:request_id",
            get(distribution::expense_splits),
        )
        .route("/distribution/classify", post(distribution::classify))
        .route("/distribution/return", post(distribution::return_request))
        .route(
            "/distribution/send-requests",
            post(distribution::send_requests),
        )
        .route(
            "/distribution/split-request",
            post(distribution::split_request),
        )
        // Sub-registrar
        .route(
            "/sub-registrar/assignments",
            get(sub_registrar::assignments),
        )
        .route("/sub-registrar/reports", get(sub_registrar::reports))
        .route(
            "/sub-registrar/reports/:request_id",
            get(sub_registrar::report),
        )
        .route("/sub-registrar/save-draft", post(sub_registrar::save_draft))
        .route(
            "/sub-registrar/publish-report",
            post(sub_registrar::publish_report),
        )
        .route(
            "/sub-registrar/closing-docs/:request_id",
            post(sub_registrar::save_closing_docs),
        )
        // Export contracts and distributor requests
        .route(
            "/export-contracts",
            get(export_contracts::list_export_contracts)
                .post(export_contracts::create_export_contract),
        )
        .route(
            "/export-contracts/:id",
            get(export_contracts::get_export_contract)
                .put(export_contracts::update_export_contract)
                .delete(export_contracts::delete_export_contract),
        )
        .route(
            "/distributor/requests",
            get(export_contracts::distributor_requests),
        )
        .route(
            "/distributor/requests/:id",
            get(export_contracts::distributor_request),
        )
        .route(
            "/distributor/requests/:id/enriched",
            get(export_contracts::enriched_request),
        )
        .route(
            "/distributor/requests/:id/export-contract",
            put(export_contracts::link_export_contract),
        );

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest("/api", api)
        .layer(from_fn(security_headers_middleware))
        .layer(CorsLayer::permissive())
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
