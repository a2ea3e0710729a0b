use super::parse_role;
use crate::dashboard::{dashboard_for, recent_requests, RequestFilter, RoleDashboard};
use crate::models::PaymentRequest;
use crate::services::payment_requests::RequestListQuery;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use spends_core::error::AppError;

const DEFAULT_RECENT_LIMIT: usize = 5;

/// Counters for a role's dashboard, computed from the live request list.
#[tracing::instrument(skip(state))]
pub async fn role_dashboard(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Result<Json<RoleDashboard>, AppError> {
    let role = parse_role(&role)?;
    let requests = state
        .requests
        .list(&RequestListQuery {
            role: Some(role),
            ..Default::default()
        })
        .await?;

    let now = Utc::now();
    Ok(Json(dashboard_for(
        role,
        &requests,
        now.date_naive(),
        now,
        state.dashboard,
    )))
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentParams {
    pub filter: Option<RequestFilter>,
    pub limit: Option<usize>,
}

#[tracing::instrument(skip(state))]
pub async fn recent(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Query(params): Query<RecentParams>,
) -> Result<Json<Vec<PaymentRequest>>, AppError> {
    let role = parse_role(&role)?;
    let requests = state
        .requests
        .list(&RequestListQuery {
            role: Some(role),
            ..Default::default()
        })
        .await?;

    Ok(Json(recent_requests(
        role,
        &requests,
        params.filter,
        Utc::now().date_naive(),
        params.limit.unwrap_or(DEFAULT_RECENT_LIMIT),
    )))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendMetricsParams {
    pub user_id: Option<String>,
}

/// The backend's own dashboard figures, passed through.
pub async fn backend_metrics(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Query(params): Query<BackendMetricsParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let role = parse_role(&role)?;
    Ok(Json(
        state
            .requests
            .dashboard_metrics(Some(role), params.user_id.as_deref())
            .await?,
    ))
}
