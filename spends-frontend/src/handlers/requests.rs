use super::parse_role;
use crate::dashboard::{filter_requests, ListCriteria, RequestFilter};
use crate::models::{
    Contract, ExpenseSplit, NewPaymentRequest, Normative, PaymentAllocation, PaymentRequest,
    PaymentRequestStatus, RequestEvent, RequestStatistics,
};
use crate::services::payment_requests::RequestListQuery;
use crate::validation::{
    check_allocations, check_splits, validate_new_request, AllocationBalance, NormativeReport,
    SplitBalance,
};
use crate::workflow::{
    distribution_status, estimated_time_remaining, progress_percentage, workflow_bottlenecks,
    workflow_progress, StatusDescriptor, WorkflowProgress,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use spends_core::error::AppError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub role: Option<String>,
    pub filter: Option<RequestFilter>,
    pub search: Option<String>,
    pub counterparty_id: Option<String>,
    pub status: Option<PaymentRequestStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub responsible_registrar_id: Option<String>,
}

/// Role-scoped request list. Without a role the backend list is returned as is.
#[tracing::instrument(skip(state))]
pub async fn list_requests(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<PaymentRequest>>, AppError> {
    let role = params.role.as_deref().map(parse_role).transpose()?;

    let query = RequestListQuery {
        status: params.status.map(|s| s.as_str().to_string()),
        role,
        date_from: params.date_from,
        date_to: params.date_to,
        responsible_registrar_id: params.responsible_registrar_id,
    };
    let requests = state.requests.list(&query).await?;

    let Some(role) = role else {
        return Ok(Json(requests));
    };

    let criteria = ListCriteria {
        filter: params.filter,
        search: params.search,
        counterparty_id: params.counterparty_id,
        status: params.status,
    };
    let today = Utc::now().date_naive();

    Ok(Json(filter_requests(role, &requests, &criteria, today)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetail {
    pub request: PaymentRequest,
    pub workflow: StatusDescriptor,
    pub progress: WorkflowProgress,
    pub progress_percentage: u8,
    pub estimated_time_remaining: String,
    pub bottlenecks: Vec<String>,
}

#[tracing::instrument(skip(state))]
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RequestDetail>, AppError> {
    let request = state.requests.get(&id).await?;
    let progress = workflow_progress(&request.id, request.status, distribution_status(request.status));

    Ok(Json(RequestDetail {
        workflow: StatusDescriptor::of(request.status),
        progress_percentage: progress_percentage(&progress),
        estimated_time_remaining: estimated_time_remaining(&progress),
        bottlenecks: workflow_bottlenecks(&progress),
        progress,
        request,
    }))
}

#[tracing::instrument(skip(state, request))]
pub async fn create_request(
    State(state): State<AppState>,
    Json(request): Json<NewPaymentRequest>,
) -> Result<(StatusCode, Json<PaymentRequest>), AppError> {
    let created = state.actions.create(&request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[tracing::instrument(skip(state, request))]
pub async fn update_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<NewPaymentRequest>,
) -> Result<Json<PaymentRequest>, AppError> {
    let errors = validate_new_request(&request);
    if !errors.is_empty() {
        return Err(AppError::Rejected(errors));
    }

    Ok(Json(state.requests.update(&id, &request).await?))
}

pub async fn request_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<RequestEvent>>, AppError> {
    Ok(Json(state.requests.events(&id).await?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsParams {
    pub role: Option<String>,
    pub user_id: Option<String>,
}

pub async fn request_statistics(
    State(state): State<AppState>,
    Query(params): Query<StatisticsParams>,
) -> Result<Json<RequestStatistics>, AppError> {
    let role = params.role.as_deref().map(parse_role).transpose()?;
    Ok(Json(
        state
            .requests
            .statistics(role, params.user_id.as_deref())
            .await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct SplitCheckPayload {
    pub splits: Vec<ExpenseSplit>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitCheck {
    pub balance: SplitBalance,
    pub normatives: NormativeReport,
}

/// Dry-run of the classification checks, nothing is sent to the backend.
pub async fn check_request_splits(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SplitCheckPayload>,
) -> Result<Json<SplitCheck>, AppError> {
    let request = state.requests.get(&id).await?;
    let normatives = state.dictionaries.list::<Normative>().await?;

    Ok(Json(SplitCheck {
        balance: SplitBalance::of(request.amount, &payload.splits),
        normatives: check_splits(&payload.splits, &normatives),
    }))
}

#[derive(Debug, Deserialize)]
pub struct AllocationCheckPayload {
    pub allocations: Vec<PaymentAllocation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationCheck {
    pub balance: AllocationBalance,
    pub normatives: NormativeReport,
}

/// Dry-run of the approval checks.
pub async fn check_request_allocations(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AllocationCheckPayload>,
) -> Result<Json<AllocationCheck>, AppError> {
    let request = state.requests.get(&id).await?;
    let contracts = state.dictionaries.list::<Contract>().await?;
    let normatives = state.dictionaries.list::<Normative>().await?;

    Ok(Json(AllocationCheck {
        balance: AllocationBalance::of(request.amount, &payload.allocations),
        normatives: check_allocations(&payload.allocations, &contracts, &normatives),
    }))
}
