use crate::models::distribution::{
    ContractStatus, DistributionCreate, DistributionOut, ExpenseSplitOut,
    ParallelDistributionCreate, ParallelDistributionOut, PendingRequest, ReturnRequestCreate,
    ReturnRequestOut, SubRegistrarUser,
};
use crate::services::distribution::Page;
use crate::workflow::state::can_distribute;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use spends_core::error::AppError;
use validator::Validate;

pub async fn contract_status(
    State(state): State<AppState>,
    Path(counterparty_id): Path<String>,
) -> Result<Json<ContractStatus>, AppError> {
    Ok(Json(state.distribution.contract_status(&counterparty_id).await?))
}

pub async fn sub_registrars(
    State(state): State<AppState>,
) -> Result<Json<Vec<SubRegistrarUser>>, AppError> {
    Ok(Json(state.distribution.sub_registrars().await?))
}

pub async fn pending_requests(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<PendingRequest>>, AppError> {
    Ok(Json(state.distribution.pending_requests(page).await?))
}

pub async fn expense_splits(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<Json<Vec<ExpenseSplitOut>>, AppError> {
    Ok(Json(state.distribution.expense_splits(&request_id).await?))
}

#[tracing::instrument(skip(state, body))]
pub async fn classify(
    State(state): State<AppState>,
    Json(body): Json<DistributionCreate>,
) -> Result<Json<DistributionOut>, AppError> {
    body.validate()?;
    Ok(Json(state.distribution.classify(&body).await?))
}

#[tracing::instrument(skip(state, body))]
pub async fn return_request(
    State(state): State<AppState>,
    Json(body): Json<ReturnRequestCreate>,
) -> Result<Json<ReturnRequestOut>, AppError> {
    body.validate()?;
    Ok(Json(state.distribution.return_request(&body).await?))
}

/// Only approved requests that have not been distributed yet can be sent on.
#[tracing::instrument(skip(state, body))]
pub async fn send_requests(
    State(state): State<AppState>,
    Json(body): Json<ParallelDistributionCreate>,
) -> Result<Json<ParallelDistributionOut>, AppError> {
    body.validate()?;
    ensure_distributable(&state, &body.request_id).await?;
    Ok(Json(state.distribution.send_requests(&body).await?))
}

#[tracing::instrument(skip(state, body))]
pub async fn split_request(
    State(state): State<AppState>,
    Json(body): Json<ParallelDistributionCreate>,
) -> Result<Json<ParallelDistributionOut>, AppError> {
    body.validate()?;
    ensure_distributable(&state, &body.request_id).await?;
    Ok(Json(state.distribution.split_request(&body).await?))
}

async fn ensure_distributable(state: &AppState, request_id: &str) -> Result<(), AppError> {
    let request = state.requests.get(request_id).await?;
    if can_distribute(request.status) {
        Ok(())
    } else {
        Err(AppError::Rejected(vec![format!(
            "A request in status {} cannot be distributed",
            request.status
        )]))
    }
}
