//! Workflow action endpoints. Each one delegates to [`WorkflowActions`](crate::services::WorkflowActions).

use crate::models::{ExpenseSplit, PaymentAllocation, PaymentRequest, PaymentRequestStatus};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use spends_core::error::AppError;
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CommentPayload {
    #[validate(length(max = 2000, message = "Comment is too long"))]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SplitsPayload {
    #[serde(default)]
    pub splits: Vec<ExpenseSplit>,
    #[validate(length(max = 2000, message = "Comment is too long"))]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AllocationsPayload {
    #[serde(default)]
    pub allocations: Vec<PaymentAllocation>,
    #[validate(length(max = 2000, message = "Comment is too long"))]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    pub status: PaymentRequestStatus,
    pub execution_data: Option<serde_json::Value>,
}

#[tracing::instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CommentPayload>,
) -> Result<Json<PaymentRequest>, AppError> {
    payload.validate()?;
    Ok(Json(state.actions.submit(&id, payload.comment).await?))
}

#[tracing::instrument(skip(state, payload))]
pub async fn classify(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SplitsPayload>,
) -> Result<Json<PaymentRequest>, AppError> {
    payload.validate()?;
    Ok(Json(
        state
            .actions
            .classify(&id, &payload.splits, payload.comment)
            .await?,
    ))
}

#[tracing::instrument(skip(state, payload))]
pub async fn send_to_distributor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SplitsPayload>,
) -> Result<Json<PaymentRequest>, AppError> {
    payload.validate()?;
    Ok(Json(
        state
            .actions
            .send_to_distributor(&id, &payload.splits, payload.comment)
            .await?,
    ))
}

#[tracing::instrument(skip(state, payload))]
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AllocationsPayload>,
) -> Result<Json<PaymentRequest>, AppError> {
    payload.validate()?;
    Ok(Json(
        state
            .actions
            .approve(&id, &payload.allocations, payload.comment)
            .await?,
    ))
}

#[tracing::instrument(skip(state, payload))]
pub async fn approve_on_behalf(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CommentPayload>,
) -> Result<Json<PaymentRequest>, AppError> {
    payload.validate()?;
    Ok(Json(
        state.actions.approve_on_behalf(&id, payload.comment).await?,
    ))
}

#[tracing::instrument(skip(state, payload))]
pub async fn return_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CommentPayload>,
) -> Result<Json<PaymentRequest>, AppError> {
    payload.validate()?;
    Ok(Json(
        state
            .actions
            .return_request(&id, payload.comment.as_deref())
            .await?,
    ))
}

#[tracing::instrument(skip(state, payload))]
pub async fn decline(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CommentPayload>,
) -> Result<Json<PaymentRequest>, AppError> {
    payload.validate()?;
    Ok(Json(
        state.actions.decline(&id, payload.comment.as_deref()).await?,
    ))
}

#[tracing::instrument(skip(state, payload))]
pub async fn add_to_registry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CommentPayload>,
) -> Result<Json<PaymentRequest>, AppError> {
    payload.validate()?;
    Ok(Json(
        state.actions.add_to_registry(&id, payload.comment).await?,
    ))
}

#[tracing::instrument(skip(state, payload))]
pub async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusPayload>,
) -> Result<Json<PaymentRequest>, AppError> {
    Ok(Json(
        state
            .actions
            .change_status(&id, payload.status, payload.execution_data)
            .await?,
    ))
}
