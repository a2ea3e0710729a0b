use crate::models::PaymentRequestStatus;
use crate::workflow::{StatusDescriptor, TransitionLookup};
use axum::{extract::Path, Json};
use spends_core::error::AppError;

/// Descriptor for every status, in workflow order.
pub async fn list_statuses() -> Json<Vec<StatusDescriptor>> {
    Json(
        PaymentRequestStatus::ALL
            .iter()
            .copied()
            .map(StatusDescriptor::of)
            .collect(),
    )
}

pub async fn get_status(Path(status): Path<String>) -> Result<Json<StatusDescriptor>, AppError> {
    let status = status
        .parse::<PaymentRequestStatus>()
        .map_err(|e| AppError::NotFound(anyhow::anyhow!(e)))?;
    Ok(Json(StatusDescriptor::of(status)))
}

/// Lookup for a raw backend status; unknown values answer with no transitions.
pub async fn transitions(Path(status): Path<String>) -> Json<TransitionLookup> {
    Json(TransitionLookup::of_raw(&status))
}
