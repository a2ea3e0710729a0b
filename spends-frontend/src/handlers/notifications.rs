use super::parse_role;
use crate::services::Notification;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use spends_core::error::AppError;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationParams {
    pub role: Option<String>,
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Query(params): Query<NotificationParams>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = match params.role.as_deref() {
        Some(role) => state.notifications.list_for_role(parse_role(role)?),
        None => state.notifications.list(),
    };
    Ok(Json(notifications))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.notifications.mark_read(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(anyhow::anyhow!(
            "Notification {} not found",
            id
        )))
    }
}

pub async fn clear_notifications(State(state): State<AppState>) -> StatusCode {
    state.notifications.clear();
    StatusCode::NO_CONTENT
}
