use crate::models::sub_registrar::{
    AssignmentPage, PublishReport, SubRegistrarReport, SubRegistrarReportCreate,
};
use crate::services::distribution::Page;
use crate::workflow::sort_reports;
use crate::workflow::state::can_publish_report;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use spends_core::error::AppError;

pub async fn assignments(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> Result<Json<AssignmentPage>, AppError> {
    Ok(Json(state.sub_registrar.assignments(page).await?))
}

/// Reports for one page of assignments, drafts and missing documents first.
/// Assignments without a report yet are skipped.
#[tracing::instrument(skip(state))]
pub async fn reports(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<SubRegistrarReport>>, AppError> {
    let page = state.sub_registrar.assignments(page).await?;

    let mut reports = Vec::with_capacity(page.assignments.len());
    for assignment in &page.assignments {
        match state.sub_registrar.report(&assignment.request_id).await {
            Ok(report) => reports.push(report),
            Err(e) if e.is_not_found() => continue,
            Err(e) => return Err(e.into()),
        }
    }

    sort_reports(&mut reports);
    Ok(Json(reports))
}

pub async fn report(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<Json<SubRegistrarReport>, AppError> {
    Ok(Json(state.sub_registrar.report(&request_id).await?))
}

#[tracing::instrument(skip(state, body))]
pub async fn save_draft(
    State(state): State<AppState>,
    Json(body): Json<SubRegistrarReportCreate>,
) -> Result<Json<SubRegistrarReport>, AppError> {
    Ok(Json(state.sub_registrar.save_draft(&body).await?))
}

/// Publishing is only possible while the request sits in `distributed`.
#[tracing::instrument(skip(state))]
pub async fn publish_report(
    State(state): State<AppState>,
    Json(body): Json<PublishReport>,
) -> Result<Json<SubRegistrarReport>, AppError> {
    let request = state.requests.get(&body.request_id).await?;
    if !can_publish_report(request.status) {
        return Err(AppError::Rejected(vec![format!(
            "A report cannot be published for a request in status {}",
            request.status
        )]));
    }

    Ok(Json(
        state.sub_registrar.publish_report(&body.request_id).await?,
    ))
}

pub async fn save_closing_docs(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<StatusCode, AppError> {
    state
        .sub_registrar
        .save_closing_docs(&request_id, &body)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
