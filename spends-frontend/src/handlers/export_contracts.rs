use crate::models::export_contract::{
    DistributorExportLink, DistributorRequest, DistributorRequestPage,
    EnrichedDistributorRequest, ExportContract, ExportContractCreate, ExportContractLink,
    ExportContractPage, ExportContractUpdate,
};
use crate::services::distribution::Page;
use crate::services::export_contracts::ExportContractQuery;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use spends_core::error::AppError;
use validator::Validate;

pub async fn list_export_contracts(
    State(state): State<AppState>,
    Query(query): Query<ExportContractQuery>,
) -> Result<Json<ExportContractPage>, AppError> {
    Ok(Json(state.export_contracts.list(query).await?))
}

pub async fn get_export_contract(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExportContract>, AppError> {
    Ok(Json(state.export_contracts.get(&id).await?))
}

#[tracing::instrument(skip(state, body))]
pub async fn create_export_contract(
    State(state): State<AppState>,
    Json(body): Json<ExportContractCreate>,
) -> Result<(StatusCode, Json<ExportContract>), AppError> {
    body.validate()?;
    Ok((
        StatusCode::CREATED,
        Json(state.export_contracts.create(&body).await?),
    ))
}

#[tracing::instrument(skip(state, body))]
pub async fn update_export_contract(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ExportContractUpdate>,
) -> Result<Json<ExportContract>, AppError> {
    Ok(Json(state.export_contracts.update(&id, &body).await?))
}

pub async fn delete_export_contract(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.export_contracts.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn distributor_requests(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> Result<Json<DistributorRequestPage>, AppError> {
    Ok(Json(state.export_contracts.distributor_requests(page).await?))
}

pub async fn distributor_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DistributorRequest>, AppError> {
    Ok(Json(state.export_contracts.distributor_request(&id).await?))
}

pub async fn enriched_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EnrichedDistributorRequest>, AppError> {
    Ok(Json(state.export_contracts.enriched_request(&id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn link_export_contract(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ExportContractLink>,
) -> Result<Json<DistributorExportLink>, AppError> {
    Ok(Json(
        state
            .export_contracts
            .link_export_contract(&id, &body.export_contract_id)
            .await?,
    ))
}
