//! Export contracts and the distributor's per-article requests.

use super::api_client::{ApiClient, ApiError};
use super::distribution::{Page, DEFAULT_PAGE_LIMIT};
use crate::models::export_contract::{
    DistributorExportLink, DistributorRequest, DistributorRequestPage,
    EnrichedDistributorRequest, ExportContract, ExportContractCreate, ExportContractLink,
    ExportContractPage, ExportContractUpdate,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportContractQuery {
    pub skip: u32,
    pub limit: u32,
    pub is_active: bool,
}

impl Default for ExportContractQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
            is_active: true,
        }
    }
}

#[derive(Clone)]
pub struct ExportContractClient {
    api: Arc<ApiClient>,
}

impl ExportContractClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: ExportContractQuery) -> Result<ExportContractPage, ApiError> {
        self.api.get_with_query("/export-contracts/", &query).await
    }

    pub async fn get(&self, id: &str) -> Result<ExportContract, ApiError> {
        self.api.get(&format!("/export-contracts/{}", id)).await
    }

    pub async fn create(&self, body: &ExportContractCreate) -> Result<ExportContract, ApiError> {
        self.api.post("/export-contracts/", body).await
    }

    pub async fn update(
        &self,
        id: &str,
        body: &ExportContractUpdate,
    ) -> Result<ExportContract, ApiError> {
        self.api.put(&format!("/export-contracts/{}", id), body).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete(&format!("/export-contracts/{}", id)).await
    }

    pub async fn distributor_requests(&self, page: Page) -> Result<DistributorRequestPage, ApiError> {
        self.api.get_with_query("/distributor/requests", &page).await
    }

    pub async fn distributor_request(&self, id: &str) -> Result<DistributorRequest, ApiError> {
        self.api.get(&format!("/distributor/requests/{}", id)).await
    }

    pub async fn link_export_contract(
        &self,
        distributor_request_id: &str,
        export_contract_id: &str,
    ) -> Result<DistributorExportLink, ApiError> {
        let link: DistributorExportLink = self
            .api
            .put(
                &format!("/distributor/requests/{}/export-contract", distributor_request_id),
                &ExportContractLink {
                    export_contract_id: export_contract_id.to_string(),
                },
            )
            .await?;

        tracing::info!(
            distributor_request_id = %distributor_request_id,
            export_contract_id = %export_contract_id,
            "Export contract linked"
        );
        Ok(link)
    }

    pub async fn enriched_request(&self, id: &str) -> Result<EnrichedDistributorRequest, ApiError> {
        self.api
            .get(&format!("/distributor/requests/{}/enriched", id))
            .await
    }
}
