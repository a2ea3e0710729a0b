//! Registrar distribution endpoints (`/distribution/...`).

use super::api_client::{ApiClient, ApiError};
use crate::models::distribution::{
    ContractStatus, DistributionCreate, DistributionOut, ExpenseSplitOut,
    ParallelDistributionCreate, ParallelDistributionOut, PendingRequest, ReturnRequestCreate,
    ReturnRequestOut, SubRegistrarUser,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

#[derive(Clone)]
pub struct DistributionClient {
    api: Arc<ApiClient>,
}

impl DistributionClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn contract_status(&self, counterparty_id: &str) -> Result<ContractStatus, ApiError> {
        self.api
            .get(&format!("/distribution/contract-status/{}", counterparty_id))
            .await
    }

    pub async fn sub_registrars(&self) -> Result<Vec<SubRegistrarUser>, ApiError> {
        self.api.get("/distribution/sub-registrars").await
    }

    pub async fn classify(&self, body: &DistributionCreate) -> Result<DistributionOut, ApiError> {
        let distribution: DistributionOut = self.api.post("/distribution/classify", body).await?;
        tracing::info!(
            request_id = %distribution.request_id,
            splits = distribution.expense_splits.len(),
            "Request distributed across expense items"
        );
        Ok(distribution)
    }

    pub async fn return_request(
        &self,
        body: &ReturnRequestCreate,
    ) -> Result<ReturnRequestOut, ApiError> {
        self.api.post("/distribution/return", body).await
    }

    pub async fn expense_splits(&self, request_id: &str) -> Result<Vec<ExpenseSplitOut>, ApiError> {
        self.api
            .get(&format!("/distribution/expense-splits/{}", request_id))
            .await
    }

    pub async fn pending_requests(&self, page: Page) -> Result<Vec<PendingRequest>, ApiError> {
        self.api
            .get_with_query("/distribution/pending-requests", &page)
            .await
    }

    /// Send to a sub-registrar and a distributor at once.
    pub async fn send_requests(
        &self,
        body: &ParallelDistributionCreate,
    ) -> Result<ParallelDistributionOut, ApiError> {
        let out: ParallelDistributionOut =
            self.api.post("/distribution/send-requests", body).await?;
        tracing::info!(
            request_id = %out.request_id,
            assignment_id = %out.sub_registrar_assignment_id,
            distributor_requests = out.distributor_request_ids.len(),
            "Request sent to sub-registrar and distributor"
        );
        Ok(out)
    }

    pub async fn split_request(
        &self,
        body: &ParallelDistributionCreate,
    ) -> Result<ParallelDistributionOut, ApiError> {
        self.api.post("/distribution/split-request", body).await
    }
}
