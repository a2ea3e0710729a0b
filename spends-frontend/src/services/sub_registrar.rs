//! Sub-registrar document collection endpoints.

use super::api_client::{ApiClient, ApiError};
use super::distribution::Page;
use crate::models::sub_registrar::{
    AssignmentPage, PublishReport, SubRegistrarReport, SubRegistrarReportCreate,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct SubRegistrarClient {
    api: Arc<ApiClient>,
}

impl SubRegistrarClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn assignments(&self, page: Page) -> Result<AssignmentPage, ApiError> {
        self.api
            .get_with_query("/sub-registrar/assignments", &page)
            .await
    }

    pub async fn report(&self, request_id: &str) -> Result<SubRegistrarReport, ApiError> {
        self.api
            .get(&format!("/sub-registrar/reports/{}", request_id))
            .await
    }

    pub async fn save_draft(
        &self,
        report: &SubRegistrarReportCreate,
    ) -> Result<SubRegistrarReport, ApiError> {
        self.api.post("/sub-registrar/save-draft", report).await
    }

    pub async fn publish_report(&self, request_id: &str) -> Result<SubRegistrarReport, ApiError> {
        let report: SubRegistrarReport = self
            .api
            .post(
                "/sub-registrar/publish-report",
                &PublishReport {
                    request_id: request_id.to_string(),
                },
            )
            .await?;

        tracing::info!(
            request_id = %request_id,
            document_status = ?report.document_status,
            "Sub-registrar report published"
        );
        Ok(report)
    }

    pub async fn save_closing_docs(
        &self,
        request_id: &str,
        data: &serde_json::Value,
    ) -> Result<(), ApiError> {
        self.api
            .post_discard(&format!("/sub-registrar/closing-docs/{}", request_id), data)
            .await
    }
}
