//! Payment-request endpoints of the workflow backend.

use super::api_client::{ApiClient, ApiError};
use crate::models::request::generate_request_number;
use crate::models::wire::{
    normalize_requests, ClassifyBody, CommentBody, DistributorActionBody, DistributorDecision,
    RequestCreateBody, RequestEventOut, RequestOut, StatisticsOut, StatusPatchBody,
};
use crate::models::{
    ExpenseSplit, NewPaymentRequest, PaymentAllocation, PaymentRequest, PaymentRequestStatus,
    RequestEvent, RequestStatistics, Role,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Query string of `GET /requests/list`. Unset fields are left out.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(rename = "dateFrom", skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(rename = "dateTo", skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_registrar_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
struct RoleQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
}

#[derive(Clone)]
pub struct PaymentRequestClient {
    api: Arc<ApiClient>,
}

impl PaymentRequestClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Fetch and normalise the request list. Records with unknown statuses are dropped.
    pub async fn list(&self, query: &RequestListQuery) -> Result<Vec<PaymentRequest>, ApiError> {
        let records: Vec<RequestOut> = self.api.get_with_query("/requests/list", query).await?;
        let total = records.len();
        let requests = normalize_requests(records);

        tracing::debug!(total, kept = requests.len(), "Fetched payment requests");
        Ok(requests)
    }

    pub async fn get(&self, id: &str) -> Result<PaymentRequest, ApiError> {
        let record: RequestOut = self.api.get(&format!("/requests/{}", id)).await?;
        into_request(record)
    }

    /// Create a request, generating a request number when none is given.
    pub async fn create(&self, request: &NewPaymentRequest) -> Result<PaymentRequest, ApiError> {
        let mut body = RequestCreateBody::from(request);
        if body.number.is_none() {
            body.number = Some(generate_request_number(Utc::now()));
        }

        let record: RequestOut = self.api.post("/requests", &body).await?;
        let created = into_request(record)?;

        tracing::info!(
            request_id = %created.id,
            request_number = ?created.request_number,
            "Payment request created"
        );
        Ok(created)
    }

    pub async fn update(
        &self,
        id: &str,
        request: &NewPaymentRequest,
    ) -> Result<PaymentRequest, ApiError> {
        let body = RequestCreateBody::from(request);
        let record: RequestOut = self.api.put(&format!("/requests/{}", id), &body).await?;
        into_request(record)
    }

    pub async fn submit(&self, id: &str, comment: Option<String>) -> Result<PaymentRequest, ApiError> {
        self.post_action(id, "submit", &CommentBody { comment }).await
    }

    pub async fn classify(
        &self,
        id: &str,
        splits: &[ExpenseSplit],
        comment: Option<String>,
    ) -> Result<PaymentRequest, ApiError> {
        self.post_action(id, "classify", &ClassifyBody::new(splits, comment))
            .await
    }

    pub async fn approve(&self, id: &str, comment: Option<String>) -> Result<PaymentRequest, ApiError> {
        self.post_action(id, "approve", &CommentBody { comment }).await
    }

    /// `PATCH /requests/{id}`. Callers check the transition first.
    pub async fn update_status(
        &self,
        id: &str,
        status: PaymentRequestStatus,
        execution_data: Option<serde_json::Value>,
    ) -> Result<PaymentRequest, ApiError> {
        let body = StatusPatchBody {
            status,
            execution_data,
        };
        let record: RequestOut = self.api.patch(&format!("/requests/{}", id), &body).await?;
        into_request(record)
    }

    pub async fn add_to_registry(
        &self,
        id: &str,
        comment: Option<String>,
    ) -> Result<PaymentRequest, ApiError> {
        self.post_action(id, "add-to-registry", &CommentBody { comment })
            .await
    }

    /// Send the request back to the executor (backend `reject` endpoint).
    pub async fn return_request(&self, id: &str, comment: String) -> Result<PaymentRequest, ApiError> {
        self.post_action(
            id,
            "reject",
            &CommentBody {
                comment: Some(comment),
            },
        )
        .await
    }

    pub async fn send_to_distributor(
        &self,
        id: &str,
        splits: &[ExpenseSplit],
        comment: Option<String>,
    ) -> Result<PaymentRequest, ApiError> {
        self.post_action(id, "send-to-distributor", &ClassifyBody::new(splits, comment))
            .await
    }

    pub async fn distributor_action(
        &self,
        id: &str,
        action: DistributorDecision,
        comment: Option<String>,
        allocations: &[PaymentAllocation],
        priority: Option<String>,
    ) -> Result<PaymentRequest, ApiError> {
        let body = DistributorActionBody {
            action,
            comment,
            allocations: allocations.iter().map(Into::into).collect(),
            priority,
        };
        self.post_action(id, "distributor-action", &body).await
    }

    pub async fn statistics(
        &self,
        role: Option<Role>,
        user_id: Option<&str>,
    ) -> Result<RequestStatistics, ApiError> {
        let stats: StatisticsOut = self
            .api
            .get_with_query("/requests/statistics", &RoleQuery { role, user_id })
            .await?;
        Ok(stats.into())
    }

    /// Backend-computed dashboard figures, passed through untouched.
    pub async fn dashboard_metrics(
        &self,
        role: Option<Role>,
        user_id: Option<&str>,
    ) -> Result<serde_json::Value, ApiError> {
        self.api
            .get_with_query("/requests/metrics/dashboard", &RoleQuery { role, user_id })
            .await
    }

    pub async fn events(&self, id: &str) -> Result<Vec<RequestEvent>, ApiError> {
        let events: Vec<RequestEventOut> =
            self.api.get(&format!("/requests/{}/events", id)).await?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    async fn post_action<B: Serialize>(
        &self,
        id: &str,
        action: &str,
        body: &B,
    ) -> Result<PaymentRequest, ApiError> {
        let record: RequestOut = self
            .api
            .post(&format!("/requests/{}/{}", id, action), body)
            .await?;
        into_request(record)
    }
}

fn into_request(record: RequestOut) -> Result<PaymentRequest, ApiError> {
    let status = record.status.clone();
    record
        .into_domain()
        .ok_or_else(|| ApiError::Decode(format!("unknown request status '{}'", status)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_uses_backend_names() {
        let query = RequestListQuery {
            role: Some(Role::SubRegistrar),
            date_from: NaiveDate::from_ymd_opt(2024, 3, 1),
            responsible_registrar_id: Some("u-7".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "role": "sub_registrar",
                "dateFrom": "2024-03-01",
                "responsible_registrar_id": "u-7"
            })
        );
    }

    #[test]
    fn test_unknown_status_is_a_decode_error() {
        let record: RequestOut =
            serde_json::from_value(serde_json::json!({"id": "r-1", "status": "archived"})).unwrap();
        assert!(matches!(into_request(record), Err(ApiError::Decode(_))));
    }
}
