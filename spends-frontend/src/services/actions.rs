//! User-facing workflow actions.
//!
//! Each action validates its input locally, calls the backend, and reports
//! the outcome through the notification centre. Inputs that can be checked
//! without the backend are rejected before any request is sent.

use super::api_client::ApiError;
use super::dictionaries::DictionaryClient;
use super::metrics::record_workflow_action;
use super::notifications::{Notification, NotificationCenter, NotificationKind};
use super::payment_requests::PaymentRequestClient;
use crate::models::wire::DistributorDecision;
use crate::models::{
    Contract, ExpenseSplit, NewPaymentRequest, Normative, PaymentAllocation, PaymentRequest,
    PaymentRequestStatus,
};
use crate::validation::{
    check_allocations, require_comment, validate_new_request, AllocationBalance, SplitBalance,
};
use crate::workflow::progress::next_role;
use crate::workflow::state::is_valid_transition;
use spends_core::error::AppError;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Cannot move request from {from} to {to}")]
    IllegalTransition {
        from: PaymentRequestStatus,
        to: PaymentRequestStatus,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Validation(messages) => AppError::Rejected(messages),
            illegal @ WorkflowError::IllegalTransition { .. } => {
                AppError::Rejected(vec![illegal.to_string()])
            }
            WorkflowError::Api(api) => api.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    Create,
    Submit,
    Classify,
    Approve,
    ApproveOnBehalf,
    Return,
    Decline,
    AddToRegistry,
    SendToDistributor,
    ChangeStatus,
}

impl WorkflowAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowAction::Create => "create",
            WorkflowAction::Submit => "submit",
            WorkflowAction::Classify => "classify",
            WorkflowAction::Approve => "approve",
            WorkflowAction::ApproveOnBehalf => "approve_on_behalf",
            WorkflowAction::Return => "return",
            WorkflowAction::Decline => "decline",
            WorkflowAction::AddToRegistry => "add_to_registry",
            WorkflowAction::SendToDistributor => "send_to_distributor",
            WorkflowAction::ChangeStatus => "change_status",
        }
    }

    fn success_title(&self) -> &'static str {
        match self {
            WorkflowAction::Create => "Request created",
            WorkflowAction::Submit => "Request submitted",
            WorkflowAction::Classify => "Request classified",
            WorkflowAction::Approve => "Request approved",
            WorkflowAction::ApproveOnBehalf => "Request approved on behalf",
            WorkflowAction::Return => "Request returned",
            WorkflowAction::Decline => "Request declined",
            WorkflowAction::AddToRegistry => "Added to payment register",
            WorkflowAction::SendToDistributor => "Sent to distributor",
            WorkflowAction::ChangeStatus => "Status updated",
        }
    }
}

pub struct WorkflowActions {
    requests: PaymentRequestClient,
    dictionaries: Arc<DictionaryClient>,
    notifications: Arc<NotificationCenter>,
}

impl WorkflowActions {
    pub fn new(
        requests: PaymentRequestClient,
        dictionaries: Arc<DictionaryClient>,
        notifications: Arc<NotificationCenter>,
    ) -> Self {
        Self {
            requests,
            dictionaries,
            notifications,
        }
    }

    pub async fn create(&self, request: &NewPaymentRequest) -> Result<PaymentRequest, WorkflowError> {
        let result = async {
            reject_if_any(validate_new_request(request))?;
            Ok::<_, WorkflowError>(self.requests.create(request).await?)
        }
        .await;

        self.finish(WorkflowAction::Create, None, result)
    }

    pub async fn submit(
        &self,
        id: &str,
        comment: Option<String>,
    ) -> Result<PaymentRequest, WorkflowError> {
        let result = self.requests.submit(id, comment).await.map_err(Into::into);
        self.finish(WorkflowAction::Submit, Some(id), result)
    }

    /// Split the request across expense items. An empty split list never reaches the backend.
    pub async fn classify(
        &self,
        id: &str,
        splits: &[ExpenseSplit],
        comment: Option<String>,
    ) -> Result<PaymentRequest, WorkflowError> {
        let result = async {
            self.check_splits(id, splits).await?;
            Ok::<_, WorkflowError>(self.requests.classify(id, splits, comment).await?)
        }
        .await;

        self.finish(WorkflowAction::Classify, Some(id), result)
    }

    pub async fn send_to_distributor(
        &self,
        id: &str,
        splits: &[ExpenseSplit],
        comment: Option<String>,
    ) -> Result<PaymentRequest, WorkflowError> {
        let result = async {
            self.check_splits(id, splits).await?;
            Ok::<_, WorkflowError>(self.requests.send_to_distributor(id, splits, comment).await?)
        }
        .await;

        self.finish(WorkflowAction::SendToDistributor, Some(id), result)
    }

    /// Approve with payment allocations.
    ///
    /// Allocations must balance against the request amount and carry a
    /// contract and priority. Hard normative limits block; soft ones only
    /// raise a warning notification.
    pub async fn approve(
        &self,
        id: &str,
        allocations: &[PaymentAllocation],
        comment: Option<String>,
    ) -> Result<PaymentRequest, WorkflowError> {
        let result = async {
            if allocations.is_empty() {
                return Err(WorkflowError::Validation(vec![
                    "At least one payment allocation is required".to_string(),
                ]));
            }

            let current = self.requests.get(id).await?;
            let balance = AllocationBalance::of(current.amount, allocations);
            reject_if_any(balance.errors)?;

            let contracts = self.dictionaries.list::<Contract>().await?;
            let normatives = self.dictionaries.list::<Normative>().await?;
            let report = check_allocations(allocations, &contracts, &normatives);
            reject_if_any(report.blocking_errors())?;

            for warning in report.warnings() {
                self.notifications.add(
                    Notification::new(NotificationKind::Warning, "Normative limit", warning)
                        .for_request(id),
                );
            }

            let priority = allocations.first().and_then(|a| a.priority.clone());
            Ok::<_, WorkflowError>(self
                .requests
                .distributor_action(id, DistributorDecision::Approve, comment, allocations, priority)
                .await?)
        }
        .await;

        self.finish(WorkflowAction::Approve, Some(id), result)
    }

    pub async fn approve_on_behalf(
        &self,
        id: &str,
        comment: Option<String>,
    ) -> Result<PaymentRequest, WorkflowError> {
        let result = async {
            let current = self.requests.get(id).await?;
            ensure_transition(current.status, PaymentRequestStatus::ApprovedOnBehalf)?;
            let execution_data = comment.map(|comment| serde_json::json!({ "comment": comment }));
            Ok::<_, WorkflowError>(self
                .requests
                .update_status(id, PaymentRequestStatus::ApprovedOnBehalf, execution_data)
                .await?)
        }
        .await;

        self.finish(WorkflowAction::ApproveOnBehalf, Some(id), result)
    }

    /// Send the request back to the executor. A comment is mandatory.
    pub async fn return_request(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<PaymentRequest, WorkflowError> {
        let result = async {
            let comment = require_comment(comment).map_err(|e| WorkflowError::Validation(vec![e]))?;
            Ok::<_, WorkflowError>(self.requests.return_request(id, comment).await?)
        }
        .await;

        self.finish(WorkflowAction::Return, Some(id), result)
    }

    pub async fn decline(
        &self,
        id: &str,
        comment: Option<&str>,
    ) -> Result<PaymentRequest, WorkflowError> {
        let result = async {
            let comment = require_comment(comment).map_err(|e| WorkflowError::Validation(vec![e]))?;
            Ok::<_, WorkflowError>(self
                .requests
                .distributor_action(id, DistributorDecision::Decline, Some(comment), &[], None)
                .await?)
        }
        .await;

        self.finish(WorkflowAction::Decline, Some(id), result)
    }

    pub async fn add_to_registry(
        &self,
        id: &str,
        comment: Option<String>,
    ) -> Result<PaymentRequest, WorkflowError> {
        let result = self
            .requests
            .add_to_registry(id, comment)
            .await
            .map_err(Into::into);
        self.finish(WorkflowAction::AddToRegistry, Some(id), result)
    }

    /// Move the request to `to`, refusing transitions the status machine does not allow.
    pub async fn change_status(
        &self,
        id: &str,
        to: PaymentRequestStatus,
        execution_data: Option<serde_json::Value>,
    ) -> Result<PaymentRequest, WorkflowError> {
        let result = async {
            let current = self.requests.get(id).await?;
            ensure_transition(current.status, to)?;
            Ok::<_, WorkflowError>(self.requests.update_status(id, to, execution_data).await?)
        }
        .await;

        self.finish(WorkflowAction::ChangeStatus, Some(id), result)
    }

    async fn check_splits(&self, id: &str, splits: &[ExpenseSplit]) -> Result<(), WorkflowError> {
        if splits.is_empty() {
            return Err(WorkflowError::Validation(vec![
                "At least one expense split is required".to_string(),
            ]));
        }

        let current = self.requests.get(id).await?;
        reject_if_any(SplitBalance::of(current.amount, splits).errors)
    }

    fn finish(
        &self,
        action: WorkflowAction,
        request_id: Option<&str>,
        result: Result<PaymentRequest, WorkflowError>,
    ) -> Result<PaymentRequest, WorkflowError> {
        match &result {
            Ok(request) => {
                record_workflow_action(action.as_str(), "ok");

                let message = format!(
                    "{} is now {}",
                    request.request_number.as_deref().unwrap_or(&request.id),
                    request.status
                );
                let mut notification =
                    Notification::new(NotificationKind::Success, action.success_title(), message)
                        .for_request(request.id.clone());
                if let Some(role) = next_role(request.status) {
                    notification = notification.for_role(role);
                }
                self.notifications.add(notification);
            }
            Err(err) => {
                let outcome = match err {
                    WorkflowError::Validation(_) | WorkflowError::IllegalTransition { .. } => {
                        "rejected"
                    }
                    WorkflowError::Api(_) => "failed",
                };
                record_workflow_action(action.as_str(), outcome);

                tracing::warn!(
                    action = action.as_str(),
                    request_id = ?request_id,
                    error = %err,
                    "Workflow action failed"
                );

                let mut notification = Notification::new(
                    NotificationKind::Error,
                    format!("Could not {}", action.as_str().replace('_', " ")),
                    err.to_string(),
                );
                if let Some(id) = request_id {
                    notification = notification.for_request(id);
                }
                self.notifications.add(notification);
            }
        }

        result
    }
}

fn reject_if_any(errors: Vec<String>) -> Result<(), WorkflowError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(WorkflowError::Validation(errors))
    }
}

fn ensure_transition(
    from: PaymentRequestStatus,
    to: PaymentRequestStatus,
) -> Result<(), WorkflowError> {
    if is_valid_transition(from, to) {
        Ok(())
    } else {
        Err(WorkflowError::IllegalTransition { from, to })
    }
}
