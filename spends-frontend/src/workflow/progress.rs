//! Projection of a request's status onto the ten-step approval pipeline.

use crate::models::{DistributionStatus, PaymentRequestStatus, Role};
use serde::Serialize;

use PaymentRequestStatus::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    RequestCreation,
    RequestSubmission,
    RequestClassification,
    RequestApproval,
    RequestDistribution,
    DocumentCollection,
    ReportPublication,
    ExportContractLinking,
    PaymentProcessing,
    PaymentCompletion,
}

struct StepDefinition {
    id: StepId,
    name: &'static str,
    role: Role,
    description: &'static str,
    estimate_hours: f64,
}

const STEPS: [StepDefinition; 10] = [
    StepDefinition {
        id: StepId::RequestCreation,
        name: "Request creation",
        role: Role::Executor,
        description: "The executor drafts the payment request",
        estimate_hours: 0.5,
    },
    StepDefinition {
        id: StepId::RequestSubmission,
        name: "Request submission",
        role: Role::Executor,
        description: "The request is submitted for review",
        estimate_hours: 0.1,
    },
    StepDefinition {
        id: StepId::RequestClassification,
        name: "Classification",
        role: Role::Registrar,
        description: "The registrar splits the request across expense items",
        estimate_hours: 2.0,
    },
    StepDefinition {
        id: StepId::RequestApproval,
        name: "Approval",
        role: Role::Distributor,
        description: "The distributor approves the request",
        estimate_hours: 4.0,
    },
    StepDefinition {
        id: StepId::RequestDistribution,
        name: "Distribution",
        role: Role::Registrar,
        description: "The registrar hands the request to a sub-registrar and a distributor",
        estimate_hours: 0.5,
    },
    StepDefinition {
        id: StepId::DocumentCollection,
        name: "Document collection",
        role: Role::SubRegistrar,
        description: "The sub-registrar collects the original documents",
        estimate_hours: 24.0,
    },
    StepDefinition {
        id: StepId::ReportPublication,
        name: "Report publication",
        role: Role::SubRegistrar,
        description: "The sub-registrar publishes the document report",
        estimate_hours: 1.0,
    },
    StepDefinition {
        id: StepId::ExportContractLinking,
        name: "Export contract linking",
        role: Role::Distributor,
        description: "The distributor links the request to an export contract",
        estimate_hours: 2.0,
    },
    StepDefinition {
        id: StepId::PaymentProcessing,
        name: "Payment processing",
        role: Role::Treasurer,
        description: "The treasurer processes the payment",
        estimate_hours: 4.0,
    },
    StepDefinition {
        id: StepId::PaymentCompletion,
        name: "Payment completion",
        role: Role::Treasurer,
        description: "The payment is complete",
        estimate_hours: 1.0,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: StepId,
    pub name: &'static str,
    pub role: Role,
    pub description: &'static str,
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowProgress {
    pub request_id: String,
    pub status: PaymentRequestStatus,
    pub distribution_status: DistributionStatus,
    pub current_step: StepId,
    pub total_steps: usize,
    pub completed_steps: usize,
    pub steps: Vec<WorkflowStep>,
    pub is_complete: bool,
    pub can_proceed: bool,
    pub next_role: Option<Role>,
}

pub fn current_step_index(status: PaymentRequestStatus) -> usize {
    match status {
        Draft | Cancelled => 0,
        Submitted | Returned | Declined | Rejected => 1,
        Classified | Allocated => 2,
        Approved | ApprovedOnBehalf | ToPay | InRegister | ApprovedForPayment => 3,
        Distributed => 4,
        ReportPublished => 6,
        ExportLinked => 7,
        PaidPartial => 8,
        PaidFull => 9,
    }
}

/// Index for a backend status string; unknown statuses sit at the first step.
pub fn current_step_index_raw(status: &str) -> usize {
    status
        .parse::<PaymentRequestStatus>()
        .map(current_step_index)
        .unwrap_or(0)
}

pub fn can_proceed(status: PaymentRequestStatus) -> bool {
    matches!(
        status,
        Submitted
            | Classified
            | Allocated
            | Approved
            | ApprovedOnBehalf
            | ToPay
            | InRegister
            | ApprovedForPayment
            | Distributed
            | ReportPublished
    )
}

/// Role whose action moves the request forward, `None` once it is settled.
pub fn next_role(status: PaymentRequestStatus) -> Option<Role> {
    match status {
        Draft | Returned | Declined | Rejected => Some(Role::Executor),
        Submitted => Some(Role::Registrar),
        Classified | Allocated => Some(Role::Distributor),
        Approved | ApprovedOnBehalf | ToPay | InRegister | ApprovedForPayment => {
            Some(Role::Registrar)
        }
        Distributed => Some(Role::SubRegistrar),
        ReportPublished => Some(Role::Distributor),
        ExportLinked | PaidPartial => Some(Role::Treasurer),
        PaidFull | Cancelled => None,
    }
}

pub fn workflow_progress(
    request_id: &str,
    status: PaymentRequestStatus,
    distribution_status: DistributionStatus,
) -> WorkflowProgress {
    let current = current_step_index(status);

    let steps = STEPS
        .iter()
        .enumerate()
        .map(|(index, step)| WorkflowStep {
            id: step.id,
            name: step.name,
            role: step.role,
            description: step.description,
            status: if index < current {
                StepStatus::Completed
            } else if index == current {
                StepStatus::InProgress
            } else {
                StepStatus::Pending
            },
        })
        .collect();

    WorkflowProgress {
        request_id: request_id.to_string(),
        status,
        distribution_status,
        current_step: STEPS[current].id,
        total_steps: STEPS.len(),
        completed_steps: current,
        steps,
        is_complete: current + 1 >= STEPS.len(),
        can_proceed: can_proceed(status),
        next_role: next_role(status),
    }
}

pub fn progress_percentage(progress: &WorkflowProgress) -> u8 {
    if progress.total_steps == 0 {
        return 0;
    }
    let ratio = progress.completed_steps as f64 / progress.total_steps as f64;
    (ratio * 100.0).round().min(100.0) as u8
}

fn estimate_hours(id: StepId) -> f64 {
    STEPS
        .iter()
        .find(|step| step.id == id)
        .map(|step| step.estimate_hours)
        .unwrap_or(1.0)
}

/// Hours of work left, summing the per-step estimates of unfinished steps.
pub fn remaining_hours(progress: &WorkflowProgress) -> f64 {
    progress
        .steps
        .iter()
        .skip(progress.completed_steps)
        .map(|step| estimate_hours(step.id))
        .sum()
}

pub fn estimated_time_remaining(progress: &WorkflowProgress) -> String {
    let hours = remaining_hours(progress);

    if hours < 1.0 {
        "less than an hour".to_string()
    } else if hours < 24.0 {
        plural(hours.round() as u64, "hour")
    } else {
        plural((hours / 24.0).round() as u64, "day")
    }
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("about 1 {}", unit)
    } else {
        format!("about {} {}s", count, unit)
    }
}

pub fn workflow_bottlenecks(progress: &WorkflowProgress) -> Vec<String> {
    let mut bottlenecks = Vec::new();

    if let Some(step) = progress.steps.get(progress.completed_steps) {
        if matches!(step.id, StepId::DocumentCollection | StepId::RequestApproval) {
            bottlenecks.push(format!("Current step \"{}\" may take a long time", step.name));
        }
    }

    let external_pending = progress
        .steps
        .iter()
        .skip(progress.completed_steps)
        .any(|step| matches!(step.id, StepId::DocumentCollection | StepId::ExportContractLinking));

    if external_pending {
        bottlenecks.push("External actions are required to finish the workflow".to_string());
    }

    bottlenecks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::state::distribution_status;

    fn progress_for(status: PaymentRequestStatus) -> WorkflowProgress {
        workflow_progress("r-1", status, distribution_status(status))
    }

    #[test]
    fn test_ten_steps_with_markers() {
        let progress = progress_for(Classified);

        assert_eq!(progress.total_steps, 10);
        assert_eq!(progress.completed_steps, 2);
        assert_eq!(progress.current_step, StepId::RequestClassification);
        assert_eq!(progress.steps[0].status, StepStatus::Completed);
        assert_eq!(progress.steps[1].status, StepStatus::Completed);
        assert_eq!(progress.steps[2].status, StepStatus::InProgress);
        assert!(progress.steps[3..].iter().all(|s| s.status == StepStatus::Pending));
    }

    #[test]
    fn test_step_index_table() {
        assert_eq!(current_step_index(Returned), 1);
        assert_eq!(current_step_index(ApprovedForPayment), 3);
        assert_eq!(current_step_index(ReportPublished), 6);
        assert_eq!(current_step_index(PaidPartial), 8);
        assert_eq!(current_step_index(Cancelled), 0);
        assert_eq!(current_step_index_raw("archived"), 0);
    }

    #[test]
    fn test_percentage_monotone_along_happy_path() {
        let path = [
            Draft,
            Submitted,
            Classified,
            Approved,
            Distributed,
            ReportPublished,
            ExportLinked,
            PaidFull,
        ];

        let percentages: Vec<u8> = path
            .iter()
            .map(|status| progress_percentage(&progress_for(*status)))
            .collect();

        assert!(percentages.windows(2).all(|pair| pair[0] <= pair[1]), "{:?}", percentages);
        assert_eq!(percentages[0], 0);
        assert_eq!(percentages[7], 90);
    }

    #[test]
    fn test_completion_and_next_role() {
        let paid = progress_for(PaidFull);
        assert!(paid.is_complete);
        assert!(!paid.can_proceed);
        assert_eq!(paid.next_role, None);

        let distributed = progress_for(Distributed);
        assert!(!distributed.is_complete);
        assert!(distributed.can_proceed);
        assert_eq!(distributed.next_role, Some(Role::SubRegistrar));

        assert_eq!(next_role(Returned), Some(Role::Executor));
        assert!(!can_proceed(Returned));
    }

    #[test]
    fn test_estimated_time_remaining() {
        assert_eq!(estimated_time_remaining(&progress_for(PaidFull)), "about 1 hour");
        // payment-processing + payment-completion
        assert_eq!(estimated_time_remaining(&progress_for(PaidPartial)), "about 5 hours");
        // 0.5 + 0.1 + 2 + 4 + 0.5 + 24 + 1 + 2 + 4 + 1 = 39.1
        assert_eq!(estimated_time_remaining(&progress_for(Draft)), "about 2 days");
    }

    #[test]
    fn test_bottlenecks() {
        let approval = progress_for(Approved);
        let bottlenecks = workflow_bottlenecks(&approval);
        assert_eq!(bottlenecks.len(), 2);
        assert!(bottlenecks[0].contains("Approval"));

        let export = progress_for(ExportLinked);
        assert_eq!(workflow_bottlenecks(&export).len(), 1);

        assert!(workflow_bottlenecks(&progress_for(PaidPartial)).is_empty());
    }
}
