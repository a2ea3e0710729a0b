//! Status machine for payment requests.
//!
//! All tables are exhaustive matches over [`PaymentRequestStatus`]; adding a
//! status fails to compile until every table handles it. The `*_raw`
//! helpers accept backend strings and treat unknown values as having no
//! transitions.

use super::progress::current_step_index_raw;
use crate::models::sub_registrar::SubRegistrarReport;
use crate::models::{DistributionStatus, DocumentStatus, PaymentRequestStatus, ReportStatus, Role};
use serde::Serialize;

use PaymentRequestStatus::*;

/// Statuses reachable in one step from `status`.
pub fn next_valid_statuses(status: PaymentRequestStatus) -> &'static [PaymentRequestStatus] {
    match status {
        Draft => &[Submitted],
        Submitted => &[Classified, Returned],
        Classified => &[Allocated, Returned],
        Allocated => &[Approved, Returned],
        Returned => &[Submitted, Draft],
        Approved => &[ApprovedOnBehalf, ToPay, Distributed],
        ApprovedOnBehalf => &[ToPay, Distributed],
        ToPay => &[InRegister, Distributed],
        InRegister => &[ApprovedForPayment, Distributed],
        ApprovedForPayment => &[PaidFull, PaidPartial, Distributed],
        Distributed => &[ReportPublished],
        ReportPublished => &[ExportLinked],
        ExportLinked => &[PaidFull, PaidPartial],
        PaidFull => &[],
        PaidPartial => &[PaidFull],
        Declined => &[Draft],
        Rejected => &[Draft],
        Cancelled => &[],
    }
}

pub fn next_valid_statuses_raw(status: &str) -> &'static [PaymentRequestStatus] {
    status
        .parse::<PaymentRequestStatus>()
        .map(next_valid_statuses)
        .unwrap_or(&[])
}

pub fn is_valid_transition(from: PaymentRequestStatus, to: PaymentRequestStatus) -> bool {
    next_valid_statuses(from).contains(&to)
}

pub fn is_terminal(status: PaymentRequestStatus) -> bool {
    next_valid_statuses(status).is_empty()
}

/// Roles expected to act on a request in `status`.
pub fn responsible_roles(status: PaymentRequestStatus) -> &'static [Role] {
    match status {
        Draft | Submitted => &[Role::Executor],
        Classified | Allocated => &[Role::Registrar],
        Returned => &[Role::Registrar, Role::Distributor, Role::Treasurer],
        Approved | ApprovedOnBehalf | ToPay => &[Role::Distributor],
        InRegister => &[Role::Registrar],
        ApprovedForPayment => &[Role::Treasurer],
        Distributed => &[Role::Registrar],
        ReportPublished => &[Role::SubRegistrar],
        ExportLinked => &[Role::Distributor],
        PaidFull | PaidPartial => &[Role::Treasurer],
        Declined | Rejected => &[Role::Distributor, Role::Treasurer],
        Cancelled => &[
            Role::Executor,
            Role::Registrar,
            Role::Distributor,
            Role::Treasurer,
        ],
    }
}

pub fn responsible_roles_raw(status: &str) -> &'static [Role] {
    status
        .parse::<PaymentRequestStatus>()
        .map(responsible_roles)
        .unwrap_or(&[])
}

pub fn distribution_status(status: PaymentRequestStatus) -> DistributionStatus {
    match status {
        Draft | Submitted | Classified | Allocated | Returned | Approved | ApprovedOnBehalf
        | ToPay | InRegister | ApprovedForPayment | Declined | Rejected | Cancelled => {
            DistributionStatus::Pending
        }
        Distributed => DistributionStatus::Distributed,
        ReportPublished => DistributionStatus::ReportPublished,
        ExportLinked | PaidFull | PaidPartial => DistributionStatus::ExportLinked,
    }
}

/// Human label of the workflow stage a status belongs to.
pub fn workflow_stage(status: PaymentRequestStatus) -> &'static str {
    match status {
        Draft => "Creation",
        Submitted => "Submission",
        Classified => "Classification",
        Allocated => "Allocation",
        Returned => "Returned",
        Approved => "Approval",
        ApprovedOnBehalf => "Approval on behalf",
        ToPay => "To pay",
        InRegister => "In payment register",
        ApprovedForPayment => "Approved for payment",
        Distributed => "Distributed",
        ReportPublished => "Report published",
        ExportLinked => "Export contract linked",
        PaidFull => "Paid in full",
        PaidPartial => "Partially paid",
        Declined | Rejected => "Declined",
        Cancelled => "Cancelled",
    }
}

pub fn status_color(status: PaymentRequestStatus) -> &'static str {
    match status {
        Draft | Cancelled => "gray",
        Submitted | ToPay | InRegister => "blue",
        Classified | Allocated | PaidPartial => "yellow",
        Returned | Declined | Rejected => "red",
        Approved | ApprovedOnBehalf | ApprovedForPayment | ExportLinked | PaidFull => "green",
        Distributed => "purple",
        ReportPublished => "orange",
    }
}

pub fn can_distribute(status: PaymentRequestStatus) -> bool {
    matches!(
        status,
        Approved | ApprovedOnBehalf | ToPay | InRegister | ApprovedForPayment
    )
}

pub fn can_publish_report(status: PaymentRequestStatus) -> bool {
    status == Distributed
}

pub fn can_link_export_contract(status: PaymentRequestStatus) -> bool {
    matches!(status, ReportPublished | ExportLinked)
}

/// Sort key: documents still missing come first.
pub fn document_status_priority(status: DocumentStatus) -> u8 {
    match status {
        DocumentStatus::NotReceived => 1,
        DocumentStatus::PartiallyReceived => 2,
        DocumentStatus::FullyReceived => 3,
    }
}

pub fn report_status_priority(status: ReportStatus) -> u8 {
    match status {
        ReportStatus::Draft => 1,
        ReportStatus::Published => 2,
    }
}

/// Orders reports so drafts come before published ones and, within each,
/// reports with fewer documents received come first. Ties keep their order.
pub fn sort_reports(reports: &mut [SubRegistrarReport]) {
    reports.sort_by_key(|report| {
        (
            report_status_priority(report.status),
            document_status_priority(report.document_status),
        )
    });
}

/// Everything a client needs to render the actions available for a status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDescriptor {
    pub status: PaymentRequestStatus,
    pub stage: &'static str,
    pub color: &'static str,
    pub next_statuses: &'static [PaymentRequestStatus],
    pub responsible_roles: &'static [Role],
    pub distribution_status: DistributionStatus,
    pub is_terminal: bool,
    pub can_distribute: bool,
    pub can_publish_report: bool,
    pub can_link_export_contract: bool,
}

impl StatusDescriptor {
    pub fn of(status: PaymentRequestStatus) -> Self {
        StatusDescriptor {
            status,
            stage: workflow_stage(status),
            color: status_color(status),
            next_statuses: next_valid_statuses(status),
            responsible_roles: responsible_roles(status),
            distribution_status: distribution_status(status),
            is_terminal: is_terminal(status),
            can_distribute: can_distribute(status),
            can_publish_report: can_publish_report(status),
            can_link_export_contract: can_link_export_contract(status),
        }
    }
}

/// Transition lookup for a raw backend status string. Unknown statuses
/// resolve to no transitions, no responsible roles and the first step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionLookup {
    pub status: String,
    pub known: bool,
    pub next_statuses: &'static [PaymentRequestStatus],
    pub responsible_roles: &'static [Role],
    pub current_step: usize,
}

impl TransitionLookup {
    pub fn of_raw(status: &str) -> Self {
        TransitionLookup {
            status: status.to_string(),
            known: status.parse::<PaymentRequestStatus>().is_ok(),
            next_statuses: next_valid_statuses_raw(status),
            responsible_roles: responsible_roles_raw(status),
            current_step: current_step_index_raw(status),
        }
    }
}
