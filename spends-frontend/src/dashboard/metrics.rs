//! Per-role dashboard counters computed from a fetched request list.
//!
//! Every function takes `today`/`now` explicitly so results are reproducible.

use crate::models::{DistributionStatus, PaymentRequest, PaymentRequestStatus, Role};
use crate::workflow::state::distribution_status;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use PaymentRequestStatus::*;

/// A request waiting longer than this since creation counts as stale.
pub const STALE_AFTER_HOURS: i64 = 5;

pub const REGISTRAR_SCOPE: &[PaymentRequestStatus] = &[Submitted, Classified, Returned, Declined];

pub const DISTRIBUTOR_SCOPE: &[PaymentRequestStatus] = &[
    Classified,
    Allocated,
    Approved,
    ApprovedOnBehalf,
    InRegister,
    ApprovedForPayment,
    PaidFull,
    PaidPartial,
    Declined,
    Returned,
];

pub const EXECUTOR_SCOPE: &[PaymentRequestStatus] = &[
    Draft,
    Submitted,
    Classified,
    Approved,
    InRegister,
    ApprovedForPayment,
    PaidFull,
    PaidPartial,
    Declined,
    Returned,
];

pub const TREASURER_SCOPE: &[PaymentRequestStatus] = &[
    Approved,
    ApprovedOnBehalf,
    InRegister,
    ApprovedForPayment,
    PaidFull,
    PaidPartial,
    Declined,
    Returned,
];

/// Statuses whose due date matters for the overdue counter, per role.
/// Each set lies inside the role's scope.
pub const REGISTRAR_PENDING: &[PaymentRequestStatus] = &[Submitted];
pub const DISTRIBUTOR_PENDING: &[PaymentRequestStatus] =
    &[Classified, Allocated, Approved, ApprovedOnBehalf];
pub const TREASURER_PENDING: &[PaymentRequestStatus] = &[Approved, ApprovedOnBehalf];

/// Due date strictly before `today`. Requests without a due date are never overdue.
pub fn is_overdue(request: &PaymentRequest, today: NaiveDate) -> bool {
    request.due_date.map(|due| due < today).unwrap_or(false)
}

/// Whole days from `today` to the due date; negative once overdue.
pub fn days_until(request: &PaymentRequest, today: NaiveDate) -> Option<i64> {
    request
        .due_date
        .map(|due| due.signed_duration_since(today).num_days())
}

pub fn is_stale(request: &PaymentRequest, now: DateTime<Utc>) -> bool {
    request
        .created_at
        .map(|created| now - created > Duration::hours(STALE_AFTER_HOURS))
        .unwrap_or(false)
}

fn count(requests: &[PaymentRequest], statuses: &[PaymentRequestStatus]) -> usize {
    requests
        .iter()
        .filter(|r| statuses.contains(&r.status))
        .count()
}

fn count_overdue(
    requests: &[PaymentRequest],
    statuses: &[PaymentRequestStatus],
    today: NaiveDate,
) -> usize {
    requests
        .iter()
        .filter(|r| statuses.contains(&r.status) && is_overdue(r, today))
        .count()
}

fn count_stale(
    requests: &[PaymentRequest],
    statuses: &[PaymentRequestStatus],
    now: DateTime<Utc>,
) -> usize {
    requests
        .iter()
        .filter(|r| statuses.contains(&r.status) && is_stale(r, now))
        .count()
}

fn sum_amount(requests: &[PaymentRequest], statuses: &[PaymentRequestStatus]) -> f64 {
    requests
        .iter()
        .filter(|r| statuses.contains(&r.status))
        .map(|r| r.amount)
        .sum()
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarMetrics {
    pub total: usize,
    pub new_requests: usize,
    pub registered: usize,
    pub overdue: usize,
    pub returned: usize,
    pub declined: usize,
    pub stale: usize,
}

impl RegistrarMetrics {
    /// Placeholder numbers for an empty demo environment (5/3/2/3).
    pub fn with_demo_fallback(self) -> Self {
        RegistrarMetrics {
            total: if self.total > 0 { self.total } else { 5 },
            new_requests: if self.new_requests > 0 { self.new_requests } else { 3 },
            registered: if self.registered > 0 { self.registered } else { 2 },
            overdue: if self.overdue > 0 { self.overdue } else { 3 },
            ..self
        }
    }
}

pub fn registrar_metrics(
    requests: &[PaymentRequest],
    today: NaiveDate,
    now: DateTime<Utc>,
) -> RegistrarMetrics {
    RegistrarMetrics {
        total: count(requests, REGISTRAR_SCOPE),
        new_requests: count(requests, &[Submitted]),
        registered: count(requests, &[Classified]),
        overdue: count_overdue(requests, REGISTRAR_PENDING, today),
        returned: count(requests, &[Returned]),
        declined: count(requests, &[Declined]),
        stale: count_stale(requests, &[Submitted], now),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorMetrics {
    pub total: usize,
    pub new_requests: usize,
    pub approved: usize,
    pub overdue: usize,
    pub total_amount: f64,
    pub in_work: usize,
    pub returned: usize,
    pub approved_for_payment: usize,
    pub paid: usize,
    pub declined: usize,
    pub stale: usize,
}

pub fn distributor_metrics(
    requests: &[PaymentRequest],
    today: NaiveDate,
    now: DateTime<Utc>,
) -> DistributorMetrics {
    DistributorMetrics {
        total: count(requests, DISTRIBUTOR_SCOPE),
        new_requests: count(requests, &[Classified]),
        approved: count(requests, &[Approved]),
        overdue: count_overdue(requests, DISTRIBUTOR_PENDING, today),
        total_amount: sum_amount(requests, &[Classified, Approved]),
        in_work: count(requests, &[Classified]),
        returned: count(requests, &[Returned]),
        approved_for_payment: count(requests, &[Approved, InRegister, ApprovedForPayment]),
        paid: count(requests, &[PaidFull, PaidPartial]),
        declined: count(requests, &[Declined]),
        stale: count_stale(requests, &[Classified], now),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorMetrics {
    pub total: usize,
    pub draft: usize,
    pub in_progress: usize,
    pub approved_not_paid: usize,
    pub paid: usize,
    pub declined: usize,
    pub returned: usize,
    pub total_amount: f64,
}

pub fn executor_metrics(requests: &[PaymentRequest]) -> ExecutorMetrics {
    ExecutorMetrics {
        total: count(requests, EXECUTOR_SCOPE),
        draft: count(requests, &[Draft]),
        in_progress: count(requests, &[Submitted, Classified, Approved, InRegister]),
        approved_not_paid: count(requests, &[Approved, InRegister]),
        paid: count(requests, &[PaidFull, PaidPartial]),
        declined: count(requests, &[Declined]),
        returned: count(requests, &[Returned]),
        total_amount: sum_amount(requests, EXECUTOR_SCOPE),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasurerMetrics {
    pub total: usize,
    pub new_requests: usize,
    pub overdue: usize,
    pub in_work: usize,
    pub in_register: usize,
    pub paid: usize,
    pub declined: usize,
    pub returned: usize,
    pub stale: usize,
    /// Amount still to be paid, grouped by currency code.
    pub pending_by_currency: BTreeMap<String, f64>,
}

pub fn treasurer_metrics(
    requests: &[PaymentRequest],
    today: NaiveDate,
    now: DateTime<Utc>,
) -> TreasurerMetrics {
    let mut pending_by_currency = BTreeMap::new();
    for request in requests
        .iter()
        .filter(|r| matches!(r.status, Approved | InRegister | ApprovedForPayment))
    {
        *pending_by_currency
            .entry(request.currency.clone())
            .or_insert(0.0) += request.amount;
    }

    TreasurerMetrics {
        total: count(requests, TREASURER_SCOPE),
        new_requests: count(requests, &[Approved]),
        overdue: count_overdue(requests, TREASURER_PENDING, today),
        in_work: count(requests, &[Approved]),
        in_register: count(requests, &[InRegister]),
        paid: count(requests, &[PaidFull, PaidPartial]),
        declined: count(requests, &[Declined]),
        returned: count(requests, &[Returned]),
        stale: count_stale(requests, &[Approved], now),
        pending_by_currency,
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubRegistrarMetrics {
    pub total: usize,
    pub pending: usize,
    pub distributed: usize,
    pub report_published: usize,
    pub export_linked: usize,
    pub classified: usize,
    pub returned: usize,
    pub total_amount: f64,
}

pub fn sub_registrar_metrics(requests: &[PaymentRequest]) -> SubRegistrarMetrics {
    let by_distribution = |target: DistributionStatus| {
        requests
            .iter()
            .filter(|r| distribution_status(r.status) == target)
            .count()
    };

    SubRegistrarMetrics {
        total: requests.len(),
        pending: by_distribution(DistributionStatus::Pending),
        distributed: by_distribution(DistributionStatus::Distributed),
        report_published: by_distribution(DistributionStatus::ReportPublished),
        export_linked: by_distribution(DistributionStatus::ExportLinked),
        classified: count(requests, &[Classified]),
        returned: count(requests, &[Returned]),
        total_amount: requests.iter().map(|r| r.amount).sum(),
    }
}

/// Dashboard counters for one role, tagged with the role on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleDashboard {
    Executor(ExecutorMetrics),
    Registrar(RegistrarMetrics),
    SubRegistrar(SubRegistrarMetrics),
    Distributor(DistributorMetrics),
    Treasurer(TreasurerMetrics),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardOptions {
    pub registrar_demo_fallback: bool,
}

/// Admins see the registrar view.
pub fn dashboard_for(
    role: Role,
    requests: &[PaymentRequest],
    today: NaiveDate,
    now: DateTime<Utc>,
    options: DashboardOptions,
) -> RoleDashboard {
    match role {
        Role::Executor => RoleDashboard::Executor(executor_metrics(requests)),
        Role::Registrar | Role::Admin => {
            let metrics = registrar_metrics(requests, today, now);
            RoleDashboard::Registrar(if options.registrar_demo_fallback {
                metrics.with_demo_fallback()
            } else {
                metrics
            })
        }
        Role::SubRegistrar => RoleDashboard::SubRegistrar(sub_registrar_metrics(requests)),
        Role::Distributor => RoleDashboard::Distributor(distributor_metrics(requests, today, now)),
        Role::Treasurer => RoleDashboard::Treasurer(treasurer_metrics(requests, today, now)),
    }
}
