//! Role-scoped list filtering behind the dashboard cards and request lists.

use super::metrics::{
    is_overdue, DISTRIBUTOR_PENDING, DISTRIBUTOR_SCOPE, EXECUTOR_SCOPE, REGISTRAR_PENDING,
    REGISTRAR_SCOPE, TREASURER_PENDING, TREASURER_SCOPE,
};
use crate::models::{PaymentRequest, PaymentRequestStatus, Role};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use PaymentRequestStatus::*;

/// Card a user clicked on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestFilter {
    Total,
    New,
    Overdue,
    InWork,
    Returned,
    ApprovedForPayment,
    ApprovedOnBehalf,
    Paid,
    Declined,
    Draft,
    InProgress,
    ApprovedNotPaid,
}

/// Optional narrowing on top of the role scope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCriteria {
    pub filter: Option<RequestFilter>,
    pub search: Option<String>,
    pub counterparty_id: Option<String>,
    pub status: Option<PaymentRequestStatus>,
}

/// Statuses a role sees on its dashboard list. `None` means unrestricted.
///
/// Admins get the registrar scope, matching the registrar dashboard they are shown.
pub fn role_scope(role: Role) -> Option<&'static [PaymentRequestStatus]> {
    match role {
        Role::Executor => Some(EXECUTOR_SCOPE),
        Role::Registrar | Role::Admin => Some(REGISTRAR_SCOPE),
        Role::Distributor => Some(DISTRIBUTOR_SCOPE),
        Role::Treasurer => Some(TREASURER_SCOPE),
        Role::SubRegistrar => None,
    }
}

fn new_statuses(role: Role) -> &'static [PaymentRequestStatus] {
    match role {
        Role::Executor => &[Draft],
        Role::Registrar | Role::Admin => &[Submitted],
        Role::Distributor => &[Classified],
        Role::Treasurer => &[Approved],
        Role::SubRegistrar => &[Distributed],
    }
}

fn pending_statuses(role: Role) -> &'static [PaymentRequestStatus] {
    match role {
        Role::Registrar | Role::Admin => REGISTRAR_PENDING,
        Role::Distributor => DISTRIBUTOR_PENDING,
        Role::Treasurer => TREASURER_PENDING,
        Role::Executor => &[Submitted, Classified, Approved, InRegister],
        Role::SubRegistrar => &[Distributed, ReportPublished],
    }
}

pub fn matches_filter(
    role: Role,
    filter: RequestFilter,
    request: &PaymentRequest,
    today: NaiveDate,
) -> bool {
    let status = request.status;
    match filter {
        RequestFilter::Total => true,
        RequestFilter::New => new_statuses(role).contains(&status),
        RequestFilter::Overdue => {
            pending_statuses(role).contains(&status) && is_overdue(request, today)
        }
        RequestFilter::InWork => match role {
            Role::Registrar | Role::Admin => status == Submitted,
            Role::Distributor => status == Classified,
            Role::Treasurer => status == Approved,
            Role::Executor => matches!(status, Submitted | Classified | Approved | InRegister),
            Role::SubRegistrar => matches!(status, Distributed | ReportPublished),
        },
        RequestFilter::Returned => status == Returned,
        RequestFilter::ApprovedForPayment => {
            matches!(status, Approved | InRegister | ApprovedForPayment)
        }
        RequestFilter::ApprovedOnBehalf => status == ApprovedOnBehalf,
        RequestFilter::Paid => matches!(status, PaidFull | PaidPartial),
        RequestFilter::Declined => matches!(status, Declined | Rejected),
        RequestFilter::Draft => status == Draft,
        RequestFilter::InProgress => matches!(status, Submitted | Classified | Approved | InRegister),
        RequestFilter::ApprovedNotPaid => matches!(status, Approved | InRegister),
    }
}

/// Case-insensitive match on request number, doc number, description or amount.
pub fn matches_search(request: &PaymentRequest, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    let contains = |value: Option<&str>| {
        value
            .map(|v| v.to_lowercase().contains(&term))
            .unwrap_or(false)
    };

    contains(request.request_number.as_deref())
        || contains(request.doc_number.as_deref())
        || contains(Some(request.description.as_str()))
        || request.amount.to_string().contains(&term)
}

/// Apply role scope and criteria, newest first.
pub fn filter_requests(
    role: Role,
    requests: &[PaymentRequest],
    criteria: &ListCriteria,
    today: NaiveDate,
) -> Vec<PaymentRequest> {
    let scope = role_scope(role);

    let mut filtered: Vec<PaymentRequest> = requests
        .iter()
        .filter(|r| scope.map(|s| s.contains(&r.status)).unwrap_or(true))
        .filter(|r| {
            criteria
                .filter
                .map(|f| matches_filter(role, f, r, today))
                .unwrap_or(true)
        })
        .filter(|r| criteria.status.map(|s| r.status == s).unwrap_or(true))
        .filter(|r| {
            criteria
                .counterparty_id
                .as_deref()
                .map(|cp| r.counterparty_id == cp)
                .unwrap_or(true)
        })
        .filter(|r| {
            criteria
                .search
                .as_deref()
                .map(|term| matches_search(r, term))
                .unwrap_or(true)
        })
        .cloned()
        .collect();

    // Records without a creation time sort last.
    filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    filtered
}

/// The dashboard's "recent requests" panel.
pub fn recent_requests(
    role: Role,
    requests: &[PaymentRequest],
    filter: Option<RequestFilter>,
    today: NaiveDate,
    limit: usize,
) -> Vec<PaymentRequest> {
    let criteria = ListCriteria {
        filter,
        ..Default::default()
    };
    let mut recent = filter_requests(role, requests, &criteria, today);
    recent.truncate(limit);
    recent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::metrics::fixtures::{created, due, request};
    use crate::dashboard::metrics::{dashboard_for, DashboardOptions, RoleDashboard};
    use chrono::{Duration, TimeZone, Utc};

    const ROLES: [Role; 6] = [
        Role::Executor,
        Role::Registrar,
        Role::SubRegistrar,
        Role::Distributor,
        Role::Treasurer,
        Role::Admin,
    ];

    const FILTERS: [RequestFilter; 12] = [
        RequestFilter::Total,
        RequestFilter::New,
        RequestFilter::Overdue,
        RequestFilter::InWork,
        RequestFilter::Returned,
        RequestFilter::ApprovedForPayment,
        RequestFilter::ApprovedOnBehalf,
        RequestFilter::Paid,
        RequestFilter::Declined,
        RequestFilter::Draft,
        RequestFilter::InProgress,
        RequestFilter::ApprovedNotPaid,
    ];

    /// The dashboard card a filter opens, when the role's dashboard has one.
    fn card(dashboard: &RoleDashboard, filter: RequestFilter) -> Option<usize> {
        use RequestFilter as F;
        match (dashboard, filter) {
            (RoleDashboard::Registrar(m), F::Total) => Some(m.total),
            (RoleDashboard::Registrar(m), F::New) => Some(m.new_requests),
            (RoleDashboard::Registrar(m), F::Overdue) => Some(m.overdue),
            (RoleDashboard::Registrar(m), F::Returned) => Some(m.returned),
            (RoleDashboard::Registrar(m), F::Declined) => Some(m.declined),
            (RoleDashboard::Distributor(m), F::Total) => Some(m.total),
            (RoleDashboard::Distributor(m), F::New) => Some(m.new_requests),
            (RoleDashboard::Distributor(m), F::Overdue) => Some(m.overdue),
            (RoleDashboard::Distributor(m), F::InWork) => Some(m.in_work),
            (RoleDashboard::Distributor(m), F::Returned) => Some(m.returned),
            (RoleDashboard::Distributor(m), F::ApprovedForPayment) => Some(m.approved_for_payment),
            (RoleDashboard::Distributor(m), F::Paid) => Some(m.paid),
            (RoleDashboard::Distributor(m), F::Declined) => Some(m.declined),
            (RoleDashboard::Executor(m), F::Total) => Some(m.total),
            (RoleDashboard::Executor(m), F::Draft) => Some(m.draft),
            (RoleDashboard::Executor(m), F::InProgress) => Some(m.in_progress),
            (RoleDashboard::Executor(m), F::ApprovedNotPaid) => Some(m.approved_not_paid),
            (RoleDashboard::Executor(m), F::Paid) => Some(m.paid),
            (RoleDashboard::Executor(m), F::Declined) => Some(m.declined),
            (RoleDashboard::Executor(m), F::Returned) => Some(m.returned),
            (RoleDashboard::Treasurer(m), F::Total) => Some(m.total),
            (RoleDashboard::Treasurer(m), F::New) => Some(m.new_requests),
            (RoleDashboard::Treasurer(m), F::Overdue) => Some(m.overdue),
            (RoleDashboard::Treasurer(m), F::InWork) => Some(m.in_work),
            (RoleDashboard::Treasurer(m), F::Paid) => Some(m.paid),
            (RoleDashboard::Treasurer(m), F::Declined) => Some(m.declined),
            (RoleDashboard::Treasurer(m), F::Returned) => Some(m.returned),
            (RoleDashboard::SubRegistrar(m), F::Total) => Some(m.total),
            (RoleDashboard::SubRegistrar(m), F::Returned) => Some(m.returned),
            _ => None,
        }
    }

    /// One request per status due yesterday and one due tomorrow.
    fn every_status() -> Vec<PaymentRequest> {
        let yesterday = today().pred_opt().unwrap();
        let tomorrow = today().succ_opt().unwrap();

        PaymentRequestStatus::ALL
            .iter()
            .enumerate()
            .flat_map(|(i, status)| {
                [
                    due(request(&format!("{}-late", i), *status, 10.0), yesterday),
                    due(request(&format!("{}-due", i), *status, 10.0), tomorrow),
                ]
            })
            .collect()
    }

    #[test]
    fn test_dashboard_cards_match_their_lists() {
        let requests = every_status();
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();

        for role in ROLES {
            let dashboard =
                dashboard_for(role, &requests, today(), now, DashboardOptions::default());

            for filter in FILTERS {
                let Some(card_count) = card(&dashboard, filter) else {
                    continue;
                };
                let criteria = ListCriteria {
                    filter: Some(filter),
                    ..Default::default()
                };
                let listed = filter_requests(role, &requests, &criteria, today()).len();

                assert_eq!(card_count, listed, "{:?} card {:?}", role, filter);
            }
        }
    }

    #[test]
    fn test_overdue_sets_lie_inside_role_scope() {
        let requests = every_status();

        for role in ROLES {
            let Some(scope) = role_scope(role) else {
                continue;
            };
            for status in pending_statuses(role) {
                assert!(scope.contains(status), "{:?} overdue {:?}", role, status);
            }
            let listed = filter_requests(role, &requests, &ListCriteria::default(), today());
            assert!(listed.iter().all(|r| scope.contains(&r.status)));
        }
    }

    #[test]
    fn test_allocated_and_on_behalf_overdue_reach_the_list() {
        let yesterday = today().pred_opt().unwrap();
        let requests = vec![
            due(request("1", Allocated, 1.0), yesterday),
            due(request("2", ApprovedOnBehalf, 1.0), yesterday),
        ];
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let overdue = ListCriteria {
            filter: Some(RequestFilter::Overdue),
            ..Default::default()
        };
        let on_behalf = ListCriteria {
            filter: Some(RequestFilter::ApprovedOnBehalf),
            ..Default::default()
        };

        let distributor = crate::dashboard::metrics::distributor_metrics(&requests, today(), now);
        assert_eq!(distributor.overdue, 2);
        assert_eq!(filter_requests(Role::Distributor, &requests, &overdue, today()).len(), 2);

        let treasurer = crate::dashboard::metrics::treasurer_metrics(&requests, today(), now);
        assert_eq!(treasurer.overdue, 1);
        assert_eq!(filter_requests(Role::Treasurer, &requests, &overdue, today()).len(), 1);

        for role in [Role::Distributor, Role::Treasurer] {
            let listed = filter_requests(role, &requests, &on_behalf, today());
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].id, "2");
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_role_scope_restricts_list() {
        let requests = vec![
            request("1", Draft, 1.0),
            request("2", Submitted, 1.0),
            request("3", Approved, 1.0),
        ];

        let registrar = filter_requests(Role::Registrar, &requests, &ListCriteria::default(), today());
        assert_eq!(registrar.len(), 1);
        assert_eq!(registrar[0].id, "2");

        let admin = filter_requests(Role::Admin, &requests, &ListCriteria::default(), today());
        assert_eq!(admin, registrar);

        let sub_registrar =
            filter_requests(Role::SubRegistrar, &requests, &ListCriteria::default(), today());
        assert_eq!(sub_registrar.len(), 3);
    }

    #[test]
    fn test_overdue_filter_uses_role_pending_set() {
        let yesterday = today().pred_opt().unwrap();
        let requests = vec![
            due(request("1", Approved, 1.0), yesterday),
            due(request("2", Classified, 1.0), yesterday),
        ];
        let criteria = ListCriteria {
            filter: Some(RequestFilter::Overdue),
            ..Default::default()
        };

        let treasurer = filter_requests(Role::Treasurer, &requests, &criteria, today());
        assert_eq!(treasurer.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["1"]);

        let distributor = filter_requests(Role::Distributor, &requests, &criteria, today());
        assert_eq!(distributor.len(), 2);
    }

    #[test]
    fn test_search_matches_number_and_description() {
        let mut r = request("7", Submitted, 1234.5);
        r.description = "Diesel fuel for harvest".to_string();
        r.doc_number = Some("INV-42".to_string());

        assert!(matches_search(&r, "diesel"));
        assert!(matches_search(&r, "inv-42"));
        assert!(matches_search(&r, "REQ-000000-7"));
        assert!(matches_search(&r, "1234"));
        assert!(!matches_search(&r, "wheat"));
        assert!(matches_search(&r, "  "));
    }

    #[test]
    fn test_newest_first_and_limit() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let requests = vec![
            created(request("old", Submitted, 1.0), now - Duration::days(2)),
            request("undated", Submitted, 1.0),
            created(request("new", Submitted, 1.0), now),
        ];

        let recent = recent_requests(Role::Registrar, &requests, Some(RequestFilter::New), today(), 2);
        let ids: Vec<_> = recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn test_counterparty_and_status_criteria() {
        let mut other = request("2", Submitted, 1.0);
        other.counterparty_id = "cp-2".to_string();
        let requests = vec![request("1", Submitted, 1.0), other, request("3", Classified, 1.0)];

        let criteria = ListCriteria {
            counterparty_id: Some("cp-1".to_string()),
            status: Some(Submitted),
            ..Default::default()
        };
        let result = filter_requests(Role::Registrar, &requests, &criteria, today());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "1");
    }
}
