pub mod filters;
pub mod metrics;

pub use filters::{filter_requests, recent_requests, ListCriteria, RequestFilter};
pub use metrics::{dashboard_for, is_overdue, DashboardOptions, RoleDashboard};
