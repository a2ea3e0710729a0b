pub mod actions;
pub mod app;
pub mod dashboard;
pub mod dictionaries;
pub mod distribution;
pub mod export_contracts;
pub mod metrics;
pub mod notifications;
pub mod requests;
pub mod sub_registrar;
pub mod workflow;

use crate::models::Role;
use spends_core::error::AppError;

/// Parse a role from a path or query value (`sub_registrar` or `sub-registrar`).
pub(crate) fn parse_role(value: &str) -> Result<Role, AppError> {
    value
        .parse::<Role>()
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e)))
}
