use super::status::DistributionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::wire::{flexible_datetime, flexible_f64};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractStatus {
    pub has_contract: bool,
    pub contract_number: Option<String>,
    pub contract_date: Option<String>,
    pub contract_type: Option<String>,
    pub validity_period: Option<String>,
    pub rates: Option<String>,
    pub contract_info: Option<String>,
    pub contract_file_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ExpenseSplitCreate {
    #[validate(length(min = 1, message = "Expense item is required"))]
    pub expense_item_id: String,
    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than zero"))]
    pub amount: f64,
    pub comment: Option<String>,
    pub contract_id: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSplitOut {
    pub id: String,
    pub request_id: String,
    pub expense_item_id: String,
    #[serde(deserialize_with = "flexible_f64")]
    pub amount: f64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub contract_id: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub sub_registrar_id: Option<String>,
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DistributionCreate {
    #[validate(length(min = 1))]
    pub request_id: String,
    #[validate(length(min = 1))]
    pub responsible_registrar_id: String,
    #[validate(length(min = 1, message = "At least one expense split is required"), nested)]
    pub expense_splits: Vec<ExpenseSplitCreate>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionOut {
    pub request_id: String,
    pub responsible_registrar_id: String,
    pub expense_splits: Vec<ExpenseSplitOut>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(deserialize_with = "flexible_f64")]
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReturnRequestCreate {
    #[validate(length(min = 1))]
    pub request_id: String,
    #[validate(length(min = 1, message = "A comment is required"))]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRequestOut {
    pub request_id: String,
    pub comment: String,
    pub returned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub id: String,
    pub number: String,
    pub title: String,
    #[serde(deserialize_with = "flexible_f64")]
    pub amount_total: f64,
    pub currency_code: String,
    pub counterparty_id: String,
    pub status: String,
    pub distribution_status: DistributionStatus,
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Hand a request to a sub-registrar and a distributor at the same time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ParallelDistributionCreate {
    #[validate(length(min = 1))]
    pub request_id: String,
    #[validate(length(min = 1))]
    pub sub_registrar_id: String,
    #[validate(length(min = 1))]
    pub distributor_id: String,
    #[validate(length(min = 1, message = "At least one expense split is required"), nested)]
    pub expense_splits: Vec<ExpenseSplitCreate>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelDistributionOut {
    pub request_id: String,
    pub sub_registrar_assignment_id: String,
    pub distributor_request_ids: Vec<String>,
    #[serde(deserialize_with = "flexible_f64")]
    pub total_amount: f64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRegistrarUser {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
