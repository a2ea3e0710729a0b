use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::wire::flexible_datetime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportContract {
    pub id: String,
    pub contract_number: String,
    pub contract_date: NaiveDate,
    #[serde(default)]
    pub counterparty_id: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency_code: Option<String>,
    pub is_active: bool,
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ExportContractCreate {
    #[validate(length(min = 1, message = "Contract number is required"))]
    pub contract_number: String,
    pub contract_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExportContractUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Per-article request created for a distributor when a request is split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributorRequest {
    pub id: String,
    pub original_request_id: String,
    pub expense_article_id: String,
    pub amount: f64,
    pub distributor_id: String,
    pub status: String,
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributorExportLink {
    pub id: String,
    pub distributor_request_id: String,
    pub export_contract_id: String,
    pub linked_at: DateTime<Utc>,
    pub linked_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportContractLink {
    pub export_contract_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportContractPage {
    #[serde(default)]
    pub contracts: Vec<ExportContract>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributorRequestPage {
    #[serde(default)]
    pub requests: Vec<DistributorRequest>,
    #[serde(default)]
    pub total: u64,
}

/// Distributor request together with the sub-registrar report and export links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedDistributorRequest {
    pub request: DistributorRequest,
    #[serde(default, alias = "sub_registrar_report")]
    pub sub_registrar_report: Option<serde_json::Value>,
    #[serde(default, alias = "export_links")]
    pub export_links: Vec<DistributorExportLink>,
}
