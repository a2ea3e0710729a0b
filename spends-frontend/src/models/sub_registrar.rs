use super::status::{DocumentStatus, ReportStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::flexible_datetime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRegistrarAssignment {
    pub id: String,
    pub request_id: String,
    pub sub_registrar_id: String,
    pub assigned_at: DateTime<Utc>,
    pub status: String,
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Report on the original documents collected for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRegistrarReport {
    pub id: String,
    pub request_id: String,
    pub sub_registrar_id: String,
    pub document_status: DocumentStatus,
    #[serde(default)]
    pub report_data: Option<serde_json::Value>,
    pub status: ReportStatus,
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRegistrarReportCreate {
    pub request_id: String,
    pub document_status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubRegistrarReportUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_status: Option<DocumentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReportStatus>,
}

/// One page of `GET /sub-registrar/assignments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentPage {
    #[serde(default)]
    pub assignments: Vec<SubRegistrarAssignment>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishReport {
    pub request_id: String,
}
