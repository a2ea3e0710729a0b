//! Backend payloads (snake_case) and their conversion into domain models.

use super::request::{
    ExpenseSplit, FileRef, NewPaymentRequest, PaymentAllocation, PaymentRequest, RequestEvent,
    RequestStatistics,
};
use super::status::PaymentRequestStatus;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct RequestLineOut {
    pub id: Option<String>,
    pub article_id: Option<String>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub amount_net: f64,
    pub vat_rate_id: Option<String>,
    pub currency_code: Option<String>,
    pub status: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileOut {
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    #[serde(alias = "originalName")]
    pub original_name: Option<String>,
}

/// Request record as returned by list, detail and action endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestOut {
    pub id: String,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub status: String,
    #[serde(default)]
    pub created_by_user_id: Option<String>,
    #[serde(default)]
    pub counterparty_id: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub amount_total: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub vat_total: f64,
    #[serde(default, deserialize_with = "flexible_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub expense_article_text: Option<String>,
    #[serde(default)]
    pub doc_number: Option<String>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub doc_date: Option<NaiveDate>,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub files: Vec<FileOut>,
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub responsible_registrar_id: Option<String>,
    #[serde(default)]
    pub lines: Vec<RequestLineOut>,
    #[serde(default)]
    pub paying_company: Option<String>,
    #[serde(default)]
    pub counterparty_category: Option<String>,
    #[serde(default)]
    pub vat_rate: Option<String>,
    #[serde(default)]
    pub product_service: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub price_rate: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
}

impl RequestOut {
    /// Convert to the domain model. `None` when the status is not one we know.
    pub fn into_domain(self) -> Option<PaymentRequest> {
        let status = PaymentRequestStatus::from_backend(&self.status)?;

        let vat_rate = self.vat_rate.or_else(|| {
            self.lines
                .first()
                .and_then(|line| line.vat_rate_id.clone())
        });

        let files = self
            .files
            .into_iter()
            .map(|file| FileRef {
                id: file.id,
                name: file
                    .name
                    .or_else(|| file.original_name.clone())
                    .unwrap_or_default(),
                url: file.url,
                original_name: file.original_name,
            })
            .collect();

        Some(PaymentRequest {
            id: self.id,
            request_number: self.number,
            counterparty_id: self.counterparty_id.unwrap_or_default(),
            amount: self.amount_total,
            currency: self.currency_code.unwrap_or_else(|| "KZT".to_string()),
            due_date: self.due_date,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            description: self.title.unwrap_or_default(),
            created_by: self.created_by_user_id.unwrap_or_default(),
            doc_number: self.doc_number,
            doc_date: self.doc_date,
            doc_type: self.doc_type,
            paying_company: self.paying_company,
            counterparty_category: self.counterparty_category,
            vat_rate,
            product_service: self.product_service,
            volume: self.volume,
            price_rate: self.price_rate,
            period: self.period,
            expense_category: self.expense_article_text,
            responsible_registrar_id: self.responsible_registrar_id,
            files,
            expense_splits: Vec::new(),
            payment_allocations: Vec::new(),
            payment_execution: None,
            history: Vec::new(),
        })
    }
}

/// Normalise a backend list, dropping records whose status is unknown.
pub fn normalize_requests(records: Vec<RequestOut>) -> Vec<PaymentRequest> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id.clone();
            let status = record.status.clone();
            let request = record.into_domain();
            if request.is_none() {
                tracing::warn!(request_id = %id, status = %status, "Skipping request with unknown status");
            }
            request
        })
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatisticsOut {
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub draft: u64,
    #[serde(default)]
    pub submitted: u64,
    #[serde(default)]
    pub classified: u64,
    #[serde(default)]
    pub approved: u64,
    #[serde(default)]
    pub in_registry: u64,
    #[serde(default)]
    pub paid_full: u64,
    #[serde(default)]
    pub paid_partial: u64,
    #[serde(default)]
    pub rejected: u64,
    #[serde(default)]
    pub overdue: u64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub total_vat: f64,
}

impl From<StatisticsOut> for RequestStatistics {
    fn from(stats: StatisticsOut) -> Self {
        RequestStatistics {
            total_requests: stats.total_requests,
            draft_count: stats.draft,
            submitted_count: stats.submitted,
            classified_count: stats.classified,
            approved_count: stats.approved,
            in_registry_count: stats.in_registry,
            paid_full_count: stats.paid_full,
            paid_partial_count: stats.paid_partial,
            rejected_count: stats.rejected,
            overdue_count: stats.overdue,
            total_amount: stats.total_amount,
            total_vat: stats.total_vat,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestEventOut {
    pub id: String,
    pub request_id: String,
    pub event_type: String,
    #[serde(default, deserialize_with = "flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by_user_id: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl From<RequestEventOut> for RequestEvent {
    fn from(event: RequestEventOut) -> Self {
        RequestEvent {
            id: event.id,
            request_id: event.request_id,
            event_type: event.event_type,
            created_at: event.created_at,
            created_by_user_id: event.created_by_user_id,
            comment: event.comment,
            data: event.data,
        }
    }
}

/// Body of `POST /requests` and `PUT /requests/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct RequestCreateBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub title: String,
    pub currency_code: String,
    pub counterparty_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub amount_total: f64,
    pub vat_total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_article_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paying_company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl From<&NewPaymentRequest> for RequestCreateBody {
    fn from(request: &NewPaymentRequest) -> Self {
        let title = if request.description.trim().is_empty() {
            let parts: Vec<String> = [
                ("Expense article", &request.expense_category),
                ("Product/service", &request.product_service),
                ("Volume", &request.volume),
                ("Price/rate", &request.price_rate),
                ("Period", &request.period),
            ]
            .iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
            .collect();

            if parts.is_empty() {
                "Draft request".to_string()
            } else {
                parts.join(", ")
            }
        } else {
            request.description.clone()
        };

        RequestCreateBody {
            number: request.request_number.clone(),
            title,
            currency_code: request.currency.clone().unwrap_or_else(|| "KZT".to_string()),
            counterparty_id: request.counterparty_id.clone(),
            due_date: request.due_date,
            amount_total: request.amount.unwrap_or(0.0),
            vat_total: 0.0,
            expense_article_text: request.expense_category.clone(),
            doc_number: request.doc_number.clone(),
            doc_date: request.doc_date,
            doc_type: request.doc_type.clone(),
            paying_company: request.paying_company.clone(),
            counterparty_category: request.counterparty_category.clone(),
            vat_rate: request.vat_rate.clone(),
            product_service: request.product_service.clone(),
            volume: request.volume.clone(),
            price_rate: request.price_rate.clone(),
            period: request.period.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentBody {
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitBody {
    pub article_id: String,
    pub amount: f64,
    pub comment: Option<String>,
}

/// Body of the classify and send-to-distributor endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyBody {
    pub comment: Option<String>,
    pub expense_splits: Vec<SplitBody>,
}

impl ClassifyBody {
    pub fn new(splits: &[ExpenseSplit], comment: Option<String>) -> Self {
        ClassifyBody {
            comment,
            expense_splits: splits
                .iter()
                .map(|split| SplitBody {
                    article_id: split.expense_item_id.clone(),
                    amount: split.amount,
                    comment: split.comment.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributorDecision {
    Approve,
    Decline,
    Return,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllocationBody {
    pub contract_id: String,
    pub amount: f64,
    pub currency: String,
    pub planned_date: Option<NaiveDate>,
    pub comment: Option<String>,
    pub priority: Option<String>,
    pub requires_payment_order: bool,
}

impl From<&PaymentAllocation> for AllocationBody {
    fn from(allocation: &PaymentAllocation) -> Self {
        AllocationBody {
            contract_id: allocation.contract_id.clone(),
            amount: allocation.amount,
            currency: allocation.currency.clone(),
            planned_date: allocation.planned_date,
            comment: allocation.comment.clone(),
            priority: allocation.priority.clone(),
            requires_payment_order: allocation.requires_payment_order,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributorActionBody {
    pub action: DistributorDecision,
    pub comment: Option<String>,
    pub allocations: Vec<AllocationBody>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusPatchBody {
    pub status: PaymentRequestStatus,
    #[serde(rename = "executionData", skip_serializing_if = "Option::is_none")]
    pub execution_data: Option<serde_json::Value>,
}

/// Accepts numbers and numeric strings (decimals are serialised as strings).
pub fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
        Null(()),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
        NumberOrString::Null(()) => Ok(0.0),
    }
}

/// Accepts `YYYY-MM-DD` or a full timestamp, keeping the date part.
pub fn flexible_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| parse_date(&value)))
}

/// Accepts RFC 3339 timestamps and naive ones (read as UTC).
pub fn flexible_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| parse_datetime(&value)))
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            parse_date(value)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend_record(status: &str) -> serde_json::Value {
        json!({
            "id": "r-1",
            "number": "REQ-000001-001",
            "title": "Fuel for harvest",
            "status": status,
            "created_by_user_id": "u-1",
            "counterparty_id": "cp-1",
            "currency_code": "KZT",
            "amount_total": "150000.50",
            "vat_total": 0,
            "due_date": "2024-06-30",
            "created_at": "2024-06-01T08:30:00",
            "files": [{"id": "f-1", "name": "invoice.pdf", "url": "/files/f-1"}],
            "lines": [{"id": "l-1", "article_id": "a-1", "amount_net": 150000.5, "vat_rate_id": "12%"}]
        })
    }

    #[test]
    fn test_normalizes_backend_record() {
        let record: RequestOut = serde_json::from_value(backend_record("REGISTERED")).unwrap();
        let request = record.into_domain().unwrap();

        assert_eq!(request.status, PaymentRequestStatus::Classified);
        assert_eq!(request.request_number.as_deref(), Some("REQ-000001-001"));
        assert_eq!(request.description, "Fuel for harvest");
        assert_eq!(request.amount, 150000.5);
        assert_eq!(request.currency, "KZT");
        assert_eq!(request.due_date, NaiveDate::from_ymd_opt(2024, 6, 30));
        assert_eq!(request.vat_rate.as_deref(), Some("12%"));
        assert_eq!(request.files.len(), 1);
        assert!(request.created_at.is_some());
    }

    #[test]
    fn test_normalize_skips_unknown_statuses() {
        let records: Vec<RequestOut> = serde_json::from_value(json!([
            backend_record("IN_REGISTRY"),
            backend_record("ARCHIVED"),
        ]))
        .unwrap();

        let requests = normalize_requests(records);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].status, PaymentRequestStatus::InRegister);
    }

    #[test]
    fn test_parse_datetime_variants() {
        assert!(parse_datetime("2024-06-01T08:30:00Z").is_some());
        assert!(parse_datetime("2024-06-01T08:30:00.123456").is_some());
        assert!(parse_datetime("2024-06-01").is_some());
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn test_create_body_builds_title_from_fields() {
        let request = NewPaymentRequest {
            product_service: Some("Diesel".to_string()),
            period: Some("June".to_string()),
            ..Default::default()
        };

        let body = RequestCreateBody::from(&request);
        assert_eq!(body.title, "Product/service: Diesel, Period: June");
        assert_eq!(body.currency_code, "KZT");
    }

    #[test]
    fn test_classify_body_uses_article_ids() {
        let splits = vec![ExpenseSplit {
            id: None,
            expense_item_id: "a-9".to_string(),
            amount: 10.0,
            comment: None,
            contract_id: None,
            priority: None,
            sub_registrar_id: None,
        }];

        let body = serde_json::to_value(ClassifyBody::new(&splits, Some("ok".to_string()))).unwrap();
        assert_eq!(body["expense_splits"][0]["article_id"], "a-9");
        assert_eq!(body["comment"], "ok");
    }
}
