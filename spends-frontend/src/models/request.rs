use super::status::{PaymentRequestStatus, Role};
use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Contract id used for allocations paid outside any contract.
pub const OUTSIDE_DEALS: &str = "outside-deals";

/// A payment request as the workflow sees it. Snapshot of one fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub id: String,
    pub request_number: Option<String>,
    pub counterparty_id: String,
    pub amount: f64,
    pub currency: String,
    pub due_date: Option<NaiveDate>,
    pub status: PaymentRequestStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub description: String,
    pub created_by: String,
    pub doc_number: Option<String>,
    pub doc_date: Option<NaiveDate>,
    pub doc_type: Option<String>,
    pub paying_company: Option<String>,
    pub counterparty_category: Option<String>,
    pub vat_rate: Option<String>,
    pub product_service: Option<String>,
    pub volume: Option<String>,
    pub price_rate: Option<String>,
    pub period: Option<String>,
    pub expense_category: Option<String>,
    pub responsible_registrar_id: Option<String>,
    #[serde(default)]
    pub files: Vec<FileRef>,
    #[serde(default)]
    pub expense_splits: Vec<ExpenseSplit>,
    #[serde(default)]
    pub payment_allocations: Vec<PaymentAllocation>,
    pub payment_execution: Option<PaymentExecution>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub id: Option<String>,
    pub name: String,
    pub url: Option<String>,
    pub original_name: Option<String>,
}

/// Share of the request amount assigned to one expense item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSplit {
    pub id: Option<String>,
    pub expense_item_id: String,
    pub amount: f64,
    pub comment: Option<String>,
    pub contract_id: Option<String>,
    pub priority: Option<String>,
    pub sub_registrar_id: Option<String>,
}

/// Share of the request amount paid against one contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAllocation {
    pub id: Option<String>,
    pub contract_id: String,
    pub amount: f64,
    pub currency: String,
    pub planned_date: Option<NaiveDate>,
    pub comment: Option<String>,
    pub priority: Option<String>,
    #[serde(default)]
    pub requires_payment_order: bool,
}

impl PaymentAllocation {
    pub fn is_outside_deals(&self) -> bool {
        self.contract_id == OUTSIDE_DEALS
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentExecution {
    pub actual_amount: Option<f64>,
    pub execution_date: Option<NaiveDate>,
    pub exchange_rate: Option<f64>,
    pub payment_order_url: Option<String>,
    pub execution_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub action: String,
    pub comment: Option<String>,
    pub user_id: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEvent {
    pub id: String,
    pub request_id: String,
    pub event_type: String,
    pub created_at: Option<DateTime<Utc>>,
    pub created_by_user_id: Option<String>,
    pub comment: Option<String>,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatistics {
    pub total_requests: u64,
    pub draft_count: u64,
    pub submitted_count: u64,
    pub classified_count: u64,
    pub approved_count: u64,
    pub in_registry_count: u64,
    pub paid_full_count: u64,
    pub paid_partial_count: u64,
    pub rejected_count: u64,
    pub overdue_count: u64,
    pub total_amount: f64,
    pub total_vat: f64,
}

/// Fields an executor fills in when creating or editing a request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentRequest {
    pub request_number: Option<String>,
    pub counterparty_id: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    pub doc_number: Option<String>,
    pub doc_date: Option<NaiveDate>,
    pub doc_type: Option<String>,
    pub paying_company: Option<String>,
    pub counterparty_category: Option<String>,
    pub vat_rate: Option<String>,
    pub product_service: Option<String>,
    pub volume: Option<String>,
    pub price_rate: Option<String>,
    pub period: Option<String>,
    pub expense_category: Option<String>,
    #[serde(default)]
    pub as_draft: bool,
}

/// `REQ-{last 6 digits of the ms timestamp}-{3 random digits}`.
pub fn generate_request_number(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().rem_euclid(1_000_000);
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!("REQ-{:06}-{:03}", millis, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_request_number_format() {
        let now = Utc.timestamp_millis_opt(1_718_000_123_456).unwrap();
        let number = generate_request_number(now);

        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "REQ");
        assert_eq!(parts[1], "123456");
        assert_eq!(parts[2].len(), 3);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_request_number_pads_short_timestamps() {
        let now = Utc.timestamp_millis_opt(1_000_000_000_042).unwrap();
        assert!(generate_request_number(now).starts_with("REQ-000042-"));
    }

    #[test]
    fn test_outside_deals_allocation() {
        let allocation = PaymentAllocation {
            id: None,
            contract_id: OUTSIDE_DEALS.to_string(),
            amount: 10.0,
            currency: "KZT".to_string(),
            planned_date: None,
            comment: None,
            priority: Some("high".to_string()),
            requires_payment_order: false,
        };
        assert!(allocation.is_outside_deals());
    }
}
