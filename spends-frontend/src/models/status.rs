use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle status of a payment request. Wire spellings are the serde names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentRequestStatus {
    #[serde(rename = "draft")]
    Draft,
    #[serde(rename = "submitted")]
    Submitted,
    #[serde(rename = "classified")]
    Classified,
    #[serde(rename = "allocated")]
    Allocated,
    #[serde(rename = "returned")]
    Returned,
    #[serde(rename = "approved")]
    Approved,
    #[serde(rename = "approved-on-behalf")]
    ApprovedOnBehalf,
    #[serde(rename = "to-pay")]
    ToPay,
    #[serde(rename = "in-register")]
    InRegister,
    #[serde(rename = "approved-for-payment")]
    ApprovedForPayment,
    #[serde(rename = "paid-full")]
    PaidFull,
    #[serde(rename = "paid-partial")]
    PaidPartial,
    #[serde(rename = "declined")]
    Declined,
    #[serde(rename = "rejected")]
    Rejected,
    #[serde(rename = "cancelled")]
    Cancelled,
    #[serde(rename = "distributed")]
    Distributed,
    #[serde(rename = "report_published")]
    ReportPublished,
    #[serde(rename = "export_linked")]
    ExportLinked,
}

impl PaymentRequestStatus {
    pub const ALL: [PaymentRequestStatus; 18] = [
        PaymentRequestStatus::Draft,
        PaymentRequestStatus::Submitted,
        PaymentRequestStatus::Classified,
        PaymentRequestStatus::Allocated,
        PaymentRequestStatus::Returned,
        PaymentRequestStatus::Approved,
        PaymentRequestStatus::ApprovedOnBehalf,
        PaymentRequestStatus::ToPay,
        PaymentRequestStatus::InRegister,
        PaymentRequestStatus::ApprovedForPayment,
        PaymentRequestStatus::PaidFull,
        PaymentRequestStatus::PaidPartial,
        PaymentRequestStatus::Declined,
        PaymentRequestStatus::Rejected,
        PaymentRequestStatus::Cancelled,
        PaymentRequestStatus::Distributed,
        PaymentRequestStatus::ReportPublished,
        PaymentRequestStatus::ExportLinked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentRequestStatus::Draft => "draft",
            PaymentRequestStatus::Submitted => "submitted",
            PaymentRequestStatus::Classified => "classified",
            PaymentRequestStatus::Allocated => "allocated",
            PaymentRequestStatus::Returned => "returned",
            PaymentRequestStatus::Approved => "approved",
            PaymentRequestStatus::ApprovedOnBehalf => "approved-on-behalf",
            PaymentRequestStatus::ToPay => "to-pay",
            PaymentRequestStatus::InRegister => "in-register",
            PaymentRequestStatus::ApprovedForPayment => "approved-for-payment",
            PaymentRequestStatus::PaidFull => "paid-full",
            PaymentRequestStatus::PaidPartial => "paid-partial",
            PaymentRequestStatus::Declined => "declined",
            PaymentRequestStatus::Rejected => "rejected",
            PaymentRequestStatus::Cancelled => "cancelled",
            PaymentRequestStatus::Distributed => "distributed",
            PaymentRequestStatus::ReportPublished => "report_published",
            PaymentRequestStatus::ExportLinked => "export_linked",
        }
    }

    /// Parse a status as the backend reports it.
    ///
    /// The backend still emits upper-case keys for some records
    /// (`REGISTERED`, `IN_REGISTRY`, ...); anything else is matched
    /// case-insensitively against the wire spelling.
    pub fn from_backend(raw: &str) -> Option<Self> {
        let legacy = match raw {
            "DRAFT" => Some(PaymentRequestStatus::Draft),
            "SUBMITTED" => Some(PaymentRequestStatus::Submitted),
            "REGISTERED" => Some(PaymentRequestStatus::Classified),
            "APPROVED" => Some(PaymentRequestStatus::Approved),
            "APPROVED_ON_BEHALF" => Some(PaymentRequestStatus::ApprovedOnBehalf),
            "TO_PAY" => Some(PaymentRequestStatus::ToPay),
            "IN_REGISTRY" => Some(PaymentRequestStatus::InRegister),
            "APPROVED_FOR_PAYMENT" => Some(PaymentRequestStatus::ApprovedForPayment),
            "PAID_FULL" => Some(PaymentRequestStatus::PaidFull),
            "PAID_PARTIAL" => Some(PaymentRequestStatus::PaidPartial),
            "REJECTED" => Some(PaymentRequestStatus::Rejected),
            "DECLINED" => Some(PaymentRequestStatus::Declined),
            "RETURNED" => Some(PaymentRequestStatus::Returned),
            "CANCELLED" => Some(PaymentRequestStatus::Cancelled),
            _ => None,
        };

        legacy.or_else(|| raw.to_lowercase().parse().ok())
    }
}

impl fmt::Display for PaymentRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for PaymentRequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentRequestStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Coarse status used by the distribution and sub-registrar screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionStatus {
    Pending,
    Distributed,
    ReportPublished,
    ExportLinked,
}

impl DistributionStatus {
    pub const ALL: [DistributionStatus; 4] = [
        DistributionStatus::Pending,
        DistributionStatus::Distributed,
        DistributionStatus::ReportPublished,
        DistributionStatus::ExportLinked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionStatus::Pending => "pending",
            DistributionStatus::Distributed => "distributed",
            DistributionStatus::ReportPublished => "report_published",
            DistributionStatus::ExportLinked => "export_linked",
        }
    }
}

impl fmt::Display for DistributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Executor,
    Registrar,
    SubRegistrar,
    Distributor,
    Treasurer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Executor => "executor",
            Role::Registrar => "registrar",
            Role::SubRegistrar => "sub_registrar",
            Role::Distributor => "distributor",
            Role::Treasurer => "treasurer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "executor" => Ok(Role::Executor),
            "registrar" => Ok(Role::Registrar),
            "sub_registrar" => Ok(Role::SubRegistrar),
            "distributor" => Ok(Role::Distributor),
            "treasurer" => Ok(Role::Treasurer),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// State of the original documents collected by a sub-registrar.
///
/// The backend stores the Russian labels; both spellings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[serde(rename = "not-received", alias = "Не получены")]
    NotReceived,
    #[serde(rename = "partially-received", alias = "Частично получены")]
    PartiallyReceived,
    #[serde(rename = "fully-received", alias = "Получены в полном объёме")]
    FullyReceived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Draft,
    Published,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_spelling_round_trips_through_from_str() {
        for status in PaymentRequestStatus::ALL {
            assert_eq!(status.as_str().parse::<PaymentRequestStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_serde_uses_wire_spelling() {
        let json = serde_json::to_string(&PaymentRequestStatus::ApprovedOnBehalf).unwrap();
        assert_eq!(json, "\"approved-on-behalf\"");
        let parsed: PaymentRequestStatus = serde_json::from_str("\"report_published\"").unwrap();
        assert_eq!(parsed, PaymentRequestStatus::ReportPublished);
    }

    #[test]
    fn test_from_backend_maps_legacy_keys() {
        assert_eq!(
            PaymentRequestStatus::from_backend("REGISTERED"),
            Some(PaymentRequestStatus::Classified)
        );
        assert_eq!(
            PaymentRequestStatus::from_backend("IN_REGISTRY"),
            Some(PaymentRequestStatus::InRegister)
        );
        assert_eq!(
            PaymentRequestStatus::from_backend("PAID_PARTIAL"),
            Some(PaymentRequestStatus::PaidPartial)
        );
        assert_eq!(
            PaymentRequestStatus::from_backend("DISTRIBUTED"),
            Some(PaymentRequestStatus::Distributed)
        );
        assert_eq!(
            PaymentRequestStatus::from_backend("approved-for-payment"),
            Some(PaymentRequestStatus::ApprovedForPayment)
        );
        assert_eq!(PaymentRequestStatus::from_backend("ARCHIVED"), None);
    }

    #[test]
    fn test_unknown_status_is_error() {
        let err = "approved_for_payment"
            .parse::<PaymentRequestStatus>()
            .unwrap_err();
        assert_eq!(err, UnknownStatus("approved_for_payment".to_string()));
        assert_eq!(err.to_string(), "unknown status 'approved_for_payment'");

        let source: Box<dyn std::error::Error> = Box::new(err);
        assert!(source.source().is_none());
    }

    #[test]
    fn test_role_parsing_accepts_kebab_case() {
        assert_eq!("sub-registrar".parse::<Role>(), Ok(Role::SubRegistrar));
        assert_eq!("Treasurer".parse::<Role>(), Ok(Role::Treasurer));
        assert_eq!(
            "auditor".parse::<Role>().unwrap_err().to_string(),
            "unknown role 'auditor'"
        );
    }

    #[test]
    fn test_document_status_accepts_backend_labels() {
        let parsed: DocumentStatus = serde_json::from_str("\"Частично получены\"").unwrap();
        assert_eq!(parsed, DocumentStatus::PartiallyReceived);
        let json = serde_json::to_string(&DocumentStatus::FullyReceived).unwrap();
        assert_eq!(json, "\"fully-received\"");
    }
}
