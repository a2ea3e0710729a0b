pub mod dictionary;
pub mod distribution;
pub mod export_contract;
pub mod request;
pub mod status;
pub mod sub_registrar;
pub mod wire;

pub use dictionary::{
    Contract, Counterparty, DictionaryEntry, DictionaryKind, ExpenseItem, Normative,
    NormativeRule, Priority,
};
pub use request::{
    ExpenseSplit, NewPaymentRequest, PaymentAllocation, PaymentExecution, PaymentRequest,
    RequestEvent, RequestStatistics, OUTSIDE_DEALS,
};
pub use status::{DistributionStatus, DocumentStatus, PaymentRequestStatus, ReportStatus, Role};
