pub mod actions;
pub mod api_client;
pub mod dictionaries;
pub mod distribution;
pub mod export_contracts;
pub mod metrics;
pub mod notifications;
pub mod payment_requests;
pub mod sub_registrar;

pub use actions::{WorkflowAction, WorkflowActions, WorkflowError};
pub use api_client::{ApiClient, ApiError};
pub use dictionaries::DictionaryClient;
pub use notifications::{Notification, NotificationCenter, NotificationKind};
pub use payment_requests::PaymentRequestClient;
