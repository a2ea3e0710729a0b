pub mod balance;
pub mod normatives;
pub mod request;

pub use balance::{is_balanced, AllocationBalance, SplitBalance, BALANCE_TOLERANCE};
pub use normatives::{check_allocations, check_splits, NormativeReport};
pub use request::{require_comment, validate_new_request};
