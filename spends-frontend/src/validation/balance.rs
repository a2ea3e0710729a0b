//! Balance checks for expense splits and payment allocations.

use crate::models::{ExpenseSplit, PaymentAllocation};
use serde::Serialize;

/// Two totals are equal when they differ by less than this.
pub const BALANCE_TOLERANCE: f64 = 0.01;

pub fn is_balanced(total: f64, amount: f64) -> bool {
    (total - amount).abs() < BALANCE_TOLERANCE
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitBalance {
    pub total: f64,
    pub remaining: f64,
    pub is_balanced: bool,
    pub errors: Vec<String>,
}

impl SplitBalance {
    pub fn of(request_amount: f64, splits: &[ExpenseSplit]) -> Self {
        let total: f64 = splits.iter().map(|s| s.amount).sum();
        let balanced = is_balanced(total, request_amount);
        let mut errors = Vec::new();

        if splits.is_empty() {
            errors.push("At least one expense split is required".to_string());
        }
        if splits.iter().any(|s| s.expense_item_id.trim().is_empty()) {
            errors.push("Every split must have an expense item".to_string());
        }
        if splits.iter().any(|s| s.amount <= 0.0) {
            errors.push("Split amounts must be greater than zero".to_string());
        }
        if !balanced {
            errors.push(format!(
                "Split total {:.2} does not match request amount {:.2}",
                total, request_amount
            ));
        }

        SplitBalance {
            total,
            remaining: request_amount - total,
            is_balanced: balanced,
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationBalance {
    pub total: f64,
    pub remaining: f64,
    pub is_balanced: bool,
    pub errors: Vec<String>,
}

impl AllocationBalance {
    pub fn of(request_amount: f64, allocations: &[PaymentAllocation]) -> Self {
        let total: f64 = allocations.iter().map(|a| a.amount).sum();
        let balanced = is_balanced(total, request_amount);
        let mut errors = Vec::new();

        if allocations.is_empty() {
            errors.push("At least one payment allocation is required".to_string());
        }
        if allocations.iter().any(|a| a.contract_id.trim().is_empty()) {
            errors.push("Every allocation must reference a contract".to_string());
        }
        if allocations.iter().any(|a| a.amount <= 0.0) {
            errors.push("Allocation amounts must be greater than zero".to_string());
        }
        if allocations
            .iter()
            .any(|a| a.priority.as_deref().map(str::trim).unwrap_or("").is_empty())
        {
            errors.push("Every allocation must have a priority".to_string());
        }
        if !balanced {
            errors.push(format!(
                "Allocated total {:.2} does not match request amount {:.2}",
                total, request_amount
            ));
        }

        AllocationBalance {
            total,
            remaining: request_amount - total,
            is_balanced: balanced,
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OUTSIDE_DEALS;

    fn split(item: &str, amount: f64) -> ExpenseSplit {
        ExpenseSplit {
            id: None,
            expense_item_id: item.to_string(),
            amount,
            comment: None,
            contract_id: None,
            priority: None,
            sub_registrar_id: None,
        }
    }

    fn allocation(contract: &str, amount: f64, priority: Option<&str>) -> PaymentAllocation {
        PaymentAllocation {
            id: None,
            contract_id: contract.to_string(),
            amount,
            currency: "KZT".to_string(),
            planned_date: None,
            comment: None,
            priority: priority.map(str::to_string),
            requires_payment_order: false,
        }
    }

    #[test]
    fn test_exact_splits_are_balanced() {
        let balance = SplitBalance::of(100.0, &[split("a", 60.0), split("b", 40.0)]);
        assert!(balance.is_balanced);
        assert!(balance.is_valid());
    }

    #[test]
    fn test_splits_within_tolerance_are_balanced() {
        let balance = SplitBalance::of(100.0, &[split("a", 33.33), split("b", 33.33), split("c", 33.335)]);
        assert!(balance.is_balanced);
    }

    #[test]
    fn test_splits_off_by_two_cents_are_unbalanced() {
        let balance = SplitBalance::of(100.0, &[split("a", 60.0), split("b", 39.98)]);
        assert!(!balance.is_balanced);
        assert_eq!(balance.errors.len(), 1);
        assert!(balance.errors[0].contains("99.98"));
    }

    #[test]
    fn test_split_errors() {
        let balance = SplitBalance::of(100.0, &[split("", 100.0), split("b", 0.0)]);
        assert!(balance.is_balanced);
        assert_eq!(balance.errors.len(), 2);

        let empty = SplitBalance::of(100.0, &[]);
        assert!(!empty.is_valid());
    }

    #[test]
    fn test_allocations_require_contract_and_priority() {
        let balance = AllocationBalance::of(
            100.0,
            &[allocation(OUTSIDE_DEALS, 50.0, Some("p1")), allocation("", 50.0, None)],
        );
        assert!(balance.is_balanced);
        assert_eq!(balance.errors.len(), 2);

        let ok = AllocationBalance::of(100.0, &[allocation("c-1", 100.0, Some("p1"))]);
        assert!(ok.is_valid());
    }
}
