//! Spending-limit checks against expense item normatives.

use crate::models::{Contract, ExpenseSplit, Normative, NormativeRule, PaymentAllocation};
use serde::Serialize;

/// VAT factor applied when checking the with-VAT limit.
pub const VAT_FACTOR: f64 = 1.12;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormativeCheck {
    pub normative_id: String,
    pub expense_item_id: String,
    pub rule: NormativeRule,
    pub new_used: f64,
    pub new_used_with_vat: f64,
    pub exceeds_limit: bool,
    pub exceeds_limit_with_vat: bool,
}

impl NormativeCheck {
    pub fn is_violation(&self) -> bool {
        self.exceeds_limit || self.exceeds_limit_with_vat
    }

    pub fn is_blocking(&self) -> bool {
        self.is_violation() && self.rule == NormativeRule::Hard
    }
}

pub fn check_normative(normative: &Normative, amount: f64) -> NormativeCheck {
    let new_used = normative.current_used + amount;
    let new_used_with_vat = normative.current_used_with_vat + amount * VAT_FACTOR;

    NormativeCheck {
        normative_id: normative.id.clone(),
        expense_item_id: normative.expense_item_id.clone(),
        rule: normative.rule,
        new_used,
        new_used_with_vat,
        exceeds_limit: new_used > normative.amount_limit,
        exceeds_limit_with_vat: new_used_with_vat > normative.amount_limit_with_vat,
    }
}

/// Check one allocation. `None` when its contract or normative is unknown.
pub fn check_allocation(
    allocation: &PaymentAllocation,
    contracts: &[Contract],
    normatives: &[Normative],
) -> Option<NormativeCheck> {
    if allocation.is_outside_deals() {
        return None;
    }
    let contract = contracts.iter().find(|c| c.id == allocation.contract_id)?;
    let normative = normatives
        .iter()
        .find(|n| n.expense_item_id == contract.expense_item_id)?;
    Some(check_normative(normative, allocation.amount))
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormativeReport {
    pub checks: Vec<NormativeCheck>,
}

impl NormativeReport {
    pub fn violations(&self) -> impl Iterator<Item = &NormativeCheck> {
        self.checks.iter().filter(|c| c.is_violation())
    }

    pub fn has_blocking(&self) -> bool {
        self.checks.iter().any(NormativeCheck::is_blocking)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.violations()
            .filter(|c| !c.is_blocking())
            .map(|c| format!("Soft limit exceeded for expense item {}", c.expense_item_id))
            .collect()
    }

    pub fn blocking_errors(&self) -> Vec<String> {
        self.violations()
            .filter(|c| c.is_blocking())
            .map(|c| format!("Hard limit exceeded for expense item {}", c.expense_item_id))
            .collect()
    }
}

pub fn check_allocations(
    allocations: &[PaymentAllocation],
    contracts: &[Contract],
    normatives: &[Normative],
) -> NormativeReport {
    NormativeReport {
        checks: allocations
            .iter()
            .filter_map(|a| check_allocation(a, contracts, normatives))
            .collect(),
    }
}

/// Per-normative check of the summed split amounts of a request.
pub fn check_splits(splits: &[ExpenseSplit], normatives: &[Normative]) -> NormativeReport {
    let checks = normatives
        .iter()
        .filter_map(|normative| {
            let amounts: Vec<f64> = splits
                .iter()
                .filter(|s| s.expense_item_id == normative.expense_item_id)
                .map(|s| s.amount)
                .collect();
            if amounts.is_empty() {
                None
            } else {
                Some(check_normative(normative, amounts.iter().sum()))
            }
        })
        .collect();

    NormativeReport { checks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dictionary::{ContractState, NormativePeriod};
    use crate::models::OUTSIDE_DEALS;

    fn normative(rule: NormativeRule) -> Normative {
        Normative {
            id: "n-1".to_string(),
            expense_item_id: "a-1".to_string(),
            period: NormativePeriod::Month,
            amount_limit: 1000.0,
            amount_limit_with_vat: 1120.0,
            rule,
            current_used: 900.0,
            current_used_with_vat: 1008.0,
        }
    }

    fn contract() -> Contract {
        Contract {
            id: "c-1".to_string(),
            code: "C-1".to_string(),
            counterparty_id: "cp-1".to_string(),
            expense_item_id: "a-1".to_string(),
            start_date: None,
            end_date: None,
            limit_total: 0.0,
            used_total: 0.0,
            status: ContractState::Active,
        }
    }

    fn allocation(contract_id: &str, amount: f64) -> PaymentAllocation {
        PaymentAllocation {
            id: None,
            contract_id: contract_id.to_string(),
            amount,
            currency: "KZT".to_string(),
            planned_date: None,
            comment: None,
            priority: Some("p1".to_string()),
            requires_payment_order: false,
        }
    }

    #[test]
    fn test_within_limits() {
        let check = check_normative(&normative(NormativeRule::Hard), 100.0);
        assert_eq!(check.new_used, 1000.0);
        assert!(!check.exceeds_limit);
        assert!(!check.is_violation());
    }

    #[test]
    fn test_vat_limit_checked_separately() {
        let mut n = normative(NormativeRule::Soft);
        n.amount_limit = 10_000.0;
        let check = check_normative(&n, 200.0);
        assert!(!check.exceeds_limit);
        assert!(check.exceeds_limit_with_vat);
        assert!(check.is_violation());
        assert!(!check.is_blocking());
    }

    #[test]
    fn test_hard_rule_blocks() {
        let report = check_allocations(
            &[allocation("c-1", 150.0)],
            &[contract()],
            &[normative(NormativeRule::Hard)],
        );
        assert!(report.has_blocking());
        assert_eq!(report.blocking_errors().len(), 1);
        assert!(report.warnings().is_empty());
    }

    #[test]
    fn test_outside_deals_and_unknown_contracts_are_skipped() {
        let report = check_allocations(
            &[allocation(OUTSIDE_DEALS, 5000.0), allocation("c-404", 5000.0)],
            &[contract()],
            &[normative(NormativeRule::Hard)],
        );
        assert!(report.checks.is_empty());
    }

    #[test]
    fn test_split_sum_per_normative() {
        let split = |amount| ExpenseSplit {
            id: None,
            expense_item_id: "a-1".to_string(),
            amount,
            comment: None,
            contract_id: None,
            priority: None,
            sub_registrar_id: None,
        };
        let report = check_splits(&[split(60.0), split(60.0)], &[normative(NormativeRule::Soft)]);
        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].new_used, 1020.0);
        assert_eq!(report.warnings().len(), 1);
    }
}
