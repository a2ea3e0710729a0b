use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::status::Role;

/// Reference data collections served under `/dictionaries/{kind}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DictionaryKind {
    Counterparties,
    ExpenseArticles,
    Contracts,
    Priorities,
    Normatives,
}

impl DictionaryKind {
    pub fn path(&self) -> &'static str {
        match self {
            DictionaryKind::Counterparties => "counterparties",
            DictionaryKind::ExpenseArticles => "expense-articles",
            DictionaryKind::Contracts => "contracts",
            DictionaryKind::Priorities => "priorities",
            DictionaryKind::Normatives => "normatives",
        }
    }
}

impl fmt::Display for DictionaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Marker for types stored in a dictionary collection.
pub trait DictionaryEntry:
    serde::de::DeserializeOwned + Serialize + Clone + Send + Sync + 'static
{
    const KIND: DictionaryKind;

    fn id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counterparty {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub bin_iin: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub owner_role: Option<Role>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractState {
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub code: String,
    pub counterparty_id: String,
    pub expense_item_id: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub limit_total: f64,
    #[serde(default)]
    pub used_total: f64,
    pub status: ContractState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormativePeriod {
    Month,
    Quarter,
    Year,
}

/// A hard rule blocks a payment that exceeds the limit; a soft one only warns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormativeRule {
    Hard,
    Soft,
}

/// Spending limit for an expense item over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normative {
    pub id: String,
    pub expense_item_id: String,
    pub period: NormativePeriod,
    pub amount_limit: f64,
    pub amount_limit_with_vat: f64,
    pub rule: NormativeRule,
    #[serde(default)]
    pub current_used: f64,
    #[serde(default)]
    pub current_used_with_vat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Priority {
    pub id: String,
    pub label: String,
    pub rank: i32,
    #[serde(default)]
    pub rule_description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

fn default_active() -> bool {
    true
}

macro_rules! dictionary_entry {
    ($ty:ty, $kind:expr) => {
        impl DictionaryEntry for $ty {
            const KIND: DictionaryKind = $kind;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

dictionary_entry!(Counterparty, DictionaryKind::Counterparties);
dictionary_entry!(ExpenseItem, DictionaryKind::ExpenseArticles);
dictionary_entry!(Contract, DictionaryKind::Contracts);
dictionary_entry!(Priority, DictionaryKind::Priorities);
dictionary_entry!(Normative, DictionaryKind::Normatives);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_paths() {
        assert_eq!(DictionaryKind::ExpenseArticles.path(), "expense-articles");
        assert_eq!(<Normative as DictionaryEntry>::KIND, DictionaryKind::Normatives);
    }

    #[test]
    fn test_normative_deserializes_with_defaults() {
        let normative: Normative = serde_json::from_value(serde_json::json!({
            "id": "n-1",
            "expense_item_id": "a-1",
            "period": "quarter",
            "amount_limit": 1000.0,
            "amount_limit_with_vat": 1120.0,
            "rule": "hard"
        }))
        .unwrap();

        assert_eq!(normative.rule, NormativeRule::Hard);
        assert_eq!(normative.current_used, 0.0);
    }
}
