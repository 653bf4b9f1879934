//! Figures derived by the aggregator, shaped for display and export.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::TransactionKind;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
/// Per-month sums by classification.
pub struct MonthlyTotals {
    pub income: f64,
    pub paid_expense: f64,
    pub pending_expense: f64,
    pub savings_out: f64,
}

impl MonthlyTotals {
    /// Cash available today: pending expenses are deliberately not subtracted.
    pub fn free_balance(&self) -> f64 {
        self.income - self.paid_expense - self.savings_out
    }

    pub fn is_empty(&self) -> bool {
        self.income == 0.0
            && self.paid_expense == 0.0
            && self.pending_expense == 0.0
            && self.savings_out == 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Savings total for a single bucket name.
pub struct BucketTotal {
    pub name: String,
    pub total: f64,
    /// False for names that only appear on transfers, not in the bucket list.
    pub declared: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
/// Savings totals keyed by bucket, declared buckets first in list order.
pub struct BucketRollup {
    pub entries: Vec<BucketTotal>,
}

impl BucketRollup {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.total)
    }

    pub fn grand_total(&self) -> f64 {
        self.entries.iter().map(|entry| entry.total).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names that were summed without being declared buckets.
    pub fn undeclared(&self) -> impl Iterator<Item = &BucketTotal> {
        self.entries.iter().filter(|entry| !entry.declared)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// One row of a running-balance statement.
pub struct StatementLine {
    pub date: NaiveDate,
    pub description: String,
    pub kind: TransactionKind,
    pub settled: bool,
    /// Nominal amount, shown even when the line does not move the balance.
    pub amount: f64,
    /// Effect on the running balance; zero for unsettled expenses.
    pub signed_amount: f64,
    pub running_balance: f64,
}
