//! Builds the management summary and statement views for a selected month.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{MonthSelector, Transaction, TransactionKind};
use crate::ledger::{
    bucket_rollup, monthly_totals, prior_balance, running_statement, select_month, BucketRollup,
    Ledger, MonthlyTotals, StatementLine,
};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Which kinds of entries a listing shows.
pub enum TransactionFilter {
    #[default]
    All,
    Income,
    Expenses,
    Savings,
}

impl TransactionFilter {
    pub fn matches(self, txn: &Transaction) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Income => txn.kind == TransactionKind::Income,
            TransactionFilter::Expenses => txn.kind == TransactionKind::Expense,
            TransactionFilter::Savings => txn.kind == TransactionKind::SavingsTransfer,
        }
    }
}

impl fmt::Display for TransactionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionFilter::All => "All",
            TransactionFilter::Income => "Income",
            TransactionFilter::Expenses => "Expenses",
            TransactionFilter::Savings => "Savings",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Month totals, the filtered month listing and all-time bucket totals.
pub struct ManagementSummary {
    pub month: MonthSelector,
    pub filter: TransactionFilter,
    pub totals: MonthlyTotals,
    pub free_balance: f64,
    /// Newest first.
    pub transactions: Vec<Transaction>,
    pub buckets: BucketRollup,
    pub total_saved: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Running-balance statement for one month, seeded from all earlier history.
pub struct Statement {
    pub month: MonthSelector,
    pub prior_balance: f64,
    pub lines: Vec<StatementLine>,
    pub final_balance: f64,
}

/// Stateless view builders over a [`Ledger`] snapshot.
pub struct SummaryService;

impl SummaryService {
    pub fn month_totals(ledger: &Ledger, month: MonthSelector) -> MonthlyTotals {
        monthly_totals(select_month(&ledger.transactions, month.year(), month.month()))
    }

    pub fn management_summary(
        ledger: &Ledger,
        month: MonthSelector,
        filter: TransactionFilter,
    ) -> ManagementSummary {
        let subset = select_month(&ledger.transactions, month.year(), month.month());
        let totals = monthly_totals(subset.iter().copied());

        let mut transactions: Vec<Transaction> = subset
            .into_iter()
            .filter(|txn| filter.matches(txn))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));

        let buckets = bucket_rollup(&ledger.transactions, &ledger.buckets);
        let total_saved = buckets.grand_total();
        tracing::debug!(
            month = %month,
            %filter,
            rows = transactions.len(),
            "built management summary"
        );
        ManagementSummary {
            month,
            filter,
            free_balance: totals.free_balance(),
            totals,
            transactions,
            buckets,
            total_saved,
        }
    }

    pub fn statement(ledger: &Ledger, month: MonthSelector) -> Statement {
        let opening = prior_balance(&ledger.transactions, month.first_day());
        let subset = select_month(&ledger.transactions, month.year(), month.month());
        let lines = running_statement(subset, opening);
        let final_balance = lines
            .last()
            .map(|line| line.running_balance)
            .unwrap_or(opening);
        tracing::debug!(month = %month, lines = lines.len(), "built statement");
        Statement {
            month,
            prior_balance: opening,
            lines,
            final_balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{BucketService, TransactionService};
    use crate::domain::TransactionDraft;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        BucketService::add(&mut ledger, "Vacation").unwrap();
        BucketService::add(&mut ledger, "Emergency").unwrap();
        let drafts = vec![
            TransactionDraft::new(TransactionKind::Income, "February pay", 400.0, date(2024, 2, 1)),
            TransactionDraft::new(TransactionKind::SavingsTransfer, "Emergency", 50.0, date(2024, 2, 9)),
            TransactionDraft::new(TransactionKind::Income, "Salary", 1000.0, date(2024, 3, 1)),
            TransactionDraft::new(TransactionKind::Expense, "Rent", 300.0, date(2024, 3, 5)),
            TransactionDraft::new(TransactionKind::Expense, "Internet", 50.0, date(2024, 3, 10)),
            TransactionDraft::new(TransactionKind::SavingsTransfer, "Vacation", 100.0, date(2024, 3, 15)),
        ];
        for draft in drafts {
            let id = TransactionService::add(&mut ledger, draft.clone()).unwrap();
            if draft.description == "Rent" {
                TransactionService::toggle_settled(&mut ledger, &id).unwrap();
            }
        }
        ledger
    }

    #[test]
    fn management_summary_filters_and_sorts_newest_first() {
        let ledger = sample_ledger();
        let march = MonthSelector::new(2024, 3).unwrap();
        let summary =
            SummaryService::management_summary(&ledger, march, TransactionFilter::Expenses);
        let names: Vec<&str> = summary
            .transactions
            .iter()
            .map(|t| t.description.as_str())
            .collect();
        assert_eq!(names, vec!["Internet", "Rent"]);
        assert_eq!(summary.totals.income, 1000.0);
        assert_eq!(summary.free_balance, 600.0);
        assert_eq!(summary.buckets.get("Vacation"), Some(100.0));
        assert_eq!(summary.buckets.get("Emergency"), Some(50.0));
        assert_eq!(summary.total_saved, 150.0);
    }

    #[test]
    fn statement_is_seeded_with_prior_balance() {
        let ledger = sample_ledger();
        let march = MonthSelector::new(2024, 3).unwrap();
        let statement = SummaryService::statement(&ledger, march);
        assert_eq!(statement.prior_balance, 350.0);
        assert_eq!(statement.lines.len(), 4);
        assert_eq!(statement.final_balance, 950.0);
    }

    #[test]
    fn statement_for_empty_month_carries_balance_forward() {
        let ledger = sample_ledger();
        let april = MonthSelector::new(2024, 4).unwrap();
        let statement = SummaryService::statement(&ledger, april);
        assert!(statement.lines.is_empty());
        assert_eq!(statement.prior_balance, 950.0);
        assert_eq!(statement.final_balance, 950.0);
    }
}
