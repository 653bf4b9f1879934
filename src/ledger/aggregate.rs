//! Monthly aggregation and balance rules.
//!
//! Every function here is pure: inputs are borrowed, nothing is mutated and the
//! results depend only on the arguments. Input order carries no meaning; any
//! ordering a result needs is imposed here.
//!
//! The central rule: an expense reduces a balance only once it is settled.
//! Savings transfers leave the spendable pool the moment they are recorded.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::domain::{Bucket, NamedEntity, Transaction, TransactionKind};

use super::summary::{BucketRollup, BucketTotal, MonthlyTotals, StatementLine};

/// Transactions dated within the given calendar month, of every kind and status.
pub fn select_month(transactions: &[Transaction], year: i32, month: u32) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|txn| txn.date.year() == year && txn.date.month() == month)
        .collect()
}

/// Sums a month subset by classification.
pub fn monthly_totals<'a, I>(subset: I) -> MonthlyTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    subset
        .into_iter()
        .fold(MonthlyTotals::default(), |mut totals, txn| {
            match txn.kind {
                TransactionKind::Income => totals.income += txn.amount,
                TransactionKind::Expense if txn.settled => totals.paid_expense += txn.amount,
                TransactionKind::Expense => totals.pending_expense += txn.amount,
                TransactionKind::SavingsTransfer => totals.savings_out += txn.amount,
            }
            totals
        })
}

/// Balance effect of a single transaction.
pub fn balance_effect(txn: &Transaction) -> f64 {
    match txn.kind {
        TransactionKind::Income => txn.amount,
        TransactionKind::Expense if txn.settled => -txn.amount,
        TransactionKind::Expense => 0.0,
        TransactionKind::SavingsTransfer => -txn.amount,
    }
}

/// Running balance over the whole history, or only the days strictly before `as_of`.
pub fn cumulative_balance(transactions: &[Transaction], as_of: Option<NaiveDate>) -> f64 {
    transactions
        .iter()
        .filter(|txn| as_of.map_or(true, |cutoff| txn.date < cutoff))
        .map(balance_effect)
        .fold(0.0, |total, effect| total + effect)
}

/// Balance carried into a period: everything dated before `period_start`.
pub fn prior_balance(transactions: &[Transaction], period_start: NaiveDate) -> f64 {
    cumulative_balance(transactions, Some(period_start))
}

/// Savings totals per bucket.
///
/// Every declared bucket is present, in list order, even with a zero total.
/// Transfers naming an undeclared bucket are summed under that literal name and
/// listed after the declared buckets in first-seen order.
pub fn bucket_rollup(transactions: &[Transaction], buckets: &[Bucket]) -> BucketRollup {
    let mut entries: Vec<BucketTotal> = Vec::with_capacity(buckets.len());
    let mut seen = HashSet::new();
    for bucket in buckets {
        if seen.insert(bucket.name()) {
            entries.push(BucketTotal {
                name: bucket.name().to_string(),
                total: 0.0,
                declared: true,
            });
        }
    }

    for txn in transactions.iter().filter(|txn| txn.is_savings_transfer()) {
        match entries
            .iter_mut()
            .find(|entry| entry.name == txn.description)
        {
            Some(entry) => entry.total += txn.amount,
            None => entries.push(BucketTotal {
                name: txn.description.clone(),
                total: txn.amount,
                declared: false,
            }),
        }
    }

    BucketRollup { entries }
}

/// Chronological statement for a month subset seeded with `starting_balance`.
///
/// Ties on date keep their input order. Unsettled expenses are listed with
/// their nominal amount but a zero balance effect.
pub fn running_statement<'a, I>(subset: I, starting_balance: f64) -> Vec<StatementLine>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut ordered: Vec<&Transaction> = subset.into_iter().collect();
    ordered.sort_by_key(|txn| txn.date);

    let mut balance = starting_balance;
    ordered
        .into_iter()
        .map(|txn| {
            let signed_amount = balance_effect(txn);
            balance += signed_amount;
            StatementLine {
                date: txn.date,
                description: txn.description.clone(),
                kind: txn.kind,
                settled: txn.settled,
                amount: txn.amount,
                signed_amount,
                running_balance: balance,
            }
        })
        .collect()
}
