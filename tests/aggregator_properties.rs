mod common;

use cashbook_core::{
    core::services::TransactionService,
    domain::{Bucket, TransactionKind},
    ledger::{
        bucket_rollup, cumulative_balance, monthly_totals, prior_balance, running_statement,
        select_month, Ledger,
    },
};
use common::{add, date, march_ledger};

#[test]
fn march_example_totals() {
    let (ledger, _) = march_ledger();
    let subset = select_month(&ledger.transactions, 2024, 3);
    let totals = monthly_totals(subset);
    assert_eq!(totals.income, 1000.0);
    assert_eq!(totals.paid_expense, 300.0);
    assert_eq!(totals.pending_expense, 50.0);
    assert_eq!(totals.savings_out, 100.0);
    assert_eq!(totals.free_balance(), 600.0);
    assert_eq!(cumulative_balance(&ledger.transactions, None), 600.0);

    let rollup = bucket_rollup(&ledger.transactions, &ledger.buckets);
    assert_eq!(rollup.len(), 1);
    assert_eq!(rollup.get("Vacation"), Some(100.0));
}

#[test]
fn settling_the_internet_bill_moves_it_to_paid() {
    let (mut ledger, ids) = march_ledger();
    assert!(TransactionService::toggle_settled(&mut ledger, &ids.internet).unwrap());

    let totals = monthly_totals(select_month(&ledger.transactions, 2024, 3));
    assert_eq!(totals.paid_expense, 350.0);
    assert_eq!(totals.pending_expense, 0.0);
    assert_eq!(totals.income, 1000.0);
    assert_eq!(totals.savings_out, 100.0);
    assert_eq!(totals.free_balance(), 550.0);
    assert_eq!(cumulative_balance(&ledger.transactions, None), 550.0);
}

#[test]
fn free_balance_ignores_pending_expenses() {
    let (mut ledger, _) = march_ledger();
    let before = monthly_totals(select_month(&ledger.transactions, 2024, 3));
    add(
        &mut ledger,
        TransactionKind::Expense,
        "Insurance",
        999.0,
        date(2024, 3, 20),
    );
    let after = monthly_totals(select_month(&ledger.transactions, 2024, 3));
    assert_eq!(after.pending_expense, before.pending_expense + 999.0);
    assert_eq!(after.free_balance(), before.free_balance());
    assert_eq!(
        after.free_balance(),
        after.income - after.paid_expense - after.savings_out
    );
}

#[test]
fn unmatched_month_yields_zero_totals() {
    let (ledger, _) = march_ledger();
    let subset = select_month(&ledger.transactions, 2023, 3);
    assert!(subset.is_empty());
    let totals = monthly_totals(subset);
    assert!(totals.is_empty());
    assert_eq!(totals.free_balance(), 0.0);
}

#[test]
fn empty_ledger_balance_is_zero() {
    let ledger = Ledger::new();
    assert_eq!(cumulative_balance(&ledger.transactions, None), 0.0);
    assert_eq!(prior_balance(&ledger.transactions, date(2024, 3, 1)), 0.0);
}

#[test]
fn rollup_lists_every_declared_bucket() {
    let (ledger, _) = march_ledger();
    let buckets = vec![
        Bucket::new("Emergency").unwrap(),
        Bucket::new("Vacation").unwrap(),
        Bucket::new("House").unwrap(),
    ];
    let rollup = bucket_rollup(&ledger.transactions, &buckets);
    let names: Vec<&str> = rollup.entries.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Emergency", "Vacation", "House"]);
    assert_eq!(rollup.get("Emergency"), Some(0.0));
    assert_eq!(rollup.get("House"), Some(0.0));
    assert_eq!(rollup.grand_total(), 100.0);
}

#[test]
fn prior_balance_plus_month_matches_cumulative_when_settled() {
    let (mut ledger, ids) = march_ledger();
    add(
        &mut ledger,
        TransactionKind::Income,
        "Bonus",
        400.0,
        date(2024, 2, 20),
    );
    TransactionService::toggle_settled(&mut ledger, &ids.internet).unwrap();

    let start = date(2024, 3, 1);
    let prior = prior_balance(&ledger.transactions, start);
    assert_eq!(prior, 400.0);
    let month = monthly_totals(select_month(&ledger.transactions, 2024, 3));
    assert_eq!(
        prior + month.free_balance(),
        cumulative_balance(&ledger.transactions, Some(date(2024, 4, 1)))
    );
}

#[test]
fn statement_closes_at_starting_plus_free_balance() {
    let (mut ledger, ids) = march_ledger();
    TransactionService::toggle_settled(&mut ledger, &ids.internet).unwrap();
    let subset = select_month(&ledger.transactions, 2024, 3);
    let totals = monthly_totals(subset.iter().copied());
    let lines = running_statement(subset, 250.0);
    let last = lines.last().expect("statement lines");
    assert_eq!(last.running_balance, 250.0 + totals.free_balance());
}

#[test]
fn statement_is_date_ordered_and_stable() {
    let mut ledger = Ledger::new();
    add(&mut ledger, TransactionKind::Income, "Late", 10.0, date(2024, 3, 20));
    add(&mut ledger, TransactionKind::Income, "First", 5.0, date(2024, 3, 2));
    add(&mut ledger, TransactionKind::Income, "Second", 7.0, date(2024, 3, 2));
    let lines = running_statement(select_month(&ledger.transactions, 2024, 3), 0.0);
    let order: Vec<&str> = lines.iter().map(|l| l.description.as_str()).collect();
    assert_eq!(order, vec!["First", "Second", "Late"]);
    let balances: Vec<f64> = lines.iter().map(|l| l.running_balance).collect();
    assert_eq!(balances, vec![5.0, 12.0, 22.0]);
}

#[test]
fn savings_transfer_reduces_balance_even_when_unsettled() {
    let mut ledger = Ledger::new();
    let id = add(
        &mut ledger,
        TransactionKind::SavingsTransfer,
        "Emergency",
        40.0,
        date(2024, 3, 3),
    );
    ledger.transaction_mut(&id).unwrap().settled = false;
    assert_eq!(cumulative_balance(&ledger.transactions, None), -40.0);
}
