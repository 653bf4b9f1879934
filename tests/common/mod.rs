#![allow(dead_code)]

use cashbook_core::{
    core::services::{BucketService, TransactionService},
    domain::{MonthSelector, TransactionDraft, TransactionId, TransactionKind},
    ledger::Ledger,
};
use chrono::NaiveDate;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn march() -> MonthSelector {
    MonthSelector::new(2024, 3).expect("valid month")
}

/// Ids of the records in [`march_ledger`].
pub struct MarchIds {
    pub salary: TransactionId,
    pub rent: TransactionId,
    pub internet: TransactionId,
    pub vacation: TransactionId,
}

/// Income 1000, paid rent 300, pending internet 50, 100 into "Vacation".
pub fn march_ledger() -> (Ledger, MarchIds) {
    let mut ledger = Ledger::new();
    BucketService::add(&mut ledger, "Vacation").expect("bucket");
    let salary = add(&mut ledger, TransactionKind::Income, "Salary", 1000.0, date(2024, 3, 1));
    let rent = add(&mut ledger, TransactionKind::Expense, "Rent", 300.0, date(2024, 3, 5));
    TransactionService::toggle_settled(&mut ledger, &rent).expect("settle rent");
    let internet = add(&mut ledger, TransactionKind::Expense, "Internet", 50.0, date(2024, 3, 10));
    let vacation = add(
        &mut ledger,
        TransactionKind::SavingsTransfer,
        "Vacation",
        100.0,
        date(2024, 3, 15),
    );
    (
        ledger,
        MarchIds {
            salary,
            rent,
            internet,
            vacation,
        },
    )
}

pub fn add(
    ledger: &mut Ledger,
    kind: TransactionKind,
    description: &str,
    amount: f64,
    on: NaiveDate,
) -> TransactionId {
    TransactionService::add(ledger, TransactionDraft::new(kind, description, amount, on))
        .expect("valid draft")
}
