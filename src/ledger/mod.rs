//! Ledger snapshot and the aggregation engine that derives every figure from it.

pub mod aggregate;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod summary;

pub use aggregate::{
    balance_effect, bucket_rollup, cumulative_balance, monthly_totals, prior_balance,
    running_statement, select_month,
};
pub use ledger::{Ledger, RejectedRecord, SnapshotLoad};
pub use summary::{BucketRollup, BucketTotal, MonthlyTotals, StatementLine};
