#![doc(test(attr(deny(warnings))))]

//! Cashbook Core keeps a household cashbook: income, expenses that are paid or
//! pending, and transfers into named savings buckets. It derives monthly
//! totals, carried-forward balances, bucket rollups and running statements
//! from a snapshot of transactions, and turns them into exportable reports.

pub mod auth;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod report;
pub mod storage;
pub mod utils;
pub mod view;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cashbook Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
