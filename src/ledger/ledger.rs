use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Bucket, NamedEntity, RawTransaction, Transaction, TransactionId};
use crate::errors::LedgerError;

/// Snapshot of one user's cashbook: every transaction plus the bucket list.
///
/// The sync collaborator replaces the whole snapshot on every change, so
/// aggregation always runs against a complete, consistent copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub buckets: Vec<Bucket>,
    pub updated_at: DateTime<Utc>,
}

/// A stored record that failed validation and was left out of the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// Present when the record carried a usable id.
    pub id: Option<TransactionId>,
    /// Validation message, without the error prefix.
    pub reason: String,
    /// The record exactly as the store delivered it.
    pub record: Value,
}

/// Outcome of validating a delivered snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotLoad {
    pub ledger: Ledger,
    pub rejected: Vec<RejectedRecord>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            buckets: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Validates typed raw records; see [`Ledger::from_records`].
    pub fn from_raw(raw: Vec<RawTransaction>, bucket_names: Vec<String>) -> SnapshotLoad {
        let records = raw
            .iter()
            .map(|record| serde_json::to_value(record).unwrap_or_default())
            .collect();
        Self::from_records(records, bucket_names)
    }

    /// Validates a snapshot record by record. Malformed records and blank bucket
    /// names are logged and left out; the rest of the snapshot is kept.
    pub fn from_records(records: Vec<Value>, bucket_names: Vec<String>) -> SnapshotLoad {
        let mut ledger = Self::new();
        let mut rejected = Vec::new();
        for record in records {
            let id = record.get("id").and_then(TransactionId::from_value);
            let outcome = serde_json::from_value::<RawTransaction>(record.clone())
                .map_err(|err| LedgerError::validation(format!("unreadable record: {}", err)))
                .and_then(RawTransaction::validate);
            match outcome {
                Ok(transaction) => ledger.transactions.push(transaction),
                Err(err) => {
                    tracing::warn!(error = %err, "malformed record left out of snapshot");
                    let reason = match err {
                        LedgerError::Validation(message) => message,
                        other => other.to_string(),
                    };
                    rejected.push(RejectedRecord { id, reason, record });
                }
            }
        }
        for name in bucket_names {
            match Bucket::new(name) {
                Ok(bucket) => {
                    if !ledger.add_bucket(bucket.clone()) {
                        tracing::warn!(bucket = %bucket, "duplicate bucket name in snapshot ignored");
                    }
                }
                Err(err) => tracing::warn!(error = %err, "blank bucket name in snapshot ignored"),
            }
        }
        SnapshotLoad { ledger, rejected }
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> TransactionId {
        let id = transaction.id.clone();
        self.transactions.push(transaction);
        self.touch();
        id
    }

    pub fn transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == *id)
    }

    pub fn transaction_mut(&mut self, id: &TransactionId) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|txn| txn.id == *id)
    }

    pub fn remove_transaction(&mut self, id: &TransactionId) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == *id)?;
        let removed = self.transactions.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Appends a bucket; returns false when the name is already present.
    pub fn add_bucket(&mut self, bucket: Bucket) -> bool {
        if self.has_bucket(bucket.name()) {
            return false;
        }
        self.buckets.push(bucket);
        self.touch();
        true
    }

    pub fn has_bucket(&self, name: &str) -> bool {
        self.buckets.iter().any(|bucket| bucket.name() == name)
    }

    pub fn bucket_names(&self) -> Vec<&str> {
        self.buckets.iter().map(|bucket| bucket.name()).collect()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
