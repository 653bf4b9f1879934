use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use crate::core::services::{BucketService, TransactionService};
use crate::domain::{RawTransaction, Transaction, TransactionDraft, TransactionId};
use crate::errors::{LedgerError, Result, ServiceKind};
use crate::ledger::{Ledger, RejectedRecord, SnapshotLoad};
use crate::utils::persistence::write_atomic;

use super::{SnapshotStore, TransactionUpdate};

const SNAPSHOT_EXTENSION: &str = "json";

/// On-disk shape of a snapshot. Records stay loosely typed until loaded.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSnapshot {
    #[serde(default)]
    transactions: Vec<Value>,
    #[serde(default)]
    buckets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl StoredSnapshot {
    /// Valid records first, then rejected ones exactly as they were read.
    fn from_load(load: &SnapshotLoad) -> Result<Self> {
        let mut transactions = load
            .ledger
            .transactions
            .iter()
            .map(|txn| serde_json::to_value(RawTransaction::from(txn)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        transactions.extend(load.rejected.iter().map(|rejected| rejected.record.clone()));
        Ok(Self {
            transactions,
            buckets: load
                .ledger
                .bucket_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            updated_at: Some(load.ledger.updated_at),
        })
    }
}

/// File-backed snapshot store: one pretty-printed JSON document per namespace.
#[derive(Debug)]
pub struct JsonSnapshotStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonSnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Stores the snapshot for `namespace` under `root`, e.g. `root/cashbook-default.json`.
    pub fn in_dir(root: &Path, namespace: &str) -> Result<Self> {
        fs::create_dir_all(root)?;
        let file_name = format!("{}.{}", canonical_name(namespace), SNAPSHOT_EXTENSION);
        Ok(Self::new(root.join(file_name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| LedgerError::external(ServiceKind::Sync, "snapshot lock poisoned"))
    }

    fn read(&self) -> Result<SnapshotLoad> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no snapshot on disk; starting empty");
            return Ok(SnapshotLoad {
                ledger: Ledger::new(),
                rejected: Vec::new(),
            });
        }
        let data = fs::read_to_string(&self.path)?;
        let stored: StoredSnapshot = serde_json::from_str(&data)?;
        let mut load = Ledger::from_records(stored.transactions, stored.buckets);
        if let Some(updated_at) = stored.updated_at {
            load.ledger.updated_at = updated_at;
        }
        if !load.rejected.is_empty() {
            tracing::warn!(
                path = %self.path.display(),
                rejected = load.rejected.len(),
                "snapshot loaded with rejected records"
            );
        }
        Ok(load)
    }

    fn write(&self, load: &SnapshotLoad) -> Result<()> {
        let json = serde_json::to_string_pretty(&StoredSnapshot::from_load(load)?)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        if let Err(err) = write_atomic(&self.path, json.as_bytes()) {
            tracing::error!(error = %err, path = %self.path.display(), "snapshot write failed");
            return Err(err.into());
        }
        Ok(())
    }

    /// Load, mutate and write back under the store lock.
    fn modify<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut SnapshotLoad) -> Result<T>,
    {
        let _guard = self.lock()?;
        let mut load = self.read()?;
        let outcome = change(&mut load)?;
        self.write(&load)?;
        Ok(outcome)
    }
}

fn rejected_position(load: &SnapshotLoad, id: &TransactionId) -> Option<usize> {
    load.rejected
        .iter()
        .position(|rejected| rejected.id.as_ref() == Some(id))
}

impl SnapshotStore for JsonSnapshotStore {
    fn load_snapshot(&self) -> Result<Ledger> {
        let _guard = self.lock()?;
        self.read().map(|load| load.ledger)
    }

    fn append_transaction(&self, draft: TransactionDraft) -> Result<Transaction> {
        self.modify(|load| {
            let id = TransactionService::add(&mut load.ledger, draft)?;
            load.ledger
                .transaction(&id)
                .cloned()
                .ok_or(LedgerError::NotFound(id))
        })
    }

    fn update_transaction(&self, id: &TransactionId, update: TransactionUpdate) -> Result<()> {
        self.modify(|load| {
            if load.ledger.transaction(id).is_none() {
                if let Some(index) = rejected_position(load, id) {
                    return Err(LedgerError::validation(load.rejected[index].reason.clone()));
                }
            }
            match update {
                TransactionUpdate::Edit(patch) => {
                    TransactionService::update(&mut load.ledger, id, patch)
                }
                TransactionUpdate::Settled(settled) => {
                    let txn = load
                        .ledger
                        .transaction_mut(id)
                        .ok_or_else(|| LedgerError::NotFound(id.clone()))?;
                    txn.settled = settled;
                    load.ledger.touch();
                    Ok(())
                }
            }
        })
    }

    fn delete_transaction(&self, id: &TransactionId) -> Result<()> {
        self.modify(|load| {
            if load.ledger.transaction(id).is_some() {
                return TransactionService::remove(&mut load.ledger, id).map(|_| ());
            }
            let index =
                rejected_position(load, id).ok_or_else(|| LedgerError::NotFound(id.clone()))?;
            let removed = load.rejected.remove(index);
            tracing::info!(%id, reason = %removed.reason, "deleted rejected record");
            load.ledger.touch();
            Ok(())
        })
    }

    fn append_bucket(&self, name: &str) -> Result<bool> {
        self.modify(|load| BucketService::add(&mut load.ledger, name))
    }

    fn rejected_records(&self) -> Result<Vec<RejectedRecord>> {
        let _guard = self.lock()?;
        self.read().map(|load| load.rejected)
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches(|c| c == '_' || c == '-').is_empty() {
        "cashbook".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TransactionKind, TransactionPatch};
    use crate::utils::persistence::tmp_path;
    use chrono::NaiveDate;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonSnapshotStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonSnapshotStore::in_dir(temp.path(), "Family Book").expect("store");
        (store, temp)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn write_records(store: &JsonSnapshotStore, records: Value) {
        let json = json!({ "transactions": records, "buckets": ["Vacation"] });
        fs::write(store.path(), json.to_string()).unwrap();
    }

    fn stored_ids(store: &JsonSnapshotStore) -> Vec<String> {
        let data = fs::read_to_string(store.path()).unwrap();
        let stored: StoredSnapshot = serde_json::from_str(&data).unwrap();
        stored
            .transactions
            .iter()
            .filter_map(|record| record["id"].as_str().map(str::to_string))
            .collect()
    }

    #[test]
    fn missing_file_loads_empty_snapshot() {
        let (store, _guard) = store_with_temp_dir();
        let ledger = store.load_snapshot().unwrap();
        assert_eq!(ledger.transaction_count(), 0);
        assert!(store.path().ends_with("family_book.json"));
    }

    #[test]
    fn append_assigns_id_and_persists() {
        let (store, _guard) = store_with_temp_dir();
        let txn = store
            .append_transaction(TransactionDraft::new(
                TransactionKind::Expense,
                "Rent",
                300.0,
                day(5),
            ))
            .unwrap();
        assert!(!txn.settled);

        let reloaded = store.load_snapshot().unwrap();
        assert_eq!(reloaded.transaction(&txn.id), Some(&txn));
        assert!(!tmp_path(store.path()).exists());
    }

    #[test]
    fn settled_and_edit_updates_round_trip() {
        let (store, _guard) = store_with_temp_dir();
        let txn = store
            .append_transaction(TransactionDraft::new(
                TransactionKind::Expense,
                "Power",
                80.0,
                day(8),
            ))
            .unwrap();
        store
            .update_transaction(&txn.id, TransactionUpdate::Settled(true))
            .unwrap();
        store
            .update_transaction(
                &txn.id,
                TransactionUpdate::Edit(TransactionPatch {
                    amount: Some(95.5),
                    ..TransactionPatch::default()
                }),
            )
            .unwrap();

        let reloaded = store.load_snapshot().unwrap();
        let stored = reloaded.transaction(&txn.id).unwrap();
        assert!(stored.settled);
        assert_eq!(stored.amount, 95.5);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let (store, _guard) = store_with_temp_dir();
        let missing = TransactionId::generate();
        assert!(matches!(
            store.delete_transaction(&missing),
            Err(LedgerError::NotFound(ref id)) if *id == missing
        ));
        assert!(matches!(
            store.update_transaction(&missing, TransactionUpdate::Settled(true)),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn buckets_are_deduplicated() {
        let (store, _guard) = store_with_temp_dir();
        assert!(store.append_bucket("Emergency").unwrap());
        assert!(!store.append_bucket("Emergency").unwrap());
        assert_eq!(store.load_snapshot().unwrap().bucket_names(), vec!["Emergency"]);
    }

    #[test]
    fn malformed_record_does_not_block_the_store() {
        let (store, _guard) = store_with_temp_dir();
        write_records(
            &store,
            json!([
                {"id": "good1", "kind": "income", "description": "Salary", "amount": 100.0, "date": "2024-03-01"},
                {"id": "bad1", "kind": "expense", "description": "Bad", "amount": null, "date": "2024-03-02"}
            ]),
        );

        let ledger = store.load_snapshot().unwrap();
        assert_eq!(ledger.transaction_count(), 1);
        assert_eq!(ledger.bucket_names(), vec!["Vacation"]);
        let rejected = store.rejected_records().unwrap();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].reason, "transaction bad1: amount is missing");

        let added = store
            .append_transaction(TransactionDraft::new(
                TransactionKind::Expense,
                "Rent",
                40.0,
                day(3),
            ))
            .unwrap();
        assert_eq!(stored_ids(&store), vec!["good1", added.id.as_str(), "bad1"]);

        let bad = TransactionId::new("bad1").unwrap();
        assert!(matches!(
            store.update_transaction(&bad, TransactionUpdate::Settled(true)),
            Err(LedgerError::Validation(ref message)) if message.contains("amount is missing")
        ));
        store.delete_transaction(&bad).unwrap();
        assert!(store.rejected_records().unwrap().is_empty());
        assert_eq!(stored_ids(&store), vec!["good1", added.id.as_str()]);
        assert!(matches!(
            store.delete_transaction(&bad),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn document_store_ids_survive_a_round_trip() {
        let (store, _guard) = store_with_temp_dir();
        write_records(
            &store,
            json!([
                {"id": "AbC123firestoreId", "kind": "expense", "description": "Gas", "amount": "45,50", "date": "2024-03-04", "settled": true}
            ]),
        );
        let id = TransactionId::new("AbC123firestoreId").unwrap();
        let ledger = store.load_snapshot().unwrap();
        assert_eq!(ledger.transaction(&id).map(|txn| txn.amount), Some(45.5));

        store
            .update_transaction(&id, TransactionUpdate::Settled(false))
            .unwrap();
        assert_eq!(stored_ids(&store), vec!["AbC123firestoreId"]);
        store.delete_transaction(&id).unwrap();
        assert_eq!(store.load_snapshot().unwrap().transaction_count(), 0);
    }

    #[test]
    fn corrupt_file_is_a_sync_failure() {
        let (store, _guard) = store_with_temp_dir();
        fs::write(store.path(), "not json").unwrap();
        let err = store.load_snapshot().expect_err("corrupt snapshot");
        assert!(matches!(
            err,
            LedgerError::ExternalService {
                service: ServiceKind::Sync,
                ..
            }
        ));
    }

    #[test]
    fn canonical_names_are_filesystem_safe() {
        assert_eq!(canonical_name("Cashbook-Default"), "cashbook-default");
        assert_eq!(canonical_name("  "), "cashbook");
    }
}
