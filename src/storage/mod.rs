pub mod json_backend;

use crate::domain::{Transaction, TransactionDraft, TransactionId, TransactionPatch};
use crate::errors::Result;
use crate::ledger::{Ledger, RejectedRecord};

/// Change applied to an existing record through the store.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionUpdate {
    Edit(TransactionPatch),
    Settled(bool),
}

/// Persistence seam for the cashbook snapshot.
///
/// Every mutation is followed by a fresh [`SnapshotStore::load_snapshot`]; the
/// aggregator never sees partial state. A stored record that fails validation
/// is left out of the loaded ledger but must not block the other operations.
pub trait SnapshotStore: Send + Sync {
    fn load_snapshot(&self) -> Result<Ledger>;

    /// Persists a new record. The store assigns the id.
    fn append_transaction(&self, draft: TransactionDraft) -> Result<Transaction>;

    fn update_transaction(&self, id: &TransactionId, update: TransactionUpdate) -> Result<()>;

    /// Removes a record, including one that was rejected on load.
    fn delete_transaction(&self, id: &TransactionId) -> Result<()>;

    /// Returns `false` when the bucket already existed.
    fn append_bucket(&self, name: &str) -> Result<bool>;

    /// Stored records left out of the last load because they failed validation.
    fn rejected_records(&self) -> Result<Vec<RejectedRecord>> {
        Ok(Vec::new())
    }
}

pub use json_backend::JsonSnapshotStore;
