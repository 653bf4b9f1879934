//! Business logic helpers for managing transactions.

use crate::core::services::ServiceResult;
use crate::domain::{Displayable, Transaction, TransactionDraft, TransactionId, TransactionPatch};
use crate::errors::LedgerError;
use crate::ledger::Ledger;

/// Provides validated CRUD helpers for ledger transactions.
pub struct TransactionService;

impl TransactionService {
    /// Validates a draft, appends it and returns the new identifier.
    pub fn add(ledger: &mut Ledger, draft: TransactionDraft) -> ServiceResult<TransactionId> {
        let transaction = Transaction::from_draft(draft)?;
        tracing::debug!(transaction = %transaction.display_label(), "adding transaction");
        Ok(ledger.add_transaction(transaction))
    }

    /// Applies a full edit to the transaction identified by `id`.
    pub fn update(
        ledger: &mut Ledger,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> ServiceResult<()> {
        let txn = ledger
            .transaction_mut(id)
            .ok_or_else(|| LedgerError::NotFound(id.clone()))?;
        txn.apply_patch(patch)?;
        ledger.touch();
        Ok(())
    }

    /// Flips the settled flag and returns its new value.
    pub fn toggle_settled(ledger: &mut Ledger, id: &TransactionId) -> ServiceResult<bool> {
        let txn = ledger
            .transaction_mut(id)
            .ok_or_else(|| LedgerError::NotFound(id.clone()))?;
        let settled = txn.toggle_settled();
        tracing::debug!(%id, settled, "toggled settled flag");
        ledger.touch();
        Ok(settled)
    }

    /// Removes the transaction identified by `id`, returning the removed instance.
    pub fn remove(ledger: &mut Ledger, id: &TransactionId) -> ServiceResult<Transaction> {
        ledger
            .remove_transaction(id)
            .ok_or_else(|| LedgerError::NotFound(id.clone()))
    }

    /// Returns a snapshot of the ledger's transactions.
    pub fn list(ledger: &Ledger) -> Vec<&Transaction> {
        ledger.transactions.iter().collect()
    }
}
