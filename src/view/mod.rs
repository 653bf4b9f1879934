//! Serializable view state for the presentation layer.
//!
//! Nothing in the aggregator reads this; the rendering layer passes it around
//! explicitly and derives its figures through the services.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::services::TransactionFilter;
use crate::domain::{
    MonthSelector, TransactionDraft, TransactionId, TransactionKind, TransactionPatch,
};
use crate::errors::{LedgerError, Result};

/// Entry form contents as typed by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryForm {
    pub kind: TransactionKind,
    pub description: String,
    /// Raw amount text; both `12,50` and `12.50` are accepted.
    pub amount: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
}

impl EntryForm {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            kind: TransactionKind::Expense,
            description: String::new(),
            amount: String::new(),
            date,
            note: String::new(),
        }
    }

    pub fn to_draft(&self) -> Result<TransactionDraft> {
        let amount = parse_amount(&self.amount)?;
        let mut draft = TransactionDraft::new(self.kind, self.description.trim(), amount, self.date);
        if !self.note.trim().is_empty() {
            draft.note = Some(self.note.trim().to_string());
        }
        Ok(draft)
    }

    /// Full-edit payload for the record being edited.
    pub fn to_patch(&self) -> Result<TransactionPatch> {
        Ok(TransactionPatch {
            description: Some(self.description.trim().to_string()),
            amount: Some(parse_amount(&self.amount)?),
            date: Some(self.date),
            note: Some(self.note.trim().to_string()),
        })
    }

    /// Clears description and amount after a successful submission.
    pub fn reset(&mut self) {
        self.description.clear();
        self.amount.clear();
        self.note.clear();
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Which overlay, if any, is open.
pub enum Modal {
    #[default]
    None,
    EditTransaction,
    NewBucket,
    ConfirmDelete,
    ConfirmSignOut,
}

/// Everything the UI needs to redraw itself, independent of the ledger data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewState {
    pub month: MonthSelector,
    #[serde(default)]
    pub filter: TransactionFilter,
    pub form: EntryForm,
    #[serde(default)]
    pub editing: Option<TransactionId>,
    #[serde(default)]
    pub modal: Modal,
}

impl ViewState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            month: MonthSelector::containing(today),
            filter: TransactionFilter::All,
            form: EntryForm::new(today),
            editing: None,
            modal: Modal::None,
        }
    }

    pub fn navigate(&mut self, months: i32) {
        self.month = self.month.shift(months);
    }

    pub fn begin_edit(&mut self, id: TransactionId) {
        self.editing = Some(id);
        self.modal = Modal::EditTransaction;
    }

    pub fn close_modal(&mut self) {
        self.editing = None;
        self.modal = Modal::None;
    }
}

/// Parses a user-typed amount, accepting a comma as decimal separator.
pub fn parse_amount(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation("amount is missing"));
    }
    let normalized = trimmed.replace(',', ".");
    let amount: f64 = normalized
        .parse()
        .map_err(|_| LedgerError::validation(format!("amount `{}` is not a number", trimmed)))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(LedgerError::validation(format!(
            "amount `{}` must be a non-negative number",
            trimmed
        )));
    }
    Ok(amount)
}
