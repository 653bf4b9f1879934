//! Domain models for cashbook entries and the payloads that create or edit them.

use std::{convert::TryFrom, fmt};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::common::Displayable;
use crate::domain::TransactionId;
use crate::errors::{LedgerError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
/// Classifies an entry. Fixed when the entry is created.
pub enum TransactionKind {
    Income,
    Expense,
    SavingsTransfer,
}

impl TransactionKind {
    /// Income and savings transfers are committed the moment they are recorded.
    pub fn settled_at_creation(self) -> bool {
        !matches!(self, TransactionKind::Expense)
    }

    /// Parses the persisted representation (`income`, `expense`, `savings_transfer`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            "savings_transfer" => Some(TransactionKind::SavingsTransfer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::SavingsTransfer => "savings_transfer",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
            TransactionKind::SavingsTransfer => "Savings",
        };
        f.write_str(label)
    }
}

/// A validated cashbook entry.
///
/// Deserializing goes through [`RawTransaction`], so a `Transaction` obtained from
/// JSON has already passed validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawTransaction")]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    /// Free-text label. For savings transfers this is the bucket name.
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub settled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds a new record from a submitted draft, assigning a fresh id.
    pub fn from_draft(draft: TransactionDraft) -> Result<Self> {
        Self::from_draft_with_id(TransactionId::generate(), draft)
    }

    /// Builds a record from a draft with an id chosen by the persistence layer.
    pub fn from_draft_with_id(id: TransactionId, draft: TransactionDraft) -> Result<Self> {
        let transaction = Self {
            id,
            kind: draft.kind,
            description: draft.description.trim().to_string(),
            amount: draft.amount,
            date: draft.date,
            settled: draft.kind.settled_at_creation(),
            note: normalize_note(draft.note),
            created_at: Utc::now(),
        };
        transaction.validate()?;
        Ok(transaction)
    }

    pub fn validate(&self) -> Result<()> {
        validate_description(&self.description)?;
        validate_amount(self.amount)
    }

    pub fn is_savings_transfer(&self) -> bool {
        self.kind == TransactionKind::SavingsTransfer
    }

    /// Flips the settled flag and returns the new value.
    pub fn toggle_settled(&mut self) -> bool {
        self.settled = !self.settled;
        self.settled
    }

    /// Applies an edit. The record is left untouched if the result would be invalid.
    pub fn apply_patch(&mut self, patch: TransactionPatch) -> Result<()> {
        let mut candidate = self.clone();
        if let Some(description) = patch.description {
            candidate.description = description.trim().to_string();
        }
        if let Some(amount) = patch.amount {
            candidate.amount = amount;
        }
        if let Some(date) = patch.date {
            candidate.date = date;
        }
        if let Some(note) = patch.note {
            candidate.note = normalize_note(Some(note));
        }
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "txn:{} [{} {} {}]",
            self.id, self.kind, self.date, self.description
        )
    }
}

/// Loosely typed record as delivered by the store, before validation.
///
/// Every field tolerates missing or mistyped values so that a bad record is
/// reported as a validation failure of that record alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Number, numeric text, or `null` when the client failed to parse it.
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub settled: Option<bool>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl RawTransaction {
    /// The record id, if the store supplied a usable one.
    pub fn id(&self) -> Option<TransactionId> {
        TransactionId::from_value(&self.id)
    }

    pub fn validate(self) -> Result<Transaction> {
        let id = self
            .id()
            .ok_or_else(|| LedgerError::validation("record has no usable id"))?;
        self.into_transaction(id.clone()).map_err(|err| match err {
            LedgerError::Validation(message) => {
                LedgerError::Validation(format!("transaction {}: {}", id, message))
            }
            other => other,
        })
    }

    fn into_transaction(self, id: TransactionId) -> Result<Transaction> {
        let kind_text = self.kind.unwrap_or_default();
        let kind = TransactionKind::parse(&kind_text)
            .ok_or_else(|| LedgerError::validation(format!("unknown kind `{}`", kind_text)))?;
        let amount = parse_raw_amount(&self.amount)?;
        let date = parse_date(self.date.as_deref().unwrap_or_default())?;
        let created_at = match self.created_at.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => DateTime::parse_from_rfc3339(text)
                .map(|stamp| stamp.with_timezone(&Utc))
                .map_err(|_| {
                    LedgerError::validation(format!("created_at `{}` is not RFC 3339", text))
                })?,
            _ => date
                .and_hms_opt(0, 0, 0)
                .map(|naive| naive.and_utc())
                .ok_or_else(|| LedgerError::validation("invalid creation timestamp"))?,
        };
        let transaction = Transaction {
            id,
            kind,
            description: self.description.unwrap_or_default().trim().to_string(),
            amount,
            date,
            settled: self.settled.unwrap_or_else(|| kind.settled_at_creation()),
            note: normalize_note(self.note),
            created_at,
        };
        transaction.validate()?;
        Ok(transaction)
    }
}

impl From<&Transaction> for RawTransaction {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: Value::String(transaction.id.to_string()),
            kind: Some(transaction.kind.as_str().to_string()),
            description: Some(transaction.description.clone()),
            amount: Value::from(transaction.amount),
            date: Some(transaction.date.format(DATE_FORMAT).to_string()),
            settled: Some(transaction.settled),
            note: transaction.note.clone(),
            created_at: Some(
                transaction
                    .created_at
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
        }
    }
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = LedgerError;

    fn try_from(raw: RawTransaction) -> Result<Self> {
        raw.validate()
    }
}

/// "Append transaction" payload: a full record minus its id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
}

impl TransactionDraft {
    pub fn new(
        kind: TransactionKind,
        description: impl Into<String>,
        amount: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            amount,
            date,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Full-edit payload. The settled flag changes only through the toggle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// An empty string clears the note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.note.is_none()
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation("date is missing"));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| LedgerError::validation(format!("date `{}` is not YYYY-MM-DD", trimmed)))
}

fn parse_raw_amount(value: &Value) -> Result<f64> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| LedgerError::validation(format!("amount {} is out of range", number))),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(LedgerError::validation("amount is missing"));
            }
            trimmed
                .replace(',', ".")
                .parse()
                .map_err(|_| LedgerError::validation(format!("amount `{}` is not a number", trimmed)))
        }
        Value::Null => Err(LedgerError::validation("amount is missing")),
        other => Err(LedgerError::validation(format!(
            "amount {} is not a number",
            other
        ))),
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(LedgerError::validation("amount must be a finite number"));
    }
    if amount < 0.0 {
        return Err(LedgerError::validation(format!(
            "amount {} must not be negative",
            amount
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(LedgerError::validation("description must not be empty"));
    }
    Ok(())
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
