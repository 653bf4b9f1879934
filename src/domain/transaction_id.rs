use std::{convert::TryFrom, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{LedgerError, Result};

/// Opaque record identifier chosen by whichever store persisted the record.
///
/// Document stores hand out short alphanumeric keys; the JSON backend uses
/// UUIDs. Both are accepted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::validation("transaction id must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Fresh random id for records created locally.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Reads an id from a loosely typed record field; numbers are kept as text.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Self::new(text.as_str()).ok(),
            Value::Number(number) => Self::new(number.to_string()).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TransactionId {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<String> for TransactionId {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> Self {
        id.0
    }
}
