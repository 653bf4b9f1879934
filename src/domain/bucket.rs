use std::{convert::TryFrom, fmt};

use serde::{Deserialize, Serialize};

use crate::domain::common::NamedEntity;
use crate::errors::{LedgerError, Result};

/// A named savings target. Savings transfers are grouped by bucket name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Bucket(String);

impl Bucket {
    /// Creates a bucket from a user-supplied name, trimming surrounding whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::validation("bucket name must not be empty"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Bucket {
    type Error = LedgerError;

    fn try_from(name: String) -> Result<Self> {
        Self::new(name)
    }
}

impl From<Bucket> for String {
    fn from(bucket: Bucket) -> Self {
        bucket.0
    }
}

impl NamedEntity for Bucket {
    fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed() {
        let bucket = Bucket::new("  Vacation ").unwrap();
        assert_eq!(bucket.name(), "Vacation");
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(matches!(Bucket::new("   "), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn serializes_as_plain_string() {
        let bucket = Bucket::new("Emergency").unwrap();
        assert_eq!(serde_json::to_string(&bucket).unwrap(), "\"Emergency\"");
        let blank: std::result::Result<Bucket, _> = serde_json::from_str("\"  \"");
        assert!(blank.is_err());
    }
}
