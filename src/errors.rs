use std::fmt;

use thiserror::Error;

use crate::domain::TransactionId;

/// Collaborators the core talks to; used to attribute external failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Sync,
    Auth,
    Export,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServiceKind::Sync => "sync",
            ServiceKind::Auth => "auth",
            ServiceKind::Export => "export",
        };
        f.write_str(label)
    }
}

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid record: {0}")]
    Validation(String),
    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),
    #[error("{service} service failed: {message}")]
    ExternalService {
        service: ServiceKind,
        message: String,
    },
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub fn external(service: ServiceKind, message: impl Into<String>) -> Self {
        LedgerError::ExternalService {
            service,
            message: message.into(),
        }
    }

    /// True for failures the user should see as a non-fatal notice.
    pub fn is_external(&self) -> bool {
        matches!(self, LedgerError::ExternalService { .. })
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::external(ServiceKind::Sync, err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::external(ServiceKind::Sync, err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
