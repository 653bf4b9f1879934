//! Identity handed over by the auth collaborator and the family allow-list.

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result, ServiceKind};

const GUEST_NAME: &str = "Guest";

/// Authenticated identity, used only for attribution and greeting text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
}

impl Identity {
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            email: Some(email.into()),
            anonymous: false,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            display_name: None,
            email: None,
            anonymous: true,
        }
    }

    /// First word of the display name, or `Guest`.
    pub fn first_name(&self) -> &str {
        self.display_name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
            .unwrap_or(GUEST_NAME)
    }
}

/// Admits only identities whose email is on the allow-list.
#[derive(Debug, Clone, Default)]
pub struct AuthGate {
    allowed: Vec<String>,
}

impl AuthGate {
    pub fn new<I, S>(allowed_emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: allowed_emails
                .into_iter()
                .map(|email| email.as_ref().trim().to_lowercase())
                .filter(|email| !email.is_empty())
                .collect(),
        }
    }

    pub fn is_allowed(&self, identity: &Identity) -> bool {
        if identity.anonymous {
            return true;
        }
        let email = identity
            .email
            .as_deref()
            .map(|email| email.trim().to_lowercase())
            .unwrap_or_default();
        !email.is_empty() && self.allowed.iter().any(|allowed| *allowed == email)
    }

    /// Returns the identity when admitted; otherwise an auth failure for the user.
    pub fn admit<'a>(&self, identity: &'a Identity) -> Result<&'a Identity> {
        if self.is_allowed(identity) {
            Ok(identity)
        } else {
            tracing::warn!(email = ?identity.email, "identity rejected by allow-list");
            Err(LedgerError::external(
                ServiceKind::Auth,
                "this account is not allowed to use the cashbook",
            ))
        }
    }
}

/// Greeting for the local hour of day (0-23).
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}
