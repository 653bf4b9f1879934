use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::{LedgerError, Result};

pub const ENV_PREFIX: &str = "CASHBOOK_";
const DEMO_API_KEY: &str = "demo-mode";
const DEMO_PROJECT_ID: &str = "demo-project";
const DEFAULT_APP_NAMESPACE: &str = "cashbook-default";

/// Connection settings for the managed backend (identity + document store).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendSettings {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_domain: Option<String>,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
}

impl BackendSettings {
    pub fn demo() -> Self {
        Self {
            api_key: DEMO_API_KEY.into(),
            auth_domain: None,
            project_id: DEMO_PROJECT_ID.into(),
            storage_bucket: None,
            messaging_sender_id: None,
            app_id: None,
        }
    }

    pub fn is_demo(&self) -> bool {
        self.api_key == DEMO_API_KEY
    }

    /// Reads `CASHBOOK_*` variables; `None` unless `CASHBOOK_API_KEY` is set.
    fn from_lookup<F>(lookup: &F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, name))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let api_key = var("API_KEY")?;
        Some(Self {
            api_key,
            auth_domain: var("AUTH_DOMAIN"),
            project_id: var("PROJECT_ID").unwrap_or_default(),
            storage_bucket: var("STORAGE_BUCKET"),
            messaging_sender_id: var("MESSAGING_SENDER_ID"),
            app_id: var("APP_ID"),
        })
    }
}

/// Stores startup settings and user-facing preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub allowed_emails: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendSettings>,
    #[serde(default = "Config::default_app_namespace")]
    pub app_namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Where exported reports are written. Defaults to the documents directory.
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allowed_emails: Vec::new(),
            backend: None,
            app_namespace: Self::default_app_namespace(),
            export_dir: None,
        }
    }
}

impl Config {
    pub fn default_app_namespace() -> String {
        DEFAULT_APP_NAMESPACE.into()
    }

    /// Resolves backend settings in order: environment, injected JSON, the
    /// value already in this config, then demo settings.
    pub fn resolve<F>(mut self, lookup: F, injected: Option<&str>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = if let Some(from_env) = BackendSettings::from_lookup(&lookup) {
            tracing::debug!("backend settings taken from environment");
            from_env
        } else if let Some(raw) = injected.filter(|raw| !raw.trim().is_empty()) {
            tracing::debug!("backend settings taken from injected configuration");
            serde_json::from_str(raw)
                .map_err(|err| LedgerError::Config(format!("injected backend settings: {}", err)))?
        } else if let Some(existing) = self.backend.take() {
            existing
        } else {
            tracing::warn!("no backend settings found; running in demo mode");
            BackendSettings::demo()
        };
        self.backend = Some(backend);

        if let Some(namespace) = lookup(&format!("{}APP_NAMESPACE", ENV_PREFIX))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
        {
            self.app_namespace = namespace;
        }
        Ok(self)
    }

    /// Resolves against the process environment.
    pub fn resolve_from_env(self, injected: Option<&str>) -> Result<Self> {
        self.resolve(|name| std::env::var(name).ok(), injected)
    }

    pub fn backend(&self) -> BackendSettings {
        self.backend.clone().unwrap_or_else(BackendSettings::demo)
    }

    pub fn resolve_export_dir(&self) -> PathBuf {
        if let Some(path) = &self.export_dir {
            return path.clone();
        }
        dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
