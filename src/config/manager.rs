use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::Config;
use crate::errors::{LedgerError, Result};
use crate::utils::persistence::write_atomic;

const CONFIG_DIR_NAME: &str = "cashbook";
const CONFIG_FILE_NAME: &str = "config.json";

/// Handles persistence for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Uses the platform configuration directory, e.g. `~/.config/cashbook/config.json`.
    pub fn default_location() -> Result<Self> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| LedgerError::Config("no configuration directory available".into()))?;
        Self::with_base_dir(base.join(CONFIG_DIR_NAME))
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base).map_err(config_io)?;
        Ok(Self::new(base.join(CONFIG_FILE_NAME)))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads the stored config, or defaults when no file exists yet.
    pub fn load(&self) -> Result<Config> {
        if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path).map_err(config_io)?;
            serde_json::from_str(&data).map_err(|err| LedgerError::Config(err.to_string()))
        } else {
            tracing::debug!(path = %self.config_path.display(), "no config file; using defaults");
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(config_io)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| LedgerError::Config(err.to_string()))?;
        write_atomic(&self.config_path, json.as_bytes()).map_err(config_io)
    }
}

fn config_io(err: std::io::Error) -> LedgerError {
    LedgerError::Config(err.to_string())
}
