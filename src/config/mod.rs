use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::errors::{LedgerError, LedgerResult};
use crate::utils::{
    paths::{self, ensure_dir, write_atomic},
    DEFAULT_LOG_FILTER,
};

/// User preferences for where and how the ledger runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Directory for the persisted records. Defaults to `<app dir>/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Seed the default category set when no categories are stored yet.
    #[serde(default = "default_true")]
    pub seed_default_categories: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_filter: default_log_filter(),
            seed_default_categories: true,
        }
    }
}

impl Config {
    /// Data directory, falling back to the one under `base`.
    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| paths::data_dir_in(base))
    }
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.into()
}

fn default_true() -> bool {
    true
}

/// Loads and saves [`Config`] as pretty JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> LedgerResult<Self> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> LedgerResult<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: paths::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> LedgerResult<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| {
                LedgerError::Config(format!("{}: {}", self.path.display(), err))
            })
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> LedgerResult<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
