//! Application configuration management.
//!
//! Configuration is stored at `~/.config/wedplan/config.json`. Every field is
//! optional in the file; missing fields take their defaults.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use wedplan_core::FileStore;

/// Application name used for the config directory path
const APP_NAME: &str = "wedplan";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₪";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 250;
pub const DEFAULT_COUNTDOWN_INTERVAL_SECS: u64 = 1;
pub const DEFAULT_NOTICE_SECONDS: u64 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the planner document is stored. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
    pub currency_symbol: String,
    pub search_debounce_ms: u64,
    pub countdown_interval_secs: u64,
    pub notice_seconds: u64,
    /// Optional cap on the stored document size, in bytes.
    pub storage_quota_bytes: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            countdown_interval_secs: DEFAULT_COUNTDOWN_INTERVAL_SECS,
            notice_seconds: DEFAULT_NOTICE_SECONDS,
            storage_quota_bytes: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the stored document and the log file.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(FileStore::default_dir()?),
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn countdown_interval(&self) -> Duration {
        Duration::from_secs(self.countdown_interval_secs.max(1))
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_secs(self.notice_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"currency_symbol": "$", "notice_seconds": 10}"#).unwrap();
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.notice_duration(), Duration::from_secs(10));
        assert_eq!(config.search_debounce(), Duration::from_millis(250));
        assert_eq!(config.storage_quota_bytes, None);
    }

    #[test]
    fn test_countdown_interval_never_zero() {
        let config = Config {
            countdown_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.countdown_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_data_dir_override() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/wedplan-test")),
            ..Default::default()
        };
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/wedplan-test"));
    }
}
