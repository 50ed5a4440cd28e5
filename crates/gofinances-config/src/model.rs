use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "GOFINANCES_HOME";
const DEFAULT_DIR_NAME: &str = "gofinances";

/// Stores locale, currency and storage preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    /// Prefix for every storage key, e.g. `@gofinances:user`.
    #[serde(default = "Config::default_storage_namespace")]
    pub storage_namespace: String,
    /// Offset applied when rendering dates and bucketing records into months.
    #[serde(default)]
    pub utc_offset_minutes: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root for stored data. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            storage_namespace: Self::default_storage_namespace(),
            utc_offset_minutes: 0,
            data_dir: None,
            log_filter: None,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "pt-BR".into()
    }

    pub fn default_currency() -> String {
        "BRL".into()
    }

    pub fn default_storage_namespace() -> String {
        "@gofinances".into()
    }

    /// Resolves the data directory: explicit setting, then `GOFINANCES_HOME`,
    /// then the platform data directory.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    /// Directory holding the key-value documents.
    pub fn store_dir(&self) -> PathBuf {
        self.resolve_data_dir().join("store")
    }
}
