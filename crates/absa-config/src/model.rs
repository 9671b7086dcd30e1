use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Stores user-configurable preferences for the books and the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    /// Year whose records are opened; selects the storage key.
    #[serde(default = "Config::default_data_year")]
    pub data_year: i32,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the state file. Defaults to `<base>/data`.
    pub data_root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for exported backups. Defaults to `<base>/backups`.
    pub backup_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            data_year: Self::default_data_year(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            backup_retention: Self::default_backup_retention(),
            data_root: None,
            backup_root: None,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "es-CL".into()
    }

    pub fn default_currency() -> String {
        "CLP".into()
    }

    pub fn default_data_year() -> i32 {
        2026
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_backup_retention() -> usize {
        10
    }

    /// Base directory used when no override is given: `<data dir>/absa_books`.
    pub fn default_base_dir() -> PathBuf {
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("absa_books")
    }

    pub fn resolve_data_root(&self, base: &Path) -> PathBuf {
        self.data_root
            .clone()
            .unwrap_or_else(|| base.join("data"))
    }

    pub fn resolve_backup_root(&self, base: &Path) -> PathBuf {
        self.backup_root
            .clone()
            .unwrap_or_else(|| base.join("backups"))
    }
}
