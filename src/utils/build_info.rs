//! Build stamp and on-disk layout reported by `version`.

use absa_core::{backup::BACKUP_FILE_PREFIX, storage_key, HISTORY_LIMIT};
use absa_domain::seed::SEED_YEAR;

/// Crate version from `Cargo.toml`.
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// What `build.rs` stamped into the binary.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    /// Short commit hash, suffixed with `-dirty` for uncommitted trees.
    pub revision: &'static str,
    pub built_at: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
}

impl BuildMetadata {
    /// `Absa Books 0.1.0 (abc1234)`
    pub fn banner(&self) -> String {
        format!("Absa Books {} ({})", self.version, self.revision)
    }
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: CLI_VERSION,
        revision: option_env!("ABSA_BOOKS_BUILD_REVISION").unwrap_or("unknown"),
        built_at: option_env!("ABSA_BOOKS_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("ABSA_BOOKS_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("ABSA_BOOKS_BUILD_PROFILE").unwrap_or("unknown"),
    }
}

/// How the books for one year are laid out in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    pub data_year: i32,
    pub storage_key: String,
    pub backup_pattern: String,
    pub undo_limit: usize,
    /// Year the built-in dataset starts from when nothing is saved.
    pub seed_year: i32,
}

impl DataLayout {
    pub fn for_year(data_year: i32) -> Self {
        Self {
            data_year,
            storage_key: storage_key(data_year),
            backup_pattern: format!("{BACKUP_FILE_PREFIX}<YYYY-MM-DD>.json"),
            undo_limit: HISTORY_LIMIT,
            seed_year: SEED_YEAR,
        }
    }
}
