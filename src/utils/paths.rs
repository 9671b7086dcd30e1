use std::{
    env,
    path::{Path, PathBuf},
};

use absa_config::Config;

/// Overrides the base directory that holds config, data, and backups.
pub const HOME_ENV_VAR: &str = "ABSA_BOOKS_HOME";

pub fn resolve_base_dir() -> PathBuf {
    base_dir_from(env::var_os(HOME_ENV_VAR).map(PathBuf::from))
}

fn base_dir_from(override_dir: Option<PathBuf>) -> PathBuf {
    override_dir
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(Config::default_base_dir)
}

/// Data and backup directories for `config` under `base`.
pub fn storage_roots(config: &Config, base: &Path) -> (PathBuf, PathBuf) {
    (config.resolve_data_root(base), config.resolve_backup_root(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_wins() {
        let base = base_dir_from(Some(PathBuf::from("/tmp/books")));
        assert_eq!(base, PathBuf::from("/tmp/books"));
    }

    #[test]
    fn empty_override_is_ignored() {
        assert_eq!(base_dir_from(Some(PathBuf::new())), Config::default_base_dir());
    }
}
