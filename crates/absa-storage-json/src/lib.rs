use std::{
    cmp::Reverse,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use absa_core::{
    backup::{backup_file_name, export_document, parse_backup, BACKUP_FILE_EXTENSION, BACKUP_FILE_PREFIX},
    CoreError, KeyValueStore, MigrationReport,
};
use absa_domain::AppState;
use chrono::NaiveDate;
use tracing::{debug, info};

const DATA_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub data_root: PathBuf,
    pub backup_root: PathBuf,
}

/// Filesystem-backed JSON persistence: one file per key plus dated backups.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    paths: StoragePaths,
    retention: usize,
}

/// A backup file found in the backup directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub file_name: String,
    pub date: Option<NaiveDate>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

impl JsonFileStore {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.data_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            paths,
            retention: retention.max(1),
        })
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.paths
            .data_root
            .join(format!("{}.{}", canonical_key(key), DATA_EXTENSION))
    }

    /// Writes `state` to `finance_data_backup_<date>.json` and prunes old backups.
    ///
    /// A second export on the same day replaces the first.
    pub fn export_backup(&self, state: &AppState, date: NaiveDate) -> Result<BackupInfo, CoreError> {
        let file_name = backup_file_name(date);
        let path = self.paths.backup_root.join(&file_name);
        let document = export_document(state)?;
        write_atomic(&path, document.as_bytes())?;
        info!(path = %path.display(), "backup exported");
        self.prune_backups()?;
        Ok(BackupInfo {
            file_name,
            date: Some(date),
            size_bytes: document.len() as u64,
            path,
        })
    }

    /// Backups in the backup directory, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        let dir = &self.paths.backup_root;
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_FILE_EXTENSION)
            {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if !file_name.starts_with(BACKUP_FILE_PREFIX) {
                continue;
            }
            let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
            entries.push(BackupInfo {
                file_name: file_name.to_string(),
                date: parse_backup_date(file_name),
                size_bytes,
                path: path.clone(),
            });
        }
        entries.sort_by(|a, b| {
            Reverse(a.date)
                .cmp(&Reverse(b.date))
                .then_with(|| b.file_name.cmp(&a.file_name))
        });
        Ok(entries)
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            debug!(path = %entry.path.display(), "pruning backup");
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError> {
        match fs::read(self.entry_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), CoreError> {
        let path = self.entry_path(key);
        let tmp = tmp_path(&path);
        write_file(&tmp, value)?;
        fs::rename(&tmp, &path).map_err(|err| {
            CoreError::Storage(format!("failed to replace {}: {err}", path.display()))
        })
    }
}

/// Reads and validates a backup document from an arbitrary path.
pub fn read_backup(path: &Path) -> Result<(AppState, MigrationReport), CoreError> {
    let bytes = fs::read(path)?;
    parse_backup(&bytes)
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "state".into()
    } else {
        sanitized
    }
}

fn parse_backup_date(file_name: &str) -> Option<NaiveDate> {
    let stem = file_name
        .strip_prefix(BACKUP_FILE_PREFIX)?
        .strip_suffix(&format!(".{BACKUP_FILE_EXTENSION}"))?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &[u8]) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()?;
    Ok(())
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<(), CoreError> {
    let tmp = tmp_path(path);
    write_file(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
