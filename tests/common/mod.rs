#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use absa_books::FinanceManager;
use absa_core::{FixedClock, LoadOutcome};
use absa_storage_json::{JsonFileStore, StoragePaths};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub const TEST_YEAR: i32 = 2026;

/// A fresh base directory that outlives the test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn storage_at(base: &Path) -> JsonFileStore {
    JsonFileStore::new(StoragePaths {
        data_root: base.join("data"),
        backup_root: base.join("backups"),
    })
    .expect("create json file store")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Opens the books under `base` with a clock frozen on `today`.
pub fn open_manager(base: &Path, today: NaiveDate) -> (FinanceManager, LoadOutcome) {
    FinanceManager::open(
        Box::new(storage_at(base)),
        TEST_YEAR,
        Arc::new(FixedClock::on(today)),
    )
}
