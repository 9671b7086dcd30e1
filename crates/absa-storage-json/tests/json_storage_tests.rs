use absa_core::{storage_key, CoreError, KeyValueStore, LoadSource, Store};
use absa_domain::{seed::initial_state, EntityId, NewStudent, Student};
use absa_storage_json::{read_backup, JsonFileStore, StoragePaths};
use chrono::NaiveDate;
use std::fs;
use tempfile::tempdir;

fn storage(root: &std::path::Path) -> JsonFileStore {
    JsonFileStore::new(StoragePaths {
        data_root: root.join("data"),
        backup_root: root.join("backups"),
    })
    .expect("create storage")
}

#[test]
fn missing_keys_read_as_none() {
    let dir = tempdir().expect("tempdir");
    let store = storage(dir.path());
    assert!(store.get("finance_data_2026").expect("get").is_none());
}

#[test]
fn put_replaces_the_file_atomically() {
    let dir = tempdir().expect("tempdir");
    let store = storage(dir.path());

    store.put("finance_data_2026", b"{\"a\":1}").expect("first put");
    store.put("finance_data_2026", b"{\"a\":2}").expect("second put");

    let bytes = store.get("finance_data_2026").expect("get").expect("present");
    assert_eq!(bytes, b"{\"a\":2}");
    let path = store.entry_path("finance_data_2026");
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn store_state_survives_a_reopen() {
    let dir = tempdir().expect("tempdir");
    let key = storage_key(2026);

    let (mut store, outcome) = Store::open(Box::new(storage(dir.path())), key.clone());
    assert_eq!(outcome.source, LoadSource::Seed);
    let mut next = store.snapshot();
    next.student_db_mut().push(Student::from_new(
        EntityId::new(1),
        NewStudent::new("Ana", 35000.0),
    ));
    store.commit(next.clone()).expect("commit");

    let (reopened, outcome) = Store::open(Box::new(storage(dir.path())), key);
    assert_eq!(outcome.source, LoadSource::Persisted);
    assert_eq!(reopened.current(), &next);
}

#[test]
fn corrupt_files_fall_back_to_the_seed() {
    let dir = tempdir().expect("tempdir");
    let files = storage(dir.path());
    fs::write(files.entry_path("finance_data_2026"), "{ broken").expect("write corrupt file");

    let (store, outcome) = Store::open(Box::new(files), "finance_data_2026");
    assert_eq!(outcome.source, LoadSource::Seed);
    assert_eq!(store.current(), &initial_state());
}

#[test]
fn exports_are_listed_newest_first_and_pruned() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::with_retention(
        StoragePaths {
            data_root: dir.path().join("data"),
            backup_root: dir.path().join("backups"),
        },
        3,
    )
    .expect("create storage");
    let state = initial_state();

    for day in 1..=5 {
        let date = NaiveDate::from_ymd_opt(2026, 4, day).expect("date");
        store.export_backup(&state, date).expect("export");
    }

    let backups = store.list_backups().expect("list");
    let names: Vec<_> = backups.iter().map(|b| b.file_name.as_str()).collect();
    assert_eq!(
        names,
        [
            "finance_data_backup_2026-04-05.json",
            "finance_data_backup_2026-04-04.json",
            "finance_data_backup_2026-04-03.json",
        ]
    );
}

#[test]
fn exported_backups_read_back() {
    let dir = tempdir().expect("tempdir");
    let store = storage(dir.path());
    let state = initial_state();
    let info = store
        .export_backup(&state, NaiveDate::from_ymd_opt(2026, 5, 1).expect("date"))
        .expect("export");

    let (restored, report) = read_backup(&info.path).expect("read backup");
    assert_eq!(restored, state);
    assert!(report.is_empty());
}

#[test]
fn backups_without_required_fields_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"studentDb": []}"#).expect("write");

    let err = read_backup(&path).expect_err("should reject");
    assert!(matches!(err, CoreError::InvalidBackup(_)));
}
