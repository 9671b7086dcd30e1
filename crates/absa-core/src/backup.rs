//! Whole-state backup documents.

use absa_domain::state::AppState;
use chrono::NaiveDate;
use serde_json::Value;

use crate::{
    migration::{migrate_document, MigrationReport},
    CoreError,
};

pub const BACKUP_FILE_PREFIX: &str = "finance_data_backup_";
pub const BACKUP_FILE_EXTENSION: &str = "json";

/// `finance_data_backup_<YYYY-MM-DD>.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!(
        "{BACKUP_FILE_PREFIX}{}.{BACKUP_FILE_EXTENSION}",
        date.format("%Y-%m-%d")
    )
}

/// Pretty-printed document written on export.
pub fn export_document(state: &AppState) -> Result<String, CoreError> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Validates and decodes an imported backup.
///
/// The document must be a JSON object with non-null `months` and
/// `categories`. Anything else is rejected as [`CoreError::InvalidBackup`].
pub fn parse_backup(bytes: &[u8]) -> Result<(AppState, MigrationReport), CoreError> {
    let mut document: Value = serde_json::from_slice(bytes)
        .map_err(|err| CoreError::InvalidBackup(format!("not valid JSON: {err}")))?;

    for field in ["months", "categories"] {
        if matches!(document.get(field), None | Some(Value::Null)) {
            return Err(CoreError::InvalidBackup(format!(
                "missing required field `{field}`"
            )));
        }
    }

    let report = migrate_document(&mut document)
        .map_err(|err| CoreError::InvalidBackup(err.to_string()))?;
    let state = serde_json::from_value(document)
        .map_err(|err| CoreError::InvalidBackup(format!("unexpected shape: {err}")))?;
    Ok((state, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use absa_domain::seed::initial_state;

    #[test]
    fn file_name_embeds_the_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(backup_file_name(date), "finance_data_backup_2026-03-05.json");
    }

    #[test]
    fn exported_document_parses_back() {
        let state = initial_state();
        let document = export_document(&state).unwrap();
        let (parsed, report) = parse_backup(document.as_bytes()).unwrap();
        assert_eq!(parsed, state);
        assert!(report.is_empty());
    }

    #[test]
    fn thirteenth_month_is_dropped_on_import() {
        let state = initial_state();
        let mut document: Value =
            serde_json::from_str(&export_document(&state).unwrap()).unwrap();
        let extra = document["months"][0].clone();
        document["months"].as_array_mut().unwrap().push(extra);

        let bytes = serde_json::to_vec(&document).unwrap();
        let (parsed, report) = parse_backup(&bytes).unwrap();
        assert_eq!(parsed.months.len(), 12);
        assert_eq!(parsed, state);
        assert!(!report.is_empty());
    }

    #[test]
    fn documents_without_months_are_rejected() {
        let err = parse_backup(br#"{"categories": []}"#).unwrap_err();
        assert!(matches!(err, CoreError::InvalidBackup(message) if message.contains("months")));
    }

    #[test]
    fn null_categories_are_rejected() {
        let err = parse_backup(br#"{"months": [], "categories": null}"#).unwrap_err();
        assert!(matches!(err, CoreError::InvalidBackup(_)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            parse_backup(b"not json"),
            Err(CoreError::InvalidBackup(_))
        ));
    }
}
