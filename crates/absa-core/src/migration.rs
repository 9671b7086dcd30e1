//! Load-time normalisation of persisted documents.
//!
//! Older saves predate several fields. Normalisation runs on the raw JSON
//! document, before typed decoding, so that a collection that is absent can be
//! told apart from one the user emptied on purpose. Only absent (or `null`)
//! fields are filled; existing values are never replaced.

use std::sync::Arc;

use absa_domain::{
    category::{BudgetBand, Category, CategoryKind},
    common::EntityId,
    month::Month,
    seed::{self, BASIC_CATEGORY_IDS, MONTH_NAMES},
    state::{AppState, BrandSettings},
};
use serde_json::{json, Map, Value};

use crate::CoreError;

/// Records which backfills ran while loading a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<String>,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    fn note(&mut self, message: impl Into<String>) {
        self.applied.push(message.into());
    }
}

/// Band that an expense category without one receives.
pub fn default_band_for(id: EntityId) -> BudgetBand {
    if BASIC_CATEGORY_IDS
        .iter()
        .any(|basic| EntityId::new(*basic) == id)
    {
        BudgetBand::Basics
    } else {
        BudgetBand::Lifestyle
    }
}

/// Normalises a raw state document in place and reports what changed.
pub fn migrate_document(document: &mut Value) -> Result<MigrationReport, CoreError> {
    let root = document
        .as_object_mut()
        .ok_or_else(|| CoreError::Serde("state document must be a JSON object".into()))?;
    let mut report = MigrationReport::default();

    fill_missing(root, "year", json!(seed::SEED_YEAR), &mut report);
    fill_missing(
        root,
        "categories",
        serde_json::to_value(seed::initial_categories())?,
        &mut report,
    );
    fill_missing(
        root,
        "paymentMethods",
        serde_json::to_value(seed::initial_payment_methods())?,
        &mut report,
    );
    fill_missing(root, "studentDb", json!([]), &mut report);
    fill_missing(root, "schedule", json!([]), &mut report);
    fill_missing(
        root,
        "brandSettings",
        serde_json::to_value(BrandSettings::default())?,
        &mut report,
    );

    normalize_months(root, &mut report)?;
    assign_budget_bands(root, &mut report);

    Ok(report)
}

/// Parses, normalises, and decodes a persisted document.
pub fn decode_state(bytes: &[u8]) -> Result<(AppState, MigrationReport), CoreError> {
    let mut document: Value = serde_json::from_slice(bytes)?;
    let report = migrate_document(&mut document)?;
    let state = serde_json::from_value(document)?;
    Ok((state, report))
}

/// Typed counterpart of [`migrate_document`] for states that are already decoded.
///
/// Pads the month list to twelve and assigns missing budget bands. Applying it
/// twice yields the same state as applying it once.
pub fn normalize_state(state: &AppState) -> AppState {
    let mut next = state.clone();

    let missing_band = |category: &Category| {
        category.kind == CategoryKind::Expense && category.budget_band.is_none()
    };
    if next.categories.iter().any(missing_band) {
        for category in next.categories_mut().iter_mut() {
            if missing_band(category) {
                category.budget_band = Some(default_band_for(category.id));
            }
        }
    }

    next.months.truncate(MONTH_NAMES.len());
    for index in next.months.len()..MONTH_NAMES.len() {
        next.months.push(Arc::new(Month::empty(MONTH_NAMES[index])));
    }

    next
}

fn is_missing(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

fn fill_missing(
    root: &mut Map<String, Value>,
    key: &str,
    default: Value,
    report: &mut MigrationReport,
) {
    if is_missing(root.get(key)) {
        root.insert(key.to_string(), default);
        report.note(format!("added default {key}"));
    }
}

fn normalize_months(
    root: &mut Map<String, Value>,
    report: &mut MigrationReport,
) -> Result<(), CoreError> {
    if !matches!(root.get("months"), Some(Value::Array(_))) {
        root.insert("months".into(), serde_json::to_value(seed::empty_months())?);
        report.note("added default months");
        return Ok(());
    }
    let Some(Value::Array(months)) = root.get_mut("months") else {
        return Ok(());
    };

    let original_len = months.len();
    if original_len > MONTH_NAMES.len() {
        months.truncate(MONTH_NAMES.len());
        report.note(format!(
            "dropped months beyond {} (had {original_len})",
            MONTH_NAMES.len()
        ));
    }
    for name in MONTH_NAMES.iter().skip(original_len) {
        months.push(serde_json::to_value(Month::empty(*name))?);
    }
    if months.len() > original_len {
        report.note(format!(
            "padded months from {original_len} to {}",
            months.len()
        ));
    }

    let mut patched = 0usize;
    for (index, month) in months.iter_mut().enumerate() {
        if month.is_null() {
            let name = MONTH_NAMES.get(index).copied().unwrap_or_default();
            *month = serde_json::to_value(Month::empty(name))?;
            patched += 1;
            continue;
        }
        let Some(month) = month.as_object_mut() else {
            continue;
        };
        let mut touched = false;
        for key in ["pianoClasses", "expenses", "incomes", "savings"] {
            if is_missing(month.get(key)) {
                month.insert(key.into(), json!([]));
                touched = true;
            }
        }
        if is_missing(month.get("name")) {
            if let Some(name) = MONTH_NAMES.get(index) {
                month.insert("name".into(), json!(name));
                touched = true;
            }
        }
        if touched {
            patched += 1;
        }
    }
    if patched > 0 {
        report.note(format!("added missing lists to {patched} months"));
    }
    Ok(())
}

fn assign_budget_bands(root: &mut Map<String, Value>, report: &mut MigrationReport) {
    let Some(Value::Array(categories)) = root.get_mut("categories") else {
        return;
    };
    let mut assigned = 0usize;
    for category in categories.iter_mut() {
        let Some(category) = category.as_object_mut() else {
            continue;
        };
        if category.get("type").and_then(Value::as_str) != Some("expense")
            || !is_missing(category.get("budgetBand"))
        {
            continue;
        }
        let band = category
            .get("id")
            .and_then(raw_id)
            .map(default_band_for)
            .unwrap_or(BudgetBand::Lifestyle);
        if let Ok(value) = serde_json::to_value(band) {
            category.insert("budgetBand".into(), value);
            assigned += 1;
        }
    }
    if assigned > 0 {
        report.note(format!("assigned budget bands to {assigned} categories"));
    }
}

fn raw_id(value: &Value) -> Option<EntityId> {
    match value {
        Value::Number(number) => number.as_f64().and_then(EntityId::from_f64),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_follow_the_basic_id_list() {
        let mut document = json!({
            "categories": [
                { "id": 1, "name": "Hogar", "color": "bg-blue-500", "type": "expense", "subcategories": [] },
                { "id": "5", "name": "Educación", "color": "bg-purple-500", "type": "expense", "subcategories": [] },
                { "id": 7, "name": "Clases", "color": "bg-indigo-500", "type": "income", "subcategories": [] }
            ],
            "months": []
        });
        let report = migrate_document(&mut document).unwrap();
        assert!(!report.is_empty());
        assert_eq!(document["categories"][0]["budgetBand"], "basicos");
        assert_eq!(document["categories"][1]["budgetBand"], "estiloVida");
        assert!(document["categories"][2].get("budgetBand").is_none());
    }

    #[test]
    fn emptied_collections_stay_empty() {
        let mut document = json!({ "categories": [], "paymentMethods": [] });
        migrate_document(&mut document).unwrap();
        assert_eq!(document["categories"], json!([]));
        assert_eq!(document["paymentMethods"], json!([]));
        assert_eq!(document["months"].as_array().unwrap().len(), 12);
    }

    #[test]
    fn existing_values_are_not_replaced() {
        let mut document = json!({
            "categories": [
                { "id": 1, "name": "Hogar", "color": "bg-blue-500", "type": "expense", "budgetBand": "estiloVida" }
            ],
            "brandSettings": { "name": "Estudio", "icon": "Piano" }
        });
        migrate_document(&mut document).unwrap();
        assert_eq!(document["categories"][0]["budgetBand"], "estiloVida");
        assert_eq!(document["brandSettings"]["name"], "Estudio");
    }

    #[test]
    fn months_receive_missing_savings_lists() {
        let mut document = json!({
            "months": [{ "name": "Enero", "pianoClasses": [], "expenses": [], "incomes": [] }]
        });
        let report = migrate_document(&mut document).unwrap();
        assert_eq!(document["months"][0]["savings"], json!([]));
        assert_eq!(document["months"][11]["name"], "Diciembre");
        assert!(report
            .applied
            .iter()
            .any(|entry| entry.contains("padded months from 1 to 12")));
    }

    #[test]
    fn extra_months_are_dropped() {
        let mut months: Vec<Value> = MONTH_NAMES.iter().map(|name| json!({ "name": name })).collect();
        months.push(json!({ "name": "Enero", "expenses": [{ "id": 1, "amount": 5 }] }));
        let mut document = json!({ "months": months });

        let report = migrate_document(&mut document).unwrap();
        assert_eq!(document["months"].as_array().unwrap().len(), 12);
        assert_eq!(document["months"][11]["name"], "Diciembre");
        assert!(report
            .applied
            .iter()
            .any(|entry| entry.contains("dropped months beyond 12 (had 13)")));
        assert!(migrate_document(&mut document).unwrap().is_empty());
    }

    #[test]
    fn typed_normalisation_drops_extra_months() {
        let mut state = seed::initial_state();
        state.months.push(Arc::new(Month::empty("Enero")));
        let normalized = normalize_state(&state);
        assert_eq!(normalized.months.len(), 12);
        assert_eq!(normalized.months[11].name, "Diciembre");
        assert_eq!(normalize_state(&normalized), normalized);
    }

    #[test]
    fn second_pass_reports_nothing() {
        let mut document = json!({ "months": [{ "name": "Enero" }] });
        migrate_document(&mut document).unwrap();
        let again = migrate_document(&mut document).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn non_object_documents_are_rejected() {
        let mut document = json!([1, 2, 3]);
        assert!(migrate_document(&mut document).is_err());
    }

    #[test]
    fn typed_normalisation_pads_months_and_bands() {
        let mut state = seed::initial_state();
        state.months.truncate(3);
        state.categories_mut()[0].budget_band = None;
        let normalized = normalize_state(&state);
        assert_eq!(normalized.months.len(), 12);
        assert_eq!(normalized.categories[0].budget_band, Some(BudgetBand::Basics));
        assert_eq!(normalize_state(&normalized), normalized);
    }
}
