use std::collections::HashSet;

use absa_domain::state::AppState;

/// Lists references to categories, payment methods, or students that no longer exist.
///
/// Purely informational: deletes never cascade, and nothing here changes the state.
pub fn state_warnings(state: &AppState) -> Vec<String> {
    let category_ids: HashSet<_> = state.categories.iter().map(|c| c.id).collect();
    let method_ids: HashSet<_> = state.payment_methods.iter().map(|m| m.id).collect();
    let student_ids: HashSet<_> = state.student_db.iter().map(|s| s.id).collect();
    let mut warnings = Vec::new();

    for month in &state.months {
        for (kind, lines) in [("expense", &month.expenses), ("income", &month.incomes)] {
            for txn in lines.iter() {
                if let Some(category) = txn.category_id {
                    if !category_ids.contains(&category) {
                        warnings.push(format!(
                            "{}: {kind} {} references missing category {}",
                            month.name, txn.id, category
                        ));
                    }
                }
                if let Some(method) = txn.payment_method_id {
                    if !method_ids.contains(&method) {
                        warnings.push(format!(
                            "{}: {kind} {} references missing payment method {}",
                            month.name, txn.id, method
                        ));
                    }
                }
            }
        }
        for class in &month.piano_classes {
            if let Some(student) = class.student_id {
                if !student_ids.contains(&student) {
                    warnings.push(format!(
                        "{}: class {} ({}) references removed student {}",
                        month.name, class.id, class.student_name, student
                    ));
                }
            }
        }
    }

    for entry in state.schedule.iter() {
        if let Some(student) = entry.student_id {
            if !student_ids.contains(&student) {
                warnings.push(format!(
                    "schedule slot {} ({} {}) references removed student {}",
                    entry.id, entry.day, entry.time, student
                ));
            }
        }
    }

    warnings
}
