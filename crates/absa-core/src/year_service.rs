use std::sync::Arc;

use absa_domain::{seed, state::AppState};

use crate::migration::normalize_state;

pub struct YearService;

impl YearService {
    /// Starts a new year of records.
    ///
    /// All twelve months are replaced by empty ones and the weekly schedule is
    /// cleared. The roster, categories, payment methods, and brand settings
    /// carry over. The year field is left alone, so the books keep saving
    /// under the same storage key.
    pub fn start_new_year(state: &AppState) -> AppState {
        let mut next = state.clone();
        next.months = seed::empty_months();
        next.schedule = Arc::new(Vec::new());
        next
    }

    /// Replaces the whole state with `incoming`, normalised.
    pub fn load_data(_state: &AppState, incoming: AppState) -> AppState {
        normalize_state(&incoming)
    }
}
