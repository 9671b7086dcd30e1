//! Identifier allocation for new entities.

use std::sync::Arc;

use absa_domain::{common::EntityId, AppState};

use crate::time::Clock;

/// Hands out millisecond-timestamp ids that never repeat within a session.
///
/// Two calls inside the same millisecond, or a clock that steps backwards,
/// still yield strictly increasing ids.
#[derive(Clone)]
pub struct IdGenerator {
    clock: Arc<dyn Clock>,
    last: u64,
}

impl IdGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, last: 0 }
    }

    pub fn next_id(&mut self) -> EntityId {
        let now = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0);
        let candidate = if now > self.last { now } else { self.last + 1 };
        self.last = candidate;
        EntityId::new(candidate)
    }

    /// Moves the watermark past every integral id already present in `state`.
    pub fn observe(&mut self, state: &AppState) {
        let highest = all_ids(state)
            .filter(|id| id.is_integral() && id.value() >= 0.0)
            .map(|id| id.value() as u64)
            .max()
            .unwrap_or(0);
        self.last = self.last.max(highest);
    }
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator")
            .field("last", &self.last)
            .finish()
    }
}

fn all_ids(state: &AppState) -> impl Iterator<Item = EntityId> + '_ {
    let roots = state
        .categories
        .iter()
        .map(|c| c.id)
        .chain(state.payment_methods.iter().map(|m| m.id))
        .chain(state.student_db.iter().map(|s| s.id))
        .chain(state.schedule.iter().map(|e| e.id));
    let months = state.months.iter().flat_map(|month| {
        month
            .piano_classes
            .iter()
            .map(|c| c.id)
            .chain(month.expenses.iter().map(|t| t.id))
            .chain(month.incomes.iter().map(|t| t.id))
            .chain(month.savings.iter().map(|s| s.id))
    });
    roots.chain(months)
}
