use absa_domain::{
    common::EntityId,
    saving::{NewSaving, Saving, SavingPatch},
    state::AppState,
};

use crate::{
    collections::{contains_id, patch_by_id, remove_by_id},
    ids::IdGenerator,
};

pub struct SavingService;

impl SavingService {
    /// Appends a saving to month `month`. Out-of-range months leave the state as is.
    pub fn add(
        state: &AppState,
        ids: &mut IdGenerator,
        month: usize,
        saving: NewSaving,
    ) -> (AppState, Option<EntityId>) {
        if state.month(month).is_none() {
            return (state.clone(), None);
        }
        let id = ids.next_id();
        let mut next = state.clone();
        if let Some(target) = next.month_mut(month) {
            target.savings.push(Saving::from_new(id, saving));
        }
        (next, Some(id))
    }

    pub fn update(state: &AppState, month: usize, id: EntityId, patch: SavingPatch) -> AppState {
        if !Self::holds(state, month, id) {
            return state.clone();
        }
        let mut next = state.clone();
        if let Some(target) = next.month_mut(month) {
            patch_by_id(&mut target.savings, id, |saving| patch.apply(saving));
        }
        next
    }

    pub fn delete(state: &AppState, month: usize, id: EntityId) -> AppState {
        if !Self::holds(state, month, id) {
            return state.clone();
        }
        let mut next = state.clone();
        if let Some(target) = next.month_mut(month) {
            remove_by_id(&mut target.savings, id);
        }
        next
    }

    fn holds(state: &AppState, month: usize, id: EntityId) -> bool {
        state
            .month(month)
            .is_some_and(|target| contains_id(&target.savings, id))
    }
}
