use absa_domain::{
    common::EntityId,
    schedule::{NewScheduleEntry, ScheduleEntry, ScheduleEntryPatch},
    state::AppState,
};

use crate::{
    collections::{contains_id, patch_by_id, remove_by_id},
    ids::IdGenerator,
};

/// Weekly recurring slots. Overlapping slots are allowed.
pub struct ScheduleService;

impl ScheduleService {
    pub fn add(
        state: &AppState,
        ids: &mut IdGenerator,
        entry: NewScheduleEntry,
    ) -> (AppState, EntityId) {
        let id = ids.next_id();
        let mut next = state.clone();
        next.schedule_mut().push(ScheduleEntry::from_new(id, entry));
        (next, id)
    }

    pub fn update(state: &AppState, id: EntityId, patch: ScheduleEntryPatch) -> AppState {
        if !contains_id(&state.schedule, id) {
            return state.clone();
        }
        let mut next = state.clone();
        patch_by_id(next.schedule_mut(), id, |entry| patch.apply(entry));
        next
    }

    pub fn delete(state: &AppState, id: EntityId) -> AppState {
        if !contains_id(&state.schedule, id) {
            return state.clone();
        }
        let mut next = state.clone();
        remove_by_id(next.schedule_mut(), id);
        next
    }
}
