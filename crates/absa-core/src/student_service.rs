use absa_domain::{
    common::EntityId,
    state::AppState,
    student::{NewStudent, Student, StudentPatch},
};

use crate::{
    collections::{contains_id, patch_by_id, remove_by_id},
    ids::IdGenerator,
};

/// Roster management. Every operation returns the next state; the input is untouched.
pub struct StudentService;

impl StudentService {
    /// Appends a student. New students always start active.
    pub fn add(state: &AppState, ids: &mut IdGenerator, student: NewStudent) -> (AppState, EntityId) {
        let id = ids.next_id();
        let mut next = state.clone();
        next.student_db_mut().push(Student::from_new(id, student));
        (next, id)
    }

    pub fn update(state: &AppState, id: EntityId, patch: StudentPatch) -> AppState {
        if !contains_id(&state.student_db, id) {
            return state.clone();
        }
        let mut next = state.clone();
        patch_by_id(next.student_db_mut(), id, |student| patch.apply(student));
        next
    }

    /// Removes the roster entry only. Billed classes and schedule slots keep
    /// their own copy of the student's name.
    pub fn delete(state: &AppState, id: EntityId) -> AppState {
        if !contains_id(&state.student_db, id) {
            return state.clone();
        }
        let mut next = state.clone();
        remove_by_id(next.student_db_mut(), id);
        next
    }

    pub fn set_active(state: &AppState, id: EntityId, active: bool) -> AppState {
        Self::update(state, id, StudentPatch::active(active))
    }
}
