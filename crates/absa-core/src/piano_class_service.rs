use absa_domain::{
    common::EntityId,
    piano_class::{NewPianoClass, PianoClass, PianoClassPatch},
    state::AppState,
    student::Student,
};
use chrono::NaiveDate;
use tracing::debug;

use crate::{
    collections::{contains_id, patch_by_id, remove_by_id},
    ids::IdGenerator,
    payment::toggle_payment,
};

/// Monthly billing lines for piano classes.
pub struct PianoClassService;

impl PianoClassService {
    /// Appends a class line; `total` is derived from `rate * count`.
    pub fn add(
        state: &AppState,
        ids: &mut IdGenerator,
        month: usize,
        class: NewPianoClass,
    ) -> (AppState, Option<EntityId>) {
        if state.month(month).is_none() {
            return (state.clone(), None);
        }
        let id = ids.next_id();
        let mut next = state.clone();
        if let Some(target) = next.month_mut(month) {
            target.piano_classes.push(PianoClass::from_new(id, class));
        }
        (next, Some(id))
    }

    /// Merges `patch` and recomputes `total` from the resulting rate and count.
    pub fn update(state: &AppState, month: usize, id: EntityId, patch: PianoClassPatch) -> AppState {
        Self::modify(state, month, id, |class| patch.apply(class))
    }

    pub fn delete(state: &AppState, month: usize, id: EntityId) -> AppState {
        if !Self::holds(state, month, id) {
            return state.clone();
        }
        let mut next = state.clone();
        if let Some(target) = next.month_mut(month) {
            remove_by_id(&mut target.piano_classes, id);
        }
        next
    }

    pub fn toggle_status(
        state: &AppState,
        month: usize,
        id: EntityId,
        payment_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> AppState {
        Self::modify(state, month, id, |class| {
            toggle_payment(&mut class.status, &mut class.payment_date, payment_date, today)
        })
    }

    /// Bills every active roster student not already present in the month.
    pub fn import_students_to_month(
        state: &AppState,
        ids: &mut IdGenerator,
        month: usize,
    ) -> (AppState, usize) {
        let candidates: Vec<&Student> = state.active_students().collect();
        Self::import_candidates(state, ids, month, &candidates)
    }

    /// Bills the chosen students, active or not, skipping those already present.
    pub fn import_specific_students(
        state: &AppState,
        ids: &mut IdGenerator,
        month: usize,
        student_ids: &[EntityId],
    ) -> (AppState, usize) {
        let candidates: Vec<&Student> = state
            .student_db
            .iter()
            .filter(|student| student_ids.contains(&student.id))
            .collect();
        Self::import_candidates(state, ids, month, &candidates)
    }

    fn import_candidates(
        state: &AppState,
        ids: &mut IdGenerator,
        month: usize,
        candidates: &[&Student],
    ) -> (AppState, usize) {
        let Some(current) = state.month(month) else {
            return (state.clone(), 0);
        };
        let lines: Vec<PianoClass> = candidates
            .iter()
            .filter(|student| {
                !current
                    .piano_classes
                    .iter()
                    .any(|class| class.represents(student))
            })
            .map(|student| PianoClass::for_student(ids.next_id(), student))
            .collect();

        if lines.is_empty() {
            debug!(month, "every candidate student is already billed");
            return (state.clone(), 0);
        }
        let imported = lines.len();
        let mut next = state.clone();
        if let Some(target) = next.month_mut(month) {
            target.piano_classes.extend(lines);
        }
        (next, imported)
    }

    fn holds(state: &AppState, month: usize, id: EntityId) -> bool {
        state
            .month(month)
            .is_some_and(|target| contains_id(&target.piano_classes, id))
    }

    fn modify(
        state: &AppState,
        month: usize,
        id: EntityId,
        change: impl FnOnce(&mut PianoClass),
    ) -> AppState {
        if !Self::holds(state, month, id) {
            return state.clone();
        }
        let mut next = state.clone();
        if let Some(target) = next.month_mut(month) {
            patch_by_id(&mut target.piano_classes, id, change);
        }
        next
    }
}
