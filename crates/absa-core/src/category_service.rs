use absa_domain::{
    category::{Category, CategoryPatch, NewCategory},
    common::EntityId,
    state::AppState,
};

use crate::{
    collections::{contains_id, patch_by_id, remove_by_id},
    ids::IdGenerator,
};

pub struct CategoryService;

impl CategoryService {
    pub fn add(state: &AppState, ids: &mut IdGenerator, category: NewCategory) -> (AppState, EntityId) {
        let id = ids.next_id();
        let mut next = state.clone();
        next.categories_mut().push(Category::from_new(id, category));
        (next, id)
    }

    pub fn update(state: &AppState, id: EntityId, patch: CategoryPatch) -> AppState {
        Self::modify(state, id, |category| patch.apply(category))
    }

    /// Deletes the category. Transactions that reference it keep the dangling
    /// id and fall back to a generic label when displayed.
    pub fn delete(state: &AppState, id: EntityId) -> AppState {
        if !contains_id(&state.categories, id) {
            return state.clone();
        }
        let mut next = state.clone();
        remove_by_id(next.categories_mut(), id);
        next
    }

    /// Appends a subcategory label. Duplicates are not rejected.
    pub fn add_subcategory(state: &AppState, id: EntityId, label: impl Into<String>) -> AppState {
        let label = label.into();
        Self::modify(state, id, move |category| category.subcategories.push(label))
    }

    /// Removes every subcategory equal to `label`.
    pub fn delete_subcategory(state: &AppState, id: EntityId, label: &str) -> AppState {
        let present = state
            .category(id)
            .is_some_and(|category| category.has_subcategory(label));
        if !present {
            return state.clone();
        }
        Self::modify(state, id, |category| {
            category.subcategories.retain(|existing| existing != label)
        })
    }

    fn modify(state: &AppState, id: EntityId, change: impl FnOnce(&mut Category)) -> AppState {
        if !contains_id(&state.categories, id) {
            return state.clone();
        }
        let mut next = state.clone();
        patch_by_id(next.categories_mut(), id, change);
        next
    }
}
