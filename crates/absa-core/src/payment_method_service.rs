use absa_domain::{
    common::EntityId,
    payment_method::{NewPaymentMethod, PaymentMethod, PaymentMethodPatch},
    state::AppState,
};

use crate::{
    collections::{contains_id, patch_by_id, remove_by_id},
    ids::IdGenerator,
};

pub struct PaymentMethodService;

impl PaymentMethodService {
    pub fn add(
        state: &AppState,
        ids: &mut IdGenerator,
        method: NewPaymentMethod,
    ) -> (AppState, EntityId) {
        let id = ids.next_id();
        let mut next = state.clone();
        next.payment_methods_mut().push(PaymentMethod::from_new(id, method));
        (next, id)
    }

    pub fn update(state: &AppState, id: EntityId, patch: PaymentMethodPatch) -> AppState {
        if !contains_id(&state.payment_methods, id) {
            return state.clone();
        }
        let mut next = state.clone();
        patch_by_id(next.payment_methods_mut(), id, |method| patch.apply(method));
        next
    }

    pub fn delete(state: &AppState, id: EntityId) -> AppState {
        if !contains_id(&state.payment_methods, id) {
            return state.clone();
        }
        let mut next = state.clone();
        remove_by_id(next.payment_methods_mut(), id);
        next
    }
}
