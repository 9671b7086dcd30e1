use absa_domain::{
    common::{EntityId, PaymentStatus},
    state::AppState,
    transaction::{NewTransaction, Transaction, TransactionKind, TransactionPatch},
};
use chrono::NaiveDate;
use tracing::debug;

use crate::{
    collections::{contains_id, patch_by_id, remove_by_id},
    ids::IdGenerator,
    payment::toggle_payment,
};

/// Expense and income lines of a month.
pub struct TransactionService;

impl TransactionService {
    pub fn add(
        state: &AppState,
        ids: &mut IdGenerator,
        month: usize,
        kind: TransactionKind,
        transaction: NewTransaction,
    ) -> (AppState, Option<EntityId>) {
        if state.month(month).is_none() {
            return (state.clone(), None);
        }
        let id = ids.next_id();
        let mut next = state.clone();
        if let Some(target) = next.month_mut(month) {
            target
                .transactions_mut(kind)
                .push(Transaction::from_new(id, kind, transaction));
        }
        (next, Some(id))
    }

    pub fn update(
        state: &AppState,
        month: usize,
        kind: TransactionKind,
        id: EntityId,
        patch: TransactionPatch,
    ) -> AppState {
        Self::modify(state, month, kind, id, |transaction| patch.apply(transaction))
    }

    pub fn delete(state: &AppState, month: usize, kind: TransactionKind, id: EntityId) -> AppState {
        if !Self::holds(state, month, kind, id) {
            return state.clone();
        }
        let mut next = state.clone();
        if let Some(target) = next.month_mut(month) {
            remove_by_id(target.transactions_mut(kind), id);
        }
        next
    }

    /// Flips Pendiente/Al día. Paying stamps `payment_date` (or `today`), reverting clears it.
    pub fn toggle_status(
        state: &AppState,
        month: usize,
        kind: TransactionKind,
        id: EntityId,
        payment_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> AppState {
        Self::modify(state, month, kind, id, |transaction| {
            toggle_payment(
                &mut transaction.status,
                &mut transaction.payment_date,
                payment_date,
                today,
            )
        })
    }

    /// Copies month `month - 1`'s lines of `kind` into month `month`.
    ///
    /// Lines whose (description, amount) pair already exists in the target are
    /// skipped. Copies get fresh ids, are dated `today`, and start pending.
    /// Returns the next state and how many lines were copied.
    pub fn import_from_previous_month(
        state: &AppState,
        ids: &mut IdGenerator,
        month: usize,
        kind: TransactionKind,
        today: NaiveDate,
    ) -> (AppState, usize) {
        let Some(previous_index) = month.checked_sub(1) else {
            return (state.clone(), 0);
        };
        let (Some(previous), Some(current)) = (state.month(previous_index), state.month(month))
        else {
            return (state.clone(), 0);
        };

        let existing = current.transactions(kind);
        let copies: Vec<Transaction> = previous
            .transactions(kind)
            .iter()
            .filter(|candidate| !existing.iter().any(|line| line.matches_entry(candidate)))
            .map(|template| Transaction {
                id: ids.next_id(),
                date: Some(today),
                status: PaymentStatus::Pending,
                payment_date: None,
                ..template.clone()
            })
            .collect();

        if copies.is_empty() {
            debug!(month, %kind, "nothing to copy from the previous month");
            return (state.clone(), 0);
        }
        let copied = copies.len();
        let mut next = state.clone();
        if let Some(target) = next.month_mut(month) {
            target.transactions_mut(kind).extend(copies);
        }
        (next, copied)
    }

    fn holds(state: &AppState, month: usize, kind: TransactionKind, id: EntityId) -> bool {
        state
            .month(month)
            .is_some_and(|target| contains_id(target.transactions(kind), id))
    }

    fn modify(
        state: &AppState,
        month: usize,
        kind: TransactionKind,
        id: EntityId,
        change: impl FnOnce(&mut Transaction),
    ) -> AppState {
        if !Self::holds(state, month, kind, id) {
            return state.clone();
        }
        let mut next = state.clone();
        if let Some(target) = next.month_mut(month) {
            patch_by_id(target.transactions_mut(kind), id, change);
        }
        next
    }
}
