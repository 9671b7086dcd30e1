//! Linear undo/redo over committed states.

use std::collections::VecDeque;

use absa_domain::state::AppState;
use tracing::debug;

use crate::{store::Store, CoreError};

/// Number of past states kept for undo.
pub const HISTORY_LIMIT: usize = 50;

/// Two stacks of structurally shared snapshots around a [`Store`].
///
/// `history` holds past states oldest first; `future` holds undone states,
/// most recently undone first.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    history: VecDeque<AppState>,
    future: VecDeque<AppState>,
    capacity: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_LIMIT)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity.min(HISTORY_LIMIT)),
            future: VecDeque::new(),
            capacity,
        }
    }

    /// Records the store's current state, drops the redo stack, and commits `next`.
    pub fn commit(&mut self, store: &mut Store, next: AppState) -> Result<(), CoreError> {
        self.push_history(store.snapshot());
        self.future.clear();
        debug!(undo_depth = self.history.len(), "commit");
        store.commit(next)
    }

    /// Steps back one state. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, store: &mut Store) -> Result<bool, CoreError> {
        let Some(previous) = self.history.pop_back() else {
            return Ok(false);
        };
        self.future.push_front(store.snapshot());
        debug!(
            undo_depth = self.history.len(),
            redo_depth = self.future.len(),
            "undo"
        );
        store.commit(previous)?;
        Ok(true)
    }

    /// Re-applies the most recently undone state. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self, store: &mut Store) -> Result<bool, CoreError> {
        let Some(next) = self.future.pop_front() else {
            return Ok(false);
        };
        self.push_history(store.snapshot());
        debug!(
            undo_depth = self.history.len(),
            redo_depth = self.future.len(),
            "redo"
        );
        store.commit(next)?;
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.future.clear();
    }

    fn push_history(&mut self, state: AppState) {
        self.history.push_back(state);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }
}
