#![doc(test(attr(deny(warnings))))]

//! Absa Books keeps the monthly accounts of an independent piano studio:
//! billed classes, other income, expenses, savings, the student roster, and
//! the weekly schedule, with undo/redo over every change.

pub mod cli;
pub mod core;
pub mod errors;
pub mod utils;

pub use crate::core::FinanceManager;
pub use errors::AppError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Absa Books tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
