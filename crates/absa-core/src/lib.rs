//! absa-core
//!
//! State management for the studio books: load-time normalisation, the
//! catalogue of mutation services, the persisted store, and undo/redo history.
//! Depends on absa-domain. No CLI, no terminal I/O, no direct filesystem access.

pub mod backup;
pub mod error;
pub mod history;
pub mod ids;
pub mod migration;
pub mod store;
pub mod summary_service;
pub mod time;
pub mod warnings;

mod collections;
mod payment;

pub mod category_service;
pub mod payment_method_service;
pub mod piano_class_service;
pub mod saving_service;
pub mod schedule_service;
pub mod settings_service;
pub mod student_service;
pub mod transaction_service;
pub mod year_service;

#[cfg(test)]
mod tests;

pub use error::CoreError;
pub use history::{HistoryManager, HISTORY_LIMIT};
pub use ids::IdGenerator;
pub use migration::MigrationReport;
pub use store::{storage_key, KeyValueStore, LoadOutcome, LoadSource, MemoryStore, Store, SubscriptionId};
pub use time::{Clock, FixedClock, SystemClock};

pub use category_service::*;
pub use payment_method_service::*;
pub use piano_class_service::*;
pub use saving_service::*;
pub use schedule_service::*;
pub use settings_service::*;
pub use student_service::*;
pub use summary_service::*;
pub use transaction_service::*;
pub use year_service::*;
