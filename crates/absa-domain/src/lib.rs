//! absa-domain
//!
//! Pure domain models for the piano studio books (students, categories,
//! monthly transactions, classes, savings, schedule, brand settings).
//! No I/O, no persistence. Only data types, patches, and seed data.

pub mod category;
pub mod common;
pub mod month;
pub mod payment_method;
pub mod piano_class;
pub mod saving;
pub mod schedule;
pub mod seed;
pub mod state;
pub mod student;
pub mod transaction;

pub use category::*;
pub use common::*;
pub use month::*;
pub use payment_method::*;
pub use piano_class::*;
pub use saving::*;
pub use schedule::*;
pub use state::*;
pub use student::*;
pub use transaction::*;
