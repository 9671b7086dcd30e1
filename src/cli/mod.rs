//! Line-oriented shell over the [`FinanceManager`](crate::FinanceManager).

pub mod commands;
pub mod core;
pub mod format;
mod help;
pub mod output;
pub mod registry;
mod shell;

pub use shell::{run_cli, SCRIPT_ENV_VAR};
