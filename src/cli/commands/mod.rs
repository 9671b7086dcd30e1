pub mod backup;
pub mod ledger;
pub mod reports;
pub mod students;
pub mod system;

use absa_domain::EntityId;

use crate::cli::core::{invalid, require_arg, CommandError};
use crate::cli::format::parse_month;
use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(reports::definitions());
    commands.extend(students::definitions());
    commands.extend(ledger::definitions());
    commands.extend(backup::definitions());
    commands
}

pub(crate) fn month_arg(args: &[&str], index: usize, usage: &str) -> Result<usize, CommandError> {
    parse_month(require_arg(args, index, usage)?).map_err(invalid)
}

pub(crate) fn id_arg(args: &[&str], index: usize, usage: &str) -> Result<EntityId, CommandError> {
    require_arg(args, index, usage)?.parse().map_err(invalid)
}
