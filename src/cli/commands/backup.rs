use std::{fs, path::PathBuf};

use crate::cli::core::{require_arg, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "export",
            "Write today's backup file to the backup directory",
            "export",
            cmd_export,
        ),
        CommandEntry::new(
            "import",
            "Replace the books with a backup file (undoable)",
            "import <file>",
            cmd_import,
        ),
        CommandEntry::new("backups", "List backup files, newest first", "backups", cmd_backups),
    ]
}

fn cmd_export(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let today = context.manager.today();
    let info = context
        .storage
        .export_backup(context.manager.state(), today)?;
    output::success(format!("Backup written to {}", info.path.display()));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = require_arg(args, 0, "import <file>")?;
    let mut path = PathBuf::from(raw);
    if !path.exists() {
        let in_backups = context.storage.paths().backup_root.join(raw);
        if in_backups.exists() {
            path = in_backups;
        }
    }
    let bytes = fs::read(&path)?;
    let report = context.manager.import_backup(&bytes)?;
    for note in &report.applied {
        output::info(format!("Migration: {note}"));
    }
    output::success(format!(
        "Imported {}. Use `undo` to restore the previous books.",
        path.display()
    ));
    for warning in context.manager.warnings() {
        output::warning(warning);
    }
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.storage.list_backups()?;
    if backups.is_empty() {
        output::info("No backups yet. Use `export` to create one.");
        return Ok(());
    }
    output::section("Backups");
    for backup in backups {
        output::line(format!("  {:<36} {:>8} bytes", backup.file_name, backup.size_bytes));
    }
    Ok(())
}
