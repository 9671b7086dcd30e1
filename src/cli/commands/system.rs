use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::utils::build_info::{self, DataLayout};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new("undo", "Revert the last change", "undo", cmd_undo),
        CommandEntry::new("redo", "Reapply the last undone change", "redo", cmd_redo),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
        CommandEntry::new("quit", "Exit the shell", "quit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        Some(name) => match context.command(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        },
        None => help::print_overview(&context.registry),
    }
    Ok(())
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(meta.banner());
    output::line(format!("  Built at    : {}", meta.built_at));
    output::line(format!("  Target      : {} ({})", meta.target, meta.profile));

    let layout = DataLayout::for_year(context.config.data_year);
    let data_file = context.storage.entry_path(&layout.storage_key);
    output::line(format!("  Data year   : {}", layout.data_year));
    output::line(format!("  Data file   : {}", data_file.display()));
    output::line(format!("  Backups     : {}", layout.backup_pattern));
    output::line(format!("  Undo limit  : {} steps", layout.undo_limit));
    if context.manager.state().year != layout.data_year {
        output::hint(format!(
            "Loaded books are stamped {}; they are saved under {}.",
            context.manager.state().year,
            layout.storage_key
        ));
    }
    Ok(())
}

fn cmd_undo(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.manager.undo()? {
        output::success(format!("Undone. {} step(s) left.", context.manager.undo_depth()));
    } else {
        output::info("Nothing to undo.");
    }
    Ok(())
}

fn cmd_redo(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.manager.redo()? {
        output::success("Redone.");
    } else {
        output::info("Nothing to redo.");
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
