//! Shell context, dispatch, and error reporting.

use std::{io, path::Path, sync::Arc};

use absa_config::{Config, ConfigManager};
use absa_core::{Clock, CoreError, LoadOutcome, LoadSource, SystemClock};
use absa_storage_json::{JsonFileStore, StoragePaths};
use strsim::levenshtein;
use thiserror::Error;
use tracing::debug;

use crate::{core::FinanceManager, errors::AppError, utils::paths};

use super::commands;
use super::format::month_name;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};

pub type CliError = AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) running: bool,
    pub(crate) manager: FinanceManager,
    pub(crate) storage: JsonFileStore,
    pub(crate) config: Config,
    pub(crate) registry: CommandRegistry,
}

impl ShellContext {
    /// Loads config from the base directory (writing defaults on first run)
    /// and opens the books for the configured year.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base = paths::resolve_base_dir();
        let config_manager = ConfigManager::with_base_dir(&base)?;
        let config = config_manager.load()?;
        if !config_manager.config_path().exists() {
            config_manager.save(&config)?;
        }
        Self::with_config(mode, &base, config, Arc::new(SystemClock))
    }

    pub fn with_config(
        mode: CliMode,
        base: &Path,
        config: Config,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CliError> {
        if !config.ui_color_enabled {
            colored::control::set_override(false);
        }

        let (data_root, backup_root) = paths::storage_roots(&config, base);
        let storage = JsonFileStore::with_retention(
            StoragePaths {
                data_root,
                backup_root,
            },
            config.backup_retention,
        )?;
        let (manager, outcome) =
            FinanceManager::open(Box::new(storage.clone()), config.data_year, clock);

        let context = Self {
            mode,
            running: true,
            manager,
            storage,
            config,
            registry: CommandRegistry::new(commands::all_definitions()),
        };
        context.report_load(&outcome);
        Ok(context)
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    /// `absa 2026 [3]> `, where the bracket shows how many steps can be undone.
    pub(crate) fn prompt(&self) -> String {
        let depth = self.manager.undo_depth();
        if depth == 0 {
            format!("absa {}> ", self.manager.state().year)
        } else {
            format!("absa {} [{}]> ", self.manager.state().year, depth)
        }
    }

    fn report_load(&self, outcome: &LoadOutcome) {
        if outcome.source == LoadSource::Seed {
            output::info(format!(
                "No saved books for {}. Starting from the default categories.",
                self.config.data_year
            ));
        }
        for note in &outcome.migrations.applied {
            output::info(format!("Migration: {note}"));
        }
        for warning in &outcome.warnings {
            output::warning(warning);
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        debug!(command, ?args, "dispatching command");
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{name}`?"));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(CoreError::Storage(message)) => {
                output::error(format!("The change was kept but could not be saved: {message}"));
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }

    /// Reports a mutation that matched nothing, so the books did not change.
    pub(crate) fn report_unchanged(&self, what: &str) {
        output::warning(format!("Nothing changed: {what}."));
    }

    pub(crate) fn describe_month(&self, month: usize) -> String {
        self.manager
            .state()
            .month(month)
            .map(|m| m.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| month_name(month).to_string())
    }
}

/// Maps a parse failure onto the shell's argument error.
pub(crate) fn invalid(message: impl Into<String>) -> CommandError {
    CommandError::InvalidArguments(message.into())
}

pub(crate) fn require_arg<'a>(
    args: &[&'a str],
    index: usize,
    usage: &str,
) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| invalid(format!("missing argument. Usage: {usage}")))
}

#[cfg(test)]
mod tests {
    use absa_core::FixedClock;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::cli::shell::handle_line;

    fn context(dir: &TempDir) -> ShellContext {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        ShellContext::with_config(
            CliMode::Script,
            dir.path(),
            Config::default(),
            Arc::new(FixedClock::on(today)),
        )
        .unwrap()
    }

    #[test]
    fn commands_reach_the_manager() {
        let dir = TempDir::new().unwrap();
        let mut shell = context(&dir);

        let control = handle_line(&mut shell, "add-student Ana 35000 45").unwrap();
        assert_eq!(control, LoopControl::Continue);
        assert_eq!(shell.manager.state().student_db.len(), 1);
        assert_eq!(shell.prompt(), "absa 2026 [1]> ");

        handle_line(&mut shell, "import-students 3").unwrap();
        let class = shell.manager.state().month(2).unwrap().piano_classes[0].clone();
        handle_line(&mut shell, &format!("toggle-class marzo {}", class.id)).unwrap();
        let paid = &shell.manager.state().month(2).unwrap().piano_classes[0];
        assert_eq!(paid.payment_date, NaiveDate::from_ymd_opt(2026, 3, 15));
    }

    #[test]
    fn bad_arguments_are_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let mut shell = context(&dir);

        let err = handle_line(&mut shell, "add-student Ana lots").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
        assert!(shell.report_error(err).is_ok());
        assert_eq!(
            handle_line(&mut shell, "no-such-command").unwrap(),
            LoopControl::Continue
        );
        assert_eq!(handle_line(&mut shell, "# comment").unwrap(), LoopControl::Continue);
    }

    #[test]
    fn exit_stops_the_loop() {
        let dir = TempDir::new().unwrap();
        let mut shell = context(&dir);
        assert_eq!(handle_line(&mut shell, "exit").unwrap(), LoopControl::Exit);
        assert!(!shell.running);
    }

    #[test]
    fn script_new_year_needs_no_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut shell = context(&dir);
        handle_line(&mut shell, "add-student Ana 35000 45").unwrap();
        handle_line(&mut shell, "import-students 3").unwrap();

        handle_line(&mut shell, "new-year").unwrap();
        assert!(shell.manager.state().month(2).unwrap().piano_classes.is_empty());
        assert_eq!(shell.manager.state().year, 2026);
        assert_eq!(shell.prompt(), "absa 2026 [3]> ");

        handle_line(&mut shell, "undo").unwrap();
        assert_eq!(shell.manager.state().month(2).unwrap().piano_classes.len(), 1);
    }
}
