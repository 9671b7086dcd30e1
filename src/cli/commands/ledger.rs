//! Month records: billed classes and transactions, plus the year rollover.

use absa_core::summary_service::{category_label, payment_method_label};
use absa_domain::{NewTransaction, PaymentStatus};
use chrono::NaiveDate;

use crate::cli::core::{invalid, require_arg, CliMode, CommandResult, ShellContext};
use crate::cli::format::{format_clp, parse_amount, parse_date, parse_kind};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

use super::{id_arg, month_arg};

const ADD_TRANSACTION_USAGE: &str =
    "add-transaction <month> <expense|income> <description> <amount> [category-id]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("classes", "List a month's billed classes", "classes <month>", cmd_classes),
        CommandEntry::new(
            "import-students",
            "Bill active students (or the listed ones) missing from a month",
            "import-students <month> [student-id...]",
            cmd_import_students,
        ),
        CommandEntry::new(
            "toggle-class",
            "Mark a class as paid or pending",
            "toggle-class <month> <id> [YYYY-MM-DD]",
            cmd_toggle_class,
        ),
        CommandEntry::new(
            "transactions",
            "List a month's expenses or incomes",
            "transactions <month> <expense|income>",
            cmd_transactions,
        ),
        CommandEntry::new(
            "add-transaction",
            "Record an expense or income dated today",
            ADD_TRANSACTION_USAGE,
            cmd_add_transaction,
        ),
        CommandEntry::new(
            "toggle-transaction",
            "Mark an expense or income as paid or pending",
            "toggle-transaction <month> <expense|income> <id> [YYYY-MM-DD]",
            cmd_toggle_transaction,
        ),
        CommandEntry::new(
            "copy-previous",
            "Copy the previous month's entries that are not already present",
            "copy-previous <month> <expense|income>",
            cmd_copy_previous,
        ),
        CommandEntry::new(
            "new-year",
            "Empty every month and move to the next year",
            "new-year [--yes]",
            cmd_new_year,
        ),
    ]
}

fn cmd_classes(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = month_arg(args, 0, "classes <month>")?;
    let Some(record) = context.manager.state().month(month) else {
        return Err(invalid(format!("month {} is not in the books", month + 1)));
    };
    if record.piano_classes.is_empty() {
        output::info(format!(
            "No classes in {}. Use `import-students {}` to bill the roster.",
            context.describe_month(month),
            month + 1
        ));
        return Ok(());
    }
    output::section(format!("Classes in {}", context.describe_month(month)));
    for class in &record.piano_classes {
        output::line(format!(
            "  {:<15} {:<20} {:>2} x {:>9} = {:>10}  {:<9} {}",
            class.id.to_string(),
            class.student_name,
            class.count,
            format_clp(class.rate),
            format_clp(class.total),
            status_label(class.status),
            class
                .payment_date
                .map(|date| date.to_string())
                .unwrap_or_default()
        ));
    }
    Ok(())
}

fn cmd_import_students(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "import-students <month> [student-id...]";
    let month = month_arg(args, 0, USAGE)?;
    let created = if args.len() > 1 {
        let ids = (1..args.len())
            .map(|index| id_arg(args, index, USAGE))
            .collect::<Result<Vec<_>, _>>()?;
        context.manager.import_specific_students(month, &ids)?
    } else {
        context.manager.import_students_to_month(month)?
    };
    if created == 0 {
        output::info("Every selected student is already billed this month.");
    } else {
        output::success(format!(
            "Imported {created} student(s) into {}.",
            context.describe_month(month)
        ));
    }
    Ok(())
}

fn cmd_toggle_class(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "toggle-class <month> <id> [YYYY-MM-DD]";
    let month = month_arg(args, 0, USAGE)?;
    let id = id_arg(args, 1, USAGE)?;
    let date = args.get(2).map(|raw| parse_date(raw)).transpose().map_err(invalid)?;

    if !context.manager.toggle_piano_class_status(month, id, date)? {
        return Err(invalid(format!("no class {id} in {}", context.describe_month(month))));
    }
    let toggled = context
        .manager
        .state()
        .month(month)
        .and_then(|record| record.piano_classes.iter().find(|class| class.id == id));
    if let Some(class) = toggled {
        output::success(format!(
            "{} is now {}.",
            class.student_name,
            describe_status(class.status, class.payment_date)
        ));
    }
    Ok(())
}

fn cmd_transactions(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "transactions <month> <expense|income>";
    let month = month_arg(args, 0, USAGE)?;
    let kind = parse_kind(require_arg(args, 1, USAGE)?).map_err(invalid)?;
    let state = context.manager.state();
    let Some(record) = state.month(month) else {
        return Err(invalid(format!("month {} is not in the books", month + 1)));
    };
    let entries = record.transactions(kind);
    if entries.is_empty() {
        output::info(format!("No {kind} entries in {}.", context.describe_month(month)));
        return Ok(());
    }
    output::section(format!("{} {kind} entries", context.describe_month(month)));
    for entry in entries {
        output::line(format!(
            "  {:<15} {:<24} {:>10}  {:<16} {:<12} {}",
            entry.id.to_string(),
            entry.description,
            format_clp(entry.amount),
            category_label(state, entry.category_id),
            payment_method_label(state, entry.payment_method_id),
            status_label(entry.status)
        ));
    }
    Ok(())
}

fn cmd_add_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = month_arg(args, 0, ADD_TRANSACTION_USAGE)?;
    let kind = parse_kind(require_arg(args, 1, ADD_TRANSACTION_USAGE)?).map_err(invalid)?;
    let description = require_arg(args, 2, ADD_TRANSACTION_USAGE)?.trim();
    let amount = parse_amount(require_arg(args, 3, ADD_TRANSACTION_USAGE)?).map_err(invalid)?;

    let mut transaction = NewTransaction::new(description, amount, context.manager.today());
    if args.len() > 4 {
        let category = id_arg(args, 4, ADD_TRANSACTION_USAGE)?;
        if context.manager.state().category(category).is_none() {
            output::warning(format!("Category {category} does not exist; it will show as `Otros`."));
        }
        transaction.category_id = Some(category);
    }

    match context.manager.add_transaction(month, kind, transaction)? {
        Some(id) => output::success(format!(
            "Recorded {description} ({}) with id {id}.",
            format_clp(amount)
        )),
        None => context.report_unchanged("that month is not in the books"),
    }
    Ok(())
}

fn cmd_toggle_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "toggle-transaction <month> <expense|income> <id> [YYYY-MM-DD]";
    let month = month_arg(args, 0, USAGE)?;
    let kind = parse_kind(require_arg(args, 1, USAGE)?).map_err(invalid)?;
    let id = id_arg(args, 2, USAGE)?;
    let date = args.get(3).map(|raw| parse_date(raw)).transpose().map_err(invalid)?;

    if !context.manager.toggle_transaction_status(month, kind, id, date)? {
        return Err(invalid(format!("no {kind} {id} in {}", context.describe_month(month))));
    }
    let toggled = context
        .manager
        .state()
        .month(month)
        .and_then(|record| record.transactions(kind).iter().find(|entry| entry.id == id));
    if let Some(entry) = toggled {
        output::success(format!(
            "{} is now {}.",
            entry.description,
            describe_status(entry.status, entry.payment_date)
        ));
    }
    Ok(())
}

fn cmd_copy_previous(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "copy-previous <month> <expense|income>";
    let month = month_arg(args, 0, USAGE)?;
    let kind = parse_kind(require_arg(args, 1, USAGE)?).map_err(invalid)?;
    if month == 0 {
        return Err(invalid("the first month has no previous month to copy from"));
    }

    let copied = context.manager.import_from_previous_month(month, kind)?;
    if copied == 0 {
        output::info("Nothing new to copy from the previous month.");
    } else {
        output::success(format!(
            "Copied {copied} {kind} entr{} into {}.",
            if copied == 1 { "y" } else { "ies" },
            context.describe_month(month)
        ));
    }
    Ok(())
}

fn cmd_new_year(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let confirmed = args.first().is_some_and(|arg| *arg == "--yes");
    if context.mode() == CliMode::Interactive && !confirmed {
        output::warning("This empties every month and clears the schedule.");
        output::hint("Run `export` first, then `new-year --yes` to continue.");
        return Ok(());
    }
    context.manager.start_new_year()?;
    output::success("Started a new year of records. Use `undo` to go back.");
    Ok(())
}

fn status_label(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "Pendiente",
        PaymentStatus::Paid => "Al día",
    }
}

fn describe_status(status: PaymentStatus, paid_on: Option<NaiveDate>) -> String {
    match (status, paid_on) {
        (PaymentStatus::Paid, Some(date)) => format!("paid on {date}"),
        (PaymentStatus::Paid, None) => "paid".to_string(),
        (PaymentStatus::Pending, _) => "pending".to_string(),
    }
}
