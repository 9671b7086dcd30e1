use absa_domain::NewStudent;

use crate::cli::core::{invalid, require_arg, CommandResult, ShellContext};
use crate::cli::format::{format_clp, parse_amount, parse_duration};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

use super::id_arg;

const ADD_USAGE: &str = "add-student <name> <rate> [duration] [family]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("students", "List the student roster", "students", cmd_students),
        CommandEntry::new("add-student", "Add a student to the roster", ADD_USAGE, cmd_add_student),
        CommandEntry::new(
            "deactivate-student",
            "Stop importing a student into new months",
            "deactivate-student <id>",
            cmd_deactivate_student,
        ),
        CommandEntry::new(
            "activate-student",
            "Resume importing a student into new months",
            "activate-student <id>",
            cmd_activate_student,
        ),
    ]
}

fn cmd_students(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let roster = &context.manager.state().student_db;
    if roster.is_empty() {
        output::info("The roster is empty. Use `add-student` to add one.");
        return Ok(());
    }
    output::section("Students");
    for student in roster.iter() {
        output::line(format!(
            "  {:<15} {:<20} {:>10}  {:<7} {:<12} {}",
            student.id.to_string(),
            student.name,
            format_clp(student.default_rate),
            student.duration.label(),
            student.family.as_deref().unwrap_or("-"),
            if student.active { "active" } else { "inactive" }
        ));
    }
    Ok(())
}

fn cmd_add_student(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_arg(args, 0, ADD_USAGE)?.trim();
    if name.is_empty() {
        return Err(invalid("student name cannot be empty"));
    }
    let rate = parse_amount(require_arg(args, 1, ADD_USAGE)?).map_err(invalid)?;
    let mut student = NewStudent::new(name, rate);
    if let Some(raw) = args.get(2) {
        student = student.with_duration(parse_duration(raw).map_err(invalid)?);
    }
    if let Some(family) = args.get(3).filter(|family| !family.trim().is_empty()) {
        student = student.with_family(family.trim());
    }

    let id = context.manager.add_student(student)?;
    output::success(format!("Added {name} ({}) with id {id}.", format_clp(rate)));
    Ok(())
}

fn cmd_deactivate_student(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    set_active(context, args, false, "deactivate-student <id>")
}

fn cmd_activate_student(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    set_active(context, args, true, "activate-student <id>")
}

fn set_active(context: &mut ShellContext, args: &[&str], active: bool, usage: &str) -> CommandResult {
    let id = id_arg(args, 0, usage)?;
    if context.manager.state().student(id).is_none() {
        return Err(invalid(format!("no student with id {id}")));
    }
    if context.manager.set_student_active(id, active)? {
        let state = if active { "active" } else { "inactive" };
        output::success(format!("Student {id} is now {state}."));
    } else {
        context.report_unchanged("the student already had that state");
    }
    Ok(())
}
