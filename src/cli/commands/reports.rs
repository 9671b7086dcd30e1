use absa_core::summary_service::{BandStatus, BandUsage};

use crate::cli::core::{invalid, CommandResult, ShellContext};
use crate::cli::format::{format_clp, parse_month};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

use super::month_arg;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show the annual totals, or one month's totals",
            "summary [month]",
            cmd_summary,
        ),
        CommandEntry::new(
            "budget",
            "Compare a month's spending with the 50/30/20 targets",
            "budget <month>",
            cmd_budget,
        ),
        CommandEntry::new(
            "families",
            "Show class totals grouped by family",
            "families <month>",
            cmd_families,
        ),
        CommandEntry::new(
            "warnings",
            "List records that point at missing categories, methods, or students",
            "warnings",
            cmd_warnings,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(raw) = args.first() {
        let month = parse_month(raw).map_err(invalid)?;
        let Some(summary) = context.manager.month_summary(month) else {
            return Err(invalid(format!("month {} is not in the books", month + 1)));
        };
        output::section(context.describe_month(month));
        output::line(format!("  Piano classes : {}", format_clp(summary.piano_income)));
        output::line(format!("  Other income  : {}", format_clp(summary.other_income)));
        output::line(format!("  Expenses      : {}", format_clp(summary.expenses)));
        output::line(format!("  Savings       : {}", format_clp(summary.savings)));
        output::line(format!("  Balance       : {}", format_clp(summary.balance)));
        return Ok(());
    }

    let annual = context.manager.annual_summary();
    output::section(format!("Year {}", context.manager.state().year));
    for row in &annual.months {
        output::line(format!(
            "  {:<12} {:>14} {:>14}",
            row.name,
            format_clp(row.income),
            format_clp(row.expense)
        ));
    }
    output::line(format!("  Income  : {}", format_clp(annual.total_income)));
    output::line(format!("  Expense : {}", format_clp(annual.total_expense)));
    output::line(format!("  Balance : {}", format_clp(annual.balance)));
    Ok(())
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = month_arg(args, 0, "budget <month>")?;
    let Some(breakdown) = context.manager.budget_breakdown(month) else {
        return Err(invalid(format!("month {} is not in the books", month + 1)));
    };
    output::section(format!("Budget for {}", context.describe_month(month)));
    output::line(format!("  Income: {}", format_clp(breakdown.total_income)));
    print_band("Basics (50%)", &breakdown.basics);
    print_band("Lifestyle (30%)", &breakdown.lifestyle);
    print_band("Savings (20%)", &breakdown.savings);
    for spend in &breakdown.categories {
        output::line(format!("    {:<20} {:>12}", spend.name, format_clp(spend.amount)));
    }
    Ok(())
}

fn print_band(label: &str, usage: &BandUsage) {
    let status = match usage.status() {
        BandStatus::NoTarget => "no income",
        BandStatus::OnTrack => "on track",
        BandStatus::NearLimit => "near limit",
        BandStatus::OverLimit => "over limit",
    };
    let text = format!(
        "  {:<16} {:>12} of {:>12}  {}",
        label,
        format_clp(usage.real),
        format_clp(usage.ideal),
        status
    );
    match usage.status() {
        BandStatus::OverLimit => output::warning(text),
        _ => output::line(text),
    }
}

fn cmd_families(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = month_arg(args, 0, "families <month>")?;
    let totals = context.manager.family_totals(month).unwrap_or_default();
    if totals.is_empty() {
        output::info("No classes with a family this month.");
        return Ok(());
    }
    output::section(format!("Families in {}", context.describe_month(month)));
    for family in totals {
        output::line(format!(
            "  {:<20} {:>3} class line(s) {:>12}",
            family.family,
            family.classes,
            format_clp(family.total)
        ));
    }
    Ok(())
}

fn cmd_warnings(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let warnings = context.manager.warnings();
    if warnings.is_empty() {
        output::success("No dangling references.");
    } else {
        for warning in warnings {
            output::warning(warning);
        }
    }
    Ok(())
}
