//! Parsing and display helpers shared by the commands.

use absa_domain::{seed::MONTH_NAMES, ClassDuration, TransactionKind};
use chrono::NaiveDate;

/// Formats an amount as whole pesos with `.` thousands separators: `$140.000`.
pub fn format_clp(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Accepts `1`-`12` or a Spanish month name (accents and case ignored).
/// Returns the zero-based month index.
pub fn parse_month(input: &str) -> Result<usize, String> {
    let trimmed = input.trim();
    if let Ok(number) = trimmed.parse::<usize>() {
        return if (1..=MONTH_NAMES.len()).contains(&number) {
            Ok(number - 1)
        } else {
            Err(format!("month must be between 1 and 12, got {number}"))
        };
    }
    let needle = fold(trimmed);
    MONTH_NAMES
        .iter()
        .position(|name| fold(name) == needle)
        .ok_or_else(|| format!("unknown month `{trimmed}`"))
}

pub fn month_name(index: usize) -> &'static str {
    MONTH_NAMES.get(index).copied().unwrap_or("?")
}

pub fn parse_kind(input: &str) -> Result<TransactionKind, String> {
    match fold(input).as_str() {
        "expense" | "expenses" | "gasto" | "gastos" => Ok(TransactionKind::Expense),
        "income" | "incomes" | "ingreso" | "ingresos" => Ok(TransactionKind::Income),
        other => Err(format!("expected `expense` or `income`, got `{other}`")),
    }
}

/// Accepts minutes (`20`, `30`, `45`, `60`) or a stored label such as `1 hora`.
pub fn parse_duration(input: &str) -> Result<ClassDuration, String> {
    let trimmed = input.trim();
    let minutes = trimmed
        .trim_end_matches("min")
        .trim()
        .parse::<u32>()
        .ok();
    ClassDuration::ALL
        .into_iter()
        .find(|duration| {
            Some(duration.minutes()) == minutes || fold(duration.label()) == fold(trimmed)
        })
        .ok_or_else(|| format!("unknown class duration `{trimmed}`"))
}

pub fn parse_amount(input: &str) -> Result<f64, String> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|ch| *ch != '.')
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or_else(|| format!("invalid amount `{input}`"))
}

pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date `{input}`, expected YYYY-MM-DD"))
}

fn fold(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|ch| match ch {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other,
        })
        .collect()
}
