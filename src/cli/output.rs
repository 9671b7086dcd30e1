//! Styled console output for the shell.

use std::fmt;

use colored::Colorize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

fn label(kind: MessageKind) -> Option<(&'static str, &'static str)> {
    match kind {
        MessageKind::Info => Some(("INFO", "[i]")),
        MessageKind::Success => Some(("OK", "[+]")),
        MessageKind::Warning => Some(("WARNING", "[!]")),
        MessageKind::Error => Some(("ERROR", "[x]")),
        MessageKind::Hint => Some(("HINT", ">")),
        MessageKind::Section => None,
    }
}

pub(crate) fn style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    let formatted = match label(kind) {
        Some((name, icon)) => format!("{name}: {icon} {text}"),
        None => format!("=== {} ===", text.trim()),
    };

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Hint => formatted.bright_cyan().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{formatted}"),
        _ => println!("{formatted}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Plain line, used for table rows.
pub fn line(message: impl fmt::Display) {
    println!("{message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_prefix_plain_messages() {
        colored::control::set_override(false);
        assert_eq!(style(MessageKind::Warning, "careful"), "WARNING: [!] careful");
        assert_eq!(style(MessageKind::Section, " Marzo "), "=== Marzo ===");
        colored::control::unset_override();
    }
}
