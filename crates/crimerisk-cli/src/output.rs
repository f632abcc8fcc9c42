//! Output formatting utilities for the one-shot commands.

use colored::Colorize;
use crimerisk::form::Notice;

/// Print a section header
pub(crate) fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").cyan().bold());
}

/// Print a key-value pair
pub(crate) fn kv(key: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", key.white().bold(), value);
}

/// Print a list item
pub(crate) fn item(value: &str) {
    println!("  - {value}");
}

/// Print a warning message
pub(crate) fn warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// Tag shown in front of a notice.
pub(crate) fn notice_tag(notice: &Notice) -> &'static str {
    match notice {
        Notice::HighRisk => "[HIGH]",
        Notice::LowRisk => "[LOW]",
        Notice::Error(_) => "[FAIL]",
    }
}

/// Print a prediction notice
pub(crate) fn notice(notice: &Notice) {
    let tag = notice_tag(notice);
    let tag = match notice {
        Notice::HighRisk => tag.red().bold(),
        Notice::LowRisk => tag.green().bold(),
        Notice::Error(_) => tag.red().bold(),
    };
    println!("{} {}", tag, notice.message());
}
