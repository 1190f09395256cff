//! Pure formatting functions for UI output.
//!
//! All terminal styling lives here; the replay logger and the binary call
//! into these helpers rather than printing directly.

use console::style;

use super::logger::{LogEntry, LogLevel};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Render a single log entry as one line (without trailing newline).
///
/// The category is right-aligned in a fixed-width column so that a run's
/// lines read as a table.
pub fn format_entry(entry: &LogEntry) -> String {
    let category = format!("{:>10}", entry.category);
    let category = match entry.level {
        LogLevel::Info => style(category).cyan(),
        LogLevel::Error => style(category).red(),
        LogLevel::Success => style(category).green(),
    };
    format!("{} {}", category, entry.message)
}

/// Print a live log entry as it is recorded.
pub fn display_entry(entry: &LogEntry) {
    match entry.level {
        LogLevel::Error => eprintln!("{}", format_entry(entry)),
        _ => println!("{}", format_entry(entry)),
    }
}

/// Display the summary of a finished run.
///
/// # Arguments
/// * `entries` - Recorded entries, oldest first
pub fn display_summary(entries: &[LogEntry]) {
    println!("\n{}", style("Summary").bold().underlined());
    let errors = entries
        .iter()
        .filter(|e| e.level == LogLevel::Error)
        .count();
    for entry in entries {
        println!("  {}", format_entry(entry));
    }
    println!(
        "  {} lines recorded, {} errors",
        entries.len(),
        errors
    );
}
