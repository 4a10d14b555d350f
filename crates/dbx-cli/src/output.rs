//! Output formatting utilities.
//!
//! Diagnostics go to stdout so a whole run can be captured in one log;
//! only the fatal error line goes to stderr.

use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::config::OutputFormat;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Prints a labelled value as compact JSON.
pub fn detail<T: Serialize + ?Sized>(label: &str, value: &T) {
    let rendered = serde_json::to_string(value).unwrap_or_else(|e| format!("<unprintable: {e}>"));
    println!("  {} {rendered}", format!("{label}:").dimmed());
}

/// Outputs data in the specified format.
pub fn output<T: Tabled + Serialize>(data: &[T], format: OutputFormat) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                info("No results found.");
            } else {
                let table = Table::new(data).with(Style::rounded()).to_string();
                println!("{table}");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Renders an optional cell, showing `-` when absent.
pub(crate) fn display_option(value: &Option<String>) -> String {
    value.as_deref().unwrap_or("-").to_string()
}
