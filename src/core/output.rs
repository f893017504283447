//! Unified output formatting utilities for consistent CLI presentation.
//!
//! Errors go to standard error, everything else to standard output.
//!
//! # Design Principles
//! - **Consistent color scheme**: Red for errors, green for success, yellow for warnings
//! - **Command-prefixed errors**: Every error names the failing command
//! - **Tabular listings**: Stash rows are aligned on the branch name column

use crate::core::inventory::BranchAgeRecord;
use colored::*;

/// Formats and prints an error message for a failing command
///
/// # Format
/// ```text
/// ✕ Error during <command> operation: <message>
/// ```
pub fn print_error(command: &str, message: &str) {
    eprintln!(
        "{} {}",
        format!("✕ Error during {command} operation:").red(),
        message
    );
}

/// Formats and prints a success message with consistent styling
///
/// # Format
/// ```text
/// ✓ <message>
/// ```
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Formats and prints a warning without failing the command
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "!".yellow(), message.yellow());
}

pub fn print_info(message: &str) {
    println!("{message}");
}

pub fn print_section_header(header: &str) {
    println!("{}", header.white().bold());
    println!("{}", "-".repeat(header.chars().count()).bright_black());
}

/// One aligned row per stash: name, age, author and commit subject
pub fn format_stash_row(record: &BranchAgeRecord) -> String {
    format!(
        "{:<30} - {:<12} - {:<20} - {}",
        record.branch_name,
        record.age.to_string(),
        record.author_name,
        record.commit_message
    )
}

pub fn print_stash_rows(records: &[BranchAgeRecord]) {
    for record in records {
        println!("{}", format_stash_row(record));
    }
}
