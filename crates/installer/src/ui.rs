//! UI helpers for the installer CLI.
//!
//! Provides consistent formatting for console output during installation.

use colored::Colorize;

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", "═".repeat(70).bright_black());
    println!("{}", title.cyan().bold());
    println!("{}", "═".repeat(70).bright_black());
    println!();
}

/// Print a step indicator with step number.
pub fn print_step(current: usize, total: usize, message: &str) {
    println!(
        "{} {} {}",
        format!("[{current}/{total}]").bright_black(),
        "▶".cyan(),
        message.bold()
    );
}

/// Print installation progress.
pub fn print_progress(message: &str) {
    println!("  {} {}", "→".cyan(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!();
    println!("{} {}", "✓".green().bold(), message.green());
    println!();
}

/// Print a prerequisite check result.
pub fn print_check_result(name: &str, passed: bool) {
    let status = if passed { "✓".green() } else { "✗".red() };
    println!("  {status} {name}");
}
