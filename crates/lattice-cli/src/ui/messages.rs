//! Status message functions for terminal output.

use owo_colors::OwoColorize;

use super::colors_enabled;

/// Print a success message to stderr.
///
/// ```no_run
/// use lattice_cli::ui::success;
///
/// success("No violations");
/// ```
pub fn success(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "✓".green().bold(), message);
    } else {
        eprintln!("✓ {message}");
    }
}

pub fn info(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "ℹ".blue().bold(), message);
    } else {
        eprintln!("ℹ {message}");
    }
}

pub fn warning(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    } else {
        eprintln!("⚠ {message}");
    }
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    } else {
        eprintln!("✗ {message}");
    }
}
