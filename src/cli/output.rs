//! Shared CLI output helpers.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, checkmarks
//! - Red: errors
//! - Cyan: keys, hints
//! - Dimmed: secondary info

use std::fmt::Display;

use console::style;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ wrote app/db_password`
pub fn success(msg: &str) {
    if colors_enabled() {
        println!("{} {}", style("✓").green(), msg);
    } else {
        println!("✓ {}", msg);
    }
}

/// Print an error message to stderr (red).
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✗").red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a hint message to stderr (cyan).
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("→").cyan(), style(msg).cyan());
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Print a dimmed line.
pub fn dimmed(msg: &str) {
    if colors_enabled() {
        println!("{}", style(msg).dim());
    } else {
        println!("{}", msg);
    }
}

/// Print a key-value pair (label dimmed).
///
/// Example: `  version:  3`
pub fn kv(label: &str, value: impl Display) {
    let label = format!("{}:", label);
    if colors_enabled() {
        println!("  {} {}", style(format!("{:<10}", label)).dim(), value);
    } else {
        println!("  {:<10} {}", label, value);
    }
}

/// Print a key name in cyan followed by details.
pub fn key_line(key: &str, details: impl Display) {
    if colors_enabled() {
        println!("  {}  {}", style(key).cyan(), details);
    } else {
        println!("  {}  {}", key, details);
    }
}
