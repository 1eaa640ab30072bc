//! Styled terminal messages for the tfreview CLI
//!
//! Status messages go to stderr so that JSON and text reports written to
//! stdout stay machine-readable.

use owo_colors::OwoColorize;

use crate::plan::{ChangeKind, Diagnostic};

/// Print a success message with a green checkmark
pub fn success(message: &str) {
    // Pastel mint green: RGB(152, 225, 152)
    eprintln!(
        "{} {}",
        "✓".truecolor(152, 225, 152).bold(),
        message.bright_white()
    );
}

/// Print an error message with a red X
pub fn error(message: &str) {
    // Pastel coral/salmon: RGB(255, 160, 160)
    eprintln!(
        "{} {}",
        "✗".truecolor(255, 160, 160).bold(),
        message.bright_white()
    );
}

/// Print a warning message with a yellow warning symbol
pub fn warning(message: &str) {
    // Pastel cream/yellow: RGB(255, 230, 160)
    eprintln!(
        "{} {}",
        "⚠".truecolor(255, 230, 160).bold(),
        message.bright_white()
    );
}

/// Print a section header with a separator line
pub fn section(title: &str) {
    eprintln!("\n{}", title.truecolor(181, 174, 254).bold());
    eprintln!("{}", "─".repeat(50).truecolor(160, 160, 160));
}

/// Print a key-value pair with styled key and value
pub fn key_value(key: &str, value: &str) {
    eprintln!(
        "  {} {}",
        format!("{}:", key).truecolor(160, 160, 160),
        value.bright_white()
    );
}

/// Print a dimmed/muted line
pub fn dimmed(message: &str) {
    eprintln!("{}", message.truecolor(160, 160, 160));
}

/// Print one diagnostic: title, location and the remaining message lines
pub fn diagnostic(diag: &Diagnostic) {
    if diag.is_warning {
        warning(&diag.title);
    } else {
        error(&diag.title);
    }

    if let Some(location) = diag.location() {
        key_value("Location", &location);
    }

    for line in diag.message.lines().filter(|l| *l != diag.title) {
        dimmed(&format!("    {}", line));
    }
}

/// Print a counter line colored by change kind
pub fn change_count(kind: ChangeKind, label: &str, count: usize) {
    let (r, g, b) = kind.color();
    eprintln!(
        "  {} {}",
        format!("{:>3}", count).truecolor(r, g, b).bold(),
        label.bright_white()
    );
}
