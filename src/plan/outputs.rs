//! Output-change scanner
//!
//! Reads the `Outputs:` / `Changes to Outputs:` section of a plan:
//!
//! ```text
//! Changes to Outputs:
//!   + instance_ip = (known after apply)
//!   ~ db_password = (sensitive value)
//!   ~ region      = "us-east-1" -> "eu-west-1"
//! ```

use super::types::OutputChange;

pub const SENSITIVE_MARKER: &str = "(sensitive value)";
pub const REDACTED: &str = "(sensitive)";

const DIVIDER: char = '─';

/// Whether a line opens an output section
pub fn is_output_marker(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("Outputs:") || trimmed.starts_with("Changes to Outputs:")
}

/// Scan output lines starting at `start` (the line after the marker).
///
/// Stops at a divider, at two consecutive blank lines, or, once something
/// was read, at a blank line followed by a non-indented line. Returns the
/// outputs and the index of the first line not consumed.
pub fn scan_outputs(lines: &[&str], start: usize) -> (Vec<OutputChange>, usize) {
    let mut outputs = Vec::new();
    let mut previous_blank = false;
    let mut depth: usize = 0;
    let mut i = start;

    while i < lines.len() {
        let trimmed = lines[i].trim();

        if trimmed.starts_with(DIVIDER) {
            break;
        }

        if trimmed.is_empty() {
            if previous_blank {
                break;
            }
            if !outputs.is_empty() && starts_new_section(lines.get(i + 1)) {
                break;
            }
            previous_blank = true;
            i += 1;
            continue;
        }
        previous_blank = false;

        if depth > 0 {
            // Inside a multi-line list/map value
            if trimmed.starts_with(['}', ']', ')']) {
                depth -= 1;
            }
            if trimmed.ends_with(['{', '[', '(']) {
                depth += 1;
            }
            i += 1;
            continue;
        }

        if let Some(output) = parse_output_line(trimmed) {
            if output
                .new_value
                .as_deref()
                .is_some_and(|v| v.ends_with(['{', '[', '(']))
            {
                depth = 1;
            }
            outputs.push(output);
        }

        i += 1;
    }

    (outputs, i)
}

fn starts_new_section(next: Option<&&str>) -> bool {
    match next {
        Some(line) => !line.trim().is_empty() && !line.starts_with(char::is_whitespace),
        None => false,
    }
}

/// Parse `[op] name = value [-> new]`
fn parse_output_line(line: &str) -> Option<OutputChange> {
    let (name, value) = line.split_once('=')?;

    let name = name.trim().trim_start_matches(['+', '-', '~']).trim();
    if name.is_empty() {
        return None;
    }

    let value = value.trim();
    let is_sensitive = value.contains(SENSITIVE_MARKER);

    if is_sensitive {
        return Some(OutputChange {
            name: name.to_string(),
            old_value: None,
            new_value: Some(REDACTED.to_string()),
            is_sensitive,
        });
    }

    let (old_value, new_value) = match value.split_once(" -> ") {
        Some((old, new)) => (Some(old.trim().to_string()), Some(new.trim().to_string())),
        None => (None, Some(value.to_string())),
    };

    Some(OutputChange {
        name: name.to_string(),
        old_value,
        new_value,
        is_sensitive,
    })
}
