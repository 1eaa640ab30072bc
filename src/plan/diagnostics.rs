//! Diagnostic block scanner
//!
//! Terraform draws errors and warnings inside a box:
//!
//! ```text
//! ╷
//! │ Error: Invalid provider configuration
//! │
//! │   on main.tf line 12, in provider "aws":
//! │   12: provider "aws" {
//! ╵
//! ```
//!
//! The scanner pulls every such block out of the plan text.

use log::trace;

use super::types::Diagnostic;

pub const BLOCK_START: char = '╷';
pub const BLOCK_END: char = '╵';
pub const BLOCK_SIDE: char = '│';

/// Titles longer than this are cut and suffixed with an ellipsis
pub const MAX_TITLE_CHARS: usize = 300;

const ERROR_PREFIX: &str = "Error:";
const WARNING_PREFIX: &str = "Warning:";

/// Scan all lines and return every diagnostic block, in order
pub fn scan_diagnostics(lines: &[&str]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if is_marker(lines[i], BLOCK_START) {
            let (diagnostic, next) = parse_block(lines, i + 1);
            if let Some(diagnostic) = diagnostic {
                trace!("diagnostic block at line {}: {}", i + 1, diagnostic.title);
                diagnostics.push(diagnostic);
            }
            i = next;
        } else {
            i += 1;
        }
    }

    diagnostics
}

fn is_marker(line: &str, marker: char) -> bool {
    let mut chars = line.trim().chars();
    chars.next() == Some(marker) && chars.next().is_none()
}

/// Strip the box side character and surrounding whitespace
fn clean_line(line: &str) -> &str {
    line.trim_start_matches(|c: char| c == BLOCK_SIDE || c.is_whitespace())
        .trim_end()
}

/// Parse one block body starting at `start`. Returns the diagnostic (if the
/// body had any content) and the index just past the end marker, or the end
/// of input when the block was never closed.
fn parse_block(lines: &[&str], start: usize) -> (Option<Diagnostic>, usize) {
    let mut body = Vec::new();
    let mut i = start;

    while i < lines.len() {
        if is_marker(lines[i], BLOCK_END) {
            break;
        }
        let cleaned = clean_line(lines[i]);
        if !cleaned.is_empty() {
            body.push(cleaned);
        }
        i += 1;
    }

    let next = (i + 1).min(lines.len());

    if body.is_empty() {
        return (None, next);
    }

    (Some(build_diagnostic(&body)), next)
}

fn build_diagnostic(body: &[&str]) -> Diagnostic {
    let title_line = body
        .iter()
        .find(|line| line.starts_with(ERROR_PREFIX) || line.starts_with(WARNING_PREFIX));

    let (title, is_warning) = match title_line {
        Some(line) => (truncate_title(line), line.starts_with(WARNING_PREFIX)),
        None => ("Terraform Error".to_string(), false),
    };

    let (file_path, line_number) = find_location(body);

    Diagnostic {
        title,
        message: body.join("\n"),
        file_path,
        line_number,
        is_warning,
    }
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() > MAX_TITLE_CHARS {
        let cut: String = title.chars().take(MAX_TITLE_CHARS).collect();
        format!("{}...", cut)
    } else {
        title.to_string()
    }
}

/// Find `on <file> line <n>,` in the first line that looks like a location
fn find_location(body: &[&str]) -> (Option<String>, Option<u32>) {
    let Some(line) = body
        .iter()
        .find(|line| line.contains("on ") && line.contains(" line "))
    else {
        return (None, None);
    };

    let tokens: Vec<&str> = line.split_whitespace().collect();

    let Some(on_idx) = tokens.iter().position(|t| *t == "on") else {
        return (None, None);
    };

    let file_path = tokens
        .get(on_idx + 1)
        .map(|t| t.trim_end_matches(',').to_string())
        .filter(|t| !t.is_empty());

    let line_number = tokens
        .iter()
        .skip(on_idx + 1)
        .position(|t| *t == "line")
        .and_then(|offset| tokens.get(on_idx + 1 + offset + 1))
        .and_then(|t| t.trim_end_matches(',').parse::<u32>().ok());

    (file_path, line_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<Diagnostic> {
        let lines: Vec<&str> = text.lines().collect();
        scan_diagnostics(&lines)
    }

    #[test]
    fn test_error_block_with_location() {
        let text = "\
╷
│ Error: Invalid provider configuration
│
│   on main.tf line 12, in provider \"aws\":
│   12: provider \"aws\" {
│
│ The argument \"region\" is required.
╵
";
        let diagnostics = scan(text);
        assert_eq!(diagnostics.len(), 1);

        let diag = &diagnostics[0];
        assert_eq!(diag.title, "Error: Invalid provider configuration");
        assert!(!diag.is_warning);
        assert_eq!(diag.file_path, Some("main.tf".to_string()));
        assert_eq!(diag.line_number, Some(12));
        assert_eq!(
            diag.message,
            "Error: Invalid provider configuration\n\
             on main.tf line 12, in provider \"aws\":\n\
             12: provider \"aws\" {\n\
             The argument \"region\" is required."
        );
    }

    #[test]
    fn test_warning_block() {
        let text = "╷\n│ Warning: Deprecated attribute\n│ \n│ Use something else.\n╵";
        let diagnostics = scan(text);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_warning);
        assert_eq!(diagnostics[0].title, "Warning: Deprecated attribute");
        assert_eq!(diagnostics[0].file_path, None);
    }

    #[test]
    fn test_block_without_title_gets_generic_title() {
        let diagnostics = scan("╷\n│ something odd happened\n╵\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].title, "Terraform Error");
        assert_eq!(diagnostics[0].message, "something odd happened");
    }

    #[test]
    fn test_empty_block_is_skipped() {
        assert!(scan("╷\n│\n│   \n╵\n").is_empty());
        assert!(scan("╷\n╵\n").is_empty());
    }

    #[test]
    fn test_unclosed_block_ends_at_input_end() {
        let diagnostics = scan("╷\n│ Error: Cycle: a, b\n│ more text");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].title, "Error: Cycle: a, b");
        assert_eq!(diagnostics[0].message, "Error: Cycle: a, b\nmore text");
    }

    #[test]
    fn test_multiple_blocks() {
        let text = "╷\n│ Warning: first\n╵\nplain text\n╷\n│ Error: second\n╵\n";
        let diagnostics = scan(text);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].is_warning);
        assert!(!diagnostics[1].is_warning);
    }

    #[test]
    fn test_long_title_is_truncated() {
        let long = format!("Error: {}", "x".repeat(400));
        let text = format!("╷\n│ {}\n╵", long);
        let diagnostics = scan(&text);

        let title = &diagnostics[0].title;
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS + 3);
        // the message keeps the full line
        assert!(diagnostics[0].message.contains(&long));
    }

    #[test]
    fn test_unparseable_line_number_is_tolerated() {
        let text = "╷\n│ Error: x\n│   on modules/net/main.tf line twelve, in resource\n╵";
        let diagnostics = scan(text);
        assert_eq!(diagnostics[0].file_path, Some("modules/net/main.tf".to_string()));
        assert_eq!(diagnostics[0].line_number, None);
    }

    #[test]
    fn test_markers_must_stand_alone() {
        assert!(scan("╷ not a marker\n│ Error: x\n╵").is_empty());
    }
}
