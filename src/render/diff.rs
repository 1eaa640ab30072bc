//! Raw diff helpers shared by the renderers
//!
//! The parser keeps the raw plan text; these helpers cut a single
//! resource's lines back out of it and mark them up for HTML display.

use lazy_static::lazy_static;
use regex::Regex;

use crate::plan::{address, resolve_address};

/// Phrases that appear on a resource's header line next to its address
pub const HEADER_KEYWORDS: [&str; 3] = ["will be", "must be", "has moved to"];
const REPLACE_OPERATORS: [&str; 2] = ["-/+", "+/-"];

lazy_static! {
    static ref COLOR_RULES: Vec<(Regex, &'static str)> = vec![
        (rule(r"(?m)^([ \t]*-/\+[ \t])"), r#"<span class="tf-replace">${1}</span>"#),
        (rule(r"(?m)^([ \t]*\+/-[ \t])"), r#"<span class="tf-replace">${1}</span>"#),
        (rule(r"(?m)^([ \t]*\+[ \t])"), r#"<span class="tf-add">${1}</span>"#),
        (rule(r"(?m)^([ \t]*-[ \t])"), r#"<span class="tf-delete">${1}</span>"#),
        (rule(r"(?m)^([ \t]*~[ \t])"), r#"<span class="tf-change">${1}</span>"#),
        (rule(r"\(sensitive value\)"), r#"<span class="tf-sensitive">(sensitive value)</span>"#),
        (rule(r"\(known after apply\)"), r#"<span class="tf-computed">(known after apply)</span>"#),
        (rule(r"&lt;computed&gt;"), r#"<span class="tf-computed">&lt;computed&gt;</span>"#),
    ];

    static ref FORCES_RULE: Regex = rule(r"(# forces replacement)");
}

fn rule(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid colorize regex")
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Whether `line` is the header line of the resource at `address`. The
/// address must directly follow `# ` so that a root resource is never
/// matched by a module resource ending in the same address.
fn is_header_for(line: &str, address: &str) -> bool {
    let Some(rest) = line.trim().strip_prefix("# ") else {
        return false;
    };

    if let Some(after) = rest.strip_prefix(address) {
        if after.starts_with(' ')
            && (HEADER_KEYWORDS.iter().any(|kw| after.contains(kw))
                || REPLACE_OPERATORS.iter().any(|op| after.contains(op)))
        {
            return true;
        }
    }

    rest.trim_end().ends_with(&format!(" has moved to {}", address))
}

/// Whether `line` starts any resource's block
fn is_any_header(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('#')
        && (HEADER_KEYWORDS.iter().any(|kw| trimmed.contains(kw))
            || REPLACE_OPERATORS.iter().any(|op| trimmed.contains(op)))
}

/// Cut the raw lines of one resource out of the plan: its header and
/// everything up to the next header or the `Plan:` line. Empty when the
/// address has no header in the text.
pub fn extract_resource_diff(raw_plan: &str, address: &str) -> String {
    let lines: Vec<&str> = raw_plan.lines().collect();

    let Some(start) = lines.iter().position(|line| is_header_for(line, address)) else {
        return String::new();
    };

    let mut end = start + 1;
    while end < lines.len() {
        let line = lines[end];
        if is_any_header(line) || line.trim().starts_with("Plan:") {
            break;
        }
        end += 1;
    }

    let mut block = &lines[start..end];
    while let [rest @ .., last] = block {
        if !last.trim().is_empty() {
            break;
        }
        block = rest;
    }

    block.join("\n")
}

/// HTML-escape plan text and wrap operators and markers in `tf-*` spans
pub fn colorize(text: &str, highlight_forces: bool) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut html = html_escape(text);
    for (pattern, replacement) in COLOR_RULES.iter() {
        html = pattern.replace_all(&html, *replacement).into_owned();
    }

    if highlight_forces {
        html = FORCES_RULE
            .replace_all(&html, r#"<span class="tf-forces-replacement">${1}</span>"#)
            .into_owned();
    }

    html
}

/// Escape an address and emphasise its resource type
pub fn highlight_resource_type(resource_address: &str) -> String {
    let escaped = html_escape(resource_address);
    let (resource_type, _) = resolve_address(resource_address);
    let leaf = resource_type.trim_start_matches("data.");

    if leaf.is_empty() || address::strip_indices(resource_address) == leaf {
        return escaped;
    }

    let needle = format!("{}.", html_escape(leaf));
    match escaped.find(&needle) {
        Some(pos) => format!(
            "{}<span class=\"resource-type-bold\">{}</span>{}",
            &escaped[..pos],
            &escaped[pos..pos + needle.len() - 1],
            &escaped[pos + needle.len() - 1..]
        ),
        None => escaped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = r#"Terraform will perform the following actions:

  # aws_instance.web will be created
  + resource "aws_instance" "web" {
      + ami      = "ami-1"
      + password = (sensitive value)
    }

  # aws_instance.web_backup will be destroyed
  - resource "aws_instance" "web_backup" {
      - ami = "ami-0" -> null
    }

  # aws_s3_bucket.a has moved to aws_s3_bucket.b
    resource "aws_s3_bucket" "b" {
        id = "logs"
    }

Plan: 1 to add, 0 to change, 1 to destroy.
"#;

    #[test]
    fn test_extract_stops_at_next_header() {
        let diff = extract_resource_diff(PLAN, "aws_instance.web");
        assert!(diff.starts_with("  # aws_instance.web will be created"));
        assert!(diff.contains("(sensitive value)"));
        assert!(!diff.contains("web_backup"));
        assert!(diff.ends_with("    }"));
    }

    #[test]
    fn test_extract_prefix_address_is_not_confused() {
        let diff = extract_resource_diff(PLAN, "aws_instance.web_backup");
        assert!(diff.starts_with("  # aws_instance.web_backup will be destroyed"));
        assert!(diff.contains("\"ami-0\" -> null"));
    }

    #[test]
    fn test_extract_moved_and_last_block() {
        let diff = extract_resource_diff(PLAN, "aws_s3_bucket.b");
        assert!(diff.starts_with("  # aws_s3_bucket.a has moved to aws_s3_bucket.b"));
        assert!(!diff.contains("Plan:"));
    }

    #[test]
    fn test_extract_root_address_skips_module_block() {
        let plan = r#"
  # module.app.aws_instance.web will be created
  + resource "aws_instance" "web" {
      + ami = "ami-module"
    }

  # aws_instance.web will be created
  + resource "aws_instance" "web" {
      + ami = "ami-root"
    }

  # aws_instance.db is tainted, so must be replaced
-/+ resource "aws_instance" "db" {
      ~ id = "i-1" -> (known after apply)
    }
"#;

        let root = extract_resource_diff(plan, "aws_instance.web");
        assert!(root.starts_with("  # aws_instance.web will be created"));
        assert!(root.contains("ami-root"));
        assert!(!root.contains("ami-module"));

        let module = extract_resource_diff(plan, "module.app.aws_instance.web");
        assert!(module.contains("ami-module"));
        assert!(!module.contains("ami-root"));

        let tainted = extract_resource_diff(plan, "aws_instance.db");
        assert!(tainted.starts_with("  # aws_instance.db is tainted, so must be replaced"));
    }

    #[test]
    fn test_extract_unknown_address() {
        assert_eq!(extract_resource_diff(PLAN, "aws_vpc.main"), "");
    }

    #[test]
    fn test_colorize_operators_and_markers() {
        let html = colorize(
            "  + ami = (known after apply)\n  - old = 1\n  ~ tag = 2\n-/+ resource\n  + x = <computed>",
            false,
        );
        assert!(html.contains(r#"<span class="tf-add">  + </span>"#));
        assert!(html.contains(r#"<span class="tf-delete">  - </span>"#));
        assert!(html.contains(r#"<span class="tf-change">  ~ </span>"#));
        assert!(html.contains(r#"<span class="tf-replace">-/+ </span>"#));
        assert!(html.contains(r#"<span class="tf-computed">(known after apply)</span>"#));
        assert!(html.contains(r#"<span class="tf-computed">&lt;computed&gt;</span>"#));
    }

    #[test]
    fn test_colorize_forces_replacement_optional() {
        let line = "  ~ ami = \"a\" -> \"b\" # forces replacement";
        assert!(colorize(line, true).contains("tf-forces-replacement"));
        assert!(!colorize(line, false).contains("tf-forces-replacement"));
    }

    #[test]
    fn test_colorize_escapes_html() {
        let html = colorize("<script>alert('x')</script>", false);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert_eq!(colorize("", true), "");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"test\""), "&quot;test&quot;");
    }

    #[test]
    fn test_highlight_resource_type() {
        assert_eq!(
            highlight_resource_type("module.vpc.aws_subnet.public[0]"),
            r#"module.vpc.<span class="resource-type-bold">aws_subnet</span>.public[0]"#
        );
        assert_eq!(
            highlight_resource_type(r#"aws_iam_user.u["bob"]"#),
            r#"<span class="resource-type-bold">aws_iam_user</span>.u[&quot;bob&quot;]"#
        );
        assert_eq!(highlight_resource_type("standalone"), "standalone");
    }
}
