//! Resource change block scanner
//!
//! Walks the plan line by line and turns every resource block into a
//! [`ResourceChange`]:
//!
//! ```text
//!   # aws_instance.web will be updated in-place
//!   # (moved from aws_instance.app)
//!   ~ resource "aws_instance" "web" {
//!       ~ instance_type = "t2.micro" -> "t3.micro"
//!         id            = "i-0abc"
//!     }
//! ```
//!
//! A block runs until a blank line followed by the next `  #` header or the
//! `Plan:` summary line. Output sections are handed to [`super::outputs`].

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::{Captures, Regex};

use super::classifier::classify;
use super::outputs::{SENSITIVE_MARKER, is_output_marker, scan_outputs};
use super::parser::ParserOptions;
use super::types::{AttributeChange, ChangeKind, OutputChange, ReportedCounts, ResourceChange};

pub const COMPUTED_MARKERS: [&str; 2] = ["(known after apply)", "<computed>"];
pub const FORCES_REPLACEMENT_MARKER: &str = "# forces replacement";

/// `  # aws_instance.web is tainted, so must be replaced`
const TAINTED_SUFFIX: &str = " is tainted, so";

lazy_static! {
    // Match resource declarations like:
    //   # aws_instance.example will be created
    //   # module.vpc.aws_subnet.main must be replaced
    static ref CHANGE_HEADER: Regex = Regex::new(r"^  # (.+?) ((?:will|must) be .+)$")
        .expect("Invalid change header regex");

    //   # aws_instance.a has moved to aws_instance.b
    static ref MOVED_HEADER: Regex = Regex::new(r"^  # (.+?) has moved to (.+)$")
        .expect("Invalid moved header regex");

    //   # (moved from aws_instance.a)
    static ref MOVED_FROM: Regex = Regex::new(r"\(moved from (.+?)\)")
        .expect("Invalid moved from regex");

    // + ami = "ami-12345678"
    // ~ instance_type = "t2.micro" -> "t3.micro"
    static ref ATTRIBUTE_LINE: Regex =
        Regex::new(r"^\s*([+~-])\s+(.+?)\s*=\s*(.+?)(?:\s+->\s+(.+?))?$")
            .expect("Invalid attribute regex");

    // -/+ id = "i-123" -> (known after apply)
    static ref REPLACEMENT_LINE: Regex =
        Regex::new(r"^\s*(-/\+|\+/-)\s+(.+?)\s*=\s*(.+?)(?:\s+->\s+(.+?))?$")
            .expect("Invalid replacement attribute regex");

    // Plan: 3 to add, 2 to change, 1 to destroy.
    static ref SUMMARY_LINE: Regex =
        Regex::new(r"Plan:.*?(\d+) to add, (\d+) to change, (\d+) to destroy")
            .expect("Invalid summary regex");
}

/// Everything found by one pass over the plan lines
#[derive(Debug, Default)]
pub struct ChangeSet {
    /// Resource records in plan order, moved markers included
    pub resources: Vec<ResourceChange>,
    pub outputs: Vec<OutputChange>,
    pub reported: Option<ReportedCounts>,
}

/// Scan all lines for resource blocks, moved notices and output sections
pub fn scan_changes(lines: &[&str], options: &ParserOptions) -> ChangeSet {
    let mut changes = ChangeSet::default();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim_end();

        if let Some(caps) = CHANGE_HEADER.captures(line) {
            let address = header_address(capture(&caps, 1));
            let action = capture(&caps, 2);

            let (resource, next) = parse_resource_block(lines, i, address, action);
            trace!(
                "{} ({}) at line {}",
                resource.resource_address,
                resource.change_kind.as_str(),
                i + 1
            );
            push_resource(&mut changes.resources, resource, options);
            i = next;
        } else if let Some(caps) = MOVED_HEADER.captures(line) {
            let old_address = capture(&caps, 1);
            let new_address = capture(&caps, 2);

            let (resource, next) = parse_moved_block(lines, i, old_address, new_address);
            trace!("{} moved from {}", new_address, old_address);
            push_resource(&mut changes.resources, resource, options);
            i = next;
        } else if is_output_marker(line) {
            let (outputs, next) = scan_outputs(lines, i + 1);
            changes.outputs.extend(outputs);
            i = next;
        } else {
            if let Some(caps) = SUMMARY_LINE.captures(line) {
                changes.reported = Some(parse_reported_counts(&caps));
            }
            i += 1;
        }
    }

    changes
}

/// Whether a line is a change or moved header
pub fn is_header(line: &str) -> bool {
    let line = line.trim_end();
    CHANGE_HEADER.is_match(line) || MOVED_HEADER.is_match(line)
}

/// Address from a change header, without the tainted notice
fn header_address(captured: &str) -> &str {
    captured
        .strip_suffix(TAINTED_SUFFIX)
        .unwrap_or(captured)
        .trim_end()
}

fn capture<'t>(caps: &Captures<'t>, group: usize) -> &'t str {
    caps.get(group).map(|m| m.as_str()).unwrap_or("")
}

fn push_resource(
    resources: &mut Vec<ResourceChange>,
    resource: ResourceChange,
    options: &ParserOptions,
) {
    if resource.is_data_source() && !options.include_data_sources {
        debug!("Skipping data source {}", resource.resource_address);
        return;
    }

    let marker = match (&resource.moved_from, resource.change_kind) {
        (Some(_), kind) if kind != ChangeKind::Moved => Some(resource.moved_marker()),
        _ => None,
    };

    resources.push(resource);
    if let Some(marker) = marker {
        resources.push(marker);
    }
}

/// A blank line at `index` closes the block when the next line starts a new
/// header, the summary or an output section
fn closes_block(lines: &[&str], index: usize) -> bool {
    match lines.get(index + 1) {
        Some(next) => next.starts_with("  #") || next.starts_with("Plan:") || is_output_marker(next),
        None => false,
    }
}

/// Find the end of the block whose header is at `header`. Calls `visit` for
/// every non-blank body line and returns the index of the closing line.
fn walk_block<F>(lines: &[&str], header: usize, mut visit: F) -> usize
where
    F: FnMut(&str),
{
    let mut i = header + 1;

    while i < lines.len() {
        let line = lines[i].trim_end();

        if line.trim().is_empty() {
            if closes_block(lines, i) {
                break;
            }
            i += 1;
            continue;
        }

        if is_header(line) {
            break;
        }

        visit(line);
        i += 1;
    }

    i
}

fn parse_resource_block(
    lines: &[&str],
    header: usize,
    address: &str,
    action: &str,
) -> (ResourceChange, usize) {
    let mut resource = ResourceChange::new(address, classify(action));

    let next = walk_block(lines, header, |line| {
        if let Some(caps) = MOVED_FROM.captures(line) {
            resource.moved_from = Some(capture(&caps, 1).to_string());
        }

        if let Some(caps) = REPLACEMENT_LINE.captures(line) {
            let attr = build_attribute(&caps, line);
            record_flags(&mut resource, &attr);
            resource.attributes_deleted.push(attr.clone());
            resource.attributes_added.push(attr);
        } else if let Some(caps) = ATTRIBUTE_LINE.captures(line) {
            let attr = build_attribute(&caps, line);
            record_flags(&mut resource, &attr);
            match capture(&caps, 1) {
                "+" => resource.attributes_added.push(attr),
                "-" => resource.attributes_deleted.push(attr),
                _ => resource.attributes_changed.push(attr),
            }
        }
    });

    (resource, next)
}

fn parse_moved_block(
    lines: &[&str],
    header: usize,
    old_address: &str,
    new_address: &str,
) -> (ResourceChange, usize) {
    let mut resource = ResourceChange::new(new_address, ChangeKind::Moved);
    resource.moved_from = Some(old_address.to_string());

    // Moved resources are shown unchanged; the body is skipped
    let next = walk_block(lines, header, |_| {});

    (resource, next)
}

fn record_flags(resource: &mut ResourceChange, attr: &AttributeChange) {
    resource.has_sensitive |= attr.is_sensitive;
    resource.has_computed |= attr.is_computed;
    if attr.forces_replacement {
        resource.forces_replacement.push(attr.name.clone());
    }
}

/// Build an attribute from a matched diff line. The op is group 1, name
/// group 2, value group 3 and the optional arrow target group 4.
fn build_attribute(caps: &Captures, line: &str) -> AttributeChange {
    let op = capture(caps, 1);
    let name = capture(caps, 2).trim();
    let value = strip_forces_marker(capture(caps, 3));
    let target = caps.get(4).map(|m| strip_forces_marker(m.as_str()));

    let mut attr = AttributeChange::new(name)
        .with_sensitive(line.contains(SENSITIVE_MARKER))
        .with_computed(COMPUTED_MARKERS.iter().any(|m| line.contains(m)))
        .with_forces_replacement(line.contains(FORCES_REPLACEMENT_MARKER));

    match target {
        Some(new) => {
            attr.old_value = Some(value);
            attr.new_value = Some(new);
        }
        None if op == "-" => attr.old_value = Some(value),
        None => attr.new_value = Some(value),
    }

    attr
}

fn strip_forces_marker(value: &str) -> String {
    match value.find(FORCES_REPLACEMENT_MARKER) {
        Some(pos) => value[..pos].trim().to_string(),
        None => value.trim().to_string(),
    }
}

fn parse_reported_counts(caps: &Captures) -> ReportedCounts {
    let count = |group: usize| capture(caps, group).parse().unwrap_or(0);

    ReportedCounts {
        to_add: count(1),
        to_change: count(2),
        to_destroy: count(3),
    }
}
