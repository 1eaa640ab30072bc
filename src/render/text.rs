//! Plain-text renderer for terminal output

use super::PlanRenderer;
use crate::config::RenderOptions;
use crate::error::ReviewError;
use crate::plan::{AttributeChange, ChangeKind, PlanSummary, ResourceChange};

/// Values longer than this are cut with an ellipsis
const MAX_VALUE_WIDTH: usize = 60;

/// Renders a parsed plan as indented plain text
#[derive(Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render summary section
    fn render_summary(&self, plan: &PlanSummary) -> String {
        let mut output = String::from("Plan Summary:\n");

        let mut parts = Vec::new();

        if plan.to_add > 0 {
            parts.push(format!("+{} to add", plan.to_add));
        }

        if plan.to_change > 0 {
            parts.push(format!("~{} to change", plan.to_change));
        }

        if plan.to_replace > 0 {
            parts.push(format!("-/+{} to replace", plan.to_replace));
        }

        if plan.to_destroy > 0 {
            parts.push(format!("-{} to destroy", plan.to_destroy));
        }

        let moved = plan.resources_of_kind(ChangeKind::Moved).count();
        if moved > 0 {
            parts.push(format!("{} moved", moved));
        }

        if parts.is_empty() {
            output.push_str("  No changes.\n");
        } else {
            output.push_str(&format!("  {}\n", parts.join(", ")));
        }

        output.push('\n');
        output
    }

    /// Render a single resource change
    fn render_resource(&self, resource: &ResourceChange, options: &RenderOptions) -> String {
        let kind = resource.change_kind;
        let detail = match (&resource.moved_from, kind) {
            (Some(from), ChangeKind::Moved) => format!("moved from {}", from),
            _ => kind.label().to_string(),
        };

        let mut output = format!("{} {} ({})\n", kind.symbol(), resource.resource_address, detail);

        for attr in &resource.attributes_added {
            if !resource.attributes_deleted.contains(attr) {
                output.push_str(&self.render_attribute("+", attr, options));
            }
        }
        for attr in &resource.attributes_changed {
            output.push_str(&self.render_attribute("~", attr, options));
        }
        for attr in &resource.attributes_deleted {
            let op = if resource.attributes_added.contains(attr) {
                "-/+"
            } else {
                "-"
            };
            output.push_str(&self.render_attribute(op, attr, options));
        }

        output
    }

    /// Render a single attribute change
    fn render_attribute(&self, op: &str, attr: &AttributeChange, options: &RenderOptions) -> String {
        let mut line = format!("    {} {}", op, attr.name);

        let old = attr.old_value.as_deref().map(|v| format_value(v, attr, options));
        let new = attr.new_value.as_deref().map(|v| format_value(v, attr, options));

        match (old, new) {
            (Some(old), Some(new)) => line.push_str(&format!(" = {} -> {}", old, new)),
            (Some(value), None) | (None, Some(value)) => {
                line.push_str(&format!(" = {}", value))
            }
            (None, None) => {}
        }

        if attr.forces_replacement {
            line.push_str(" # forces replacement");
        }

        line.push('\n');
        line
    }
}

/// Format a value for display
fn format_value(value: &str, attr: &AttributeChange, options: &RenderOptions) -> String {
    if attr.is_sensitive && !options.show_sensitive {
        return "(sensitive)".to_string();
    }

    truncate_str(value, MAX_VALUE_WIDTH)
}

/// Truncate to `max_len` characters, ending with "..." when cut
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max_len).collect()
    }
}

impl PlanRenderer for TextRenderer {
    fn render(&self, plan: &PlanSummary, options: &RenderOptions) -> Result<String, ReviewError> {
        if plan.has_errors {
            return Err(ReviewError::PlanHasErrors(plan.errors.len()));
        }

        let mut output = self.render_summary(plan);

        for resource in &plan.resource_changes {
            output.push_str(&self.render_resource(resource, options));
        }

        if !plan.output_changes.is_empty() {
            output.push_str("\nOutputs:\n");
            for change in &plan.output_changes {
                let value = match (&change.old_value, &change.new_value) {
                    (Some(old), Some(new)) => format!("{} -> {}", old, new),
                    (None, Some(new)) => new.clone(),
                    (Some(old), None) => old.clone(),
                    (None, None) => String::new(),
                };
                output.push_str(&format!("  {} = {}\n", change.name, value));
            }
        }

        if !plan.warnings.is_empty() {
            output.push_str("\nWarnings:\n");
            for warning in &plan.warnings {
                output.push_str(&format!("  {}\n", warning.title));
            }
        }

        Ok(output)
    }
}
