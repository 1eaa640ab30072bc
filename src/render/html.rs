//! HTML review page rendered through handlebars

use std::fs;

use handlebars::{Handlebars, Helper, HelperResult, Output, RenderContext};
use log::debug;
use serde_json::{Value, json};

use super::PlanRenderer;
use super::diff::{colorize, extract_resource_diff, highlight_resource_type};
use crate::config::RenderOptions;
use crate::error::ReviewError;
use crate::plan::{AttributeChange, ChangeKind, OutputChange, PlanSummary, ResourceChange};

const BUILTIN_TEMPLATE_NAME: &str = "plan_review";
const BUILTIN_TEMPLATE: &str = include_str!("../../templates/plan_review.hbs");

/// Renders a plan into a standalone HTML page
pub struct HtmlRenderer {
    handlebars: Handlebars<'static>,
}

impl HtmlRenderer {
    /// Create a renderer with the built-in template and helpers registered
    pub fn new() -> Result<Self, ReviewError> {
        let mut handlebars = Handlebars::new();

        handlebars.register_helper("kind_icon", Box::new(kind_icon_helper));
        handlebars.register_helper("kind_class", Box::new(kind_class_helper));
        handlebars.register_template_string(BUILTIN_TEMPLATE_NAME, BUILTIN_TEMPLATE)?;

        Ok(Self { handlebars })
    }

    /// Build the template context
    fn context(&self, plan: &PlanSummary, options: &RenderOptions) -> Value {
        let groups: Vec<Value> = ChangeKind::ALL
            .iter()
            .filter_map(|kind| {
                let resources: Vec<Value> = plan
                    .resources_of_kind(*kind)
                    .map(|r| resource_context(r, &plan.raw_plan, options))
                    .collect();

                if resources.is_empty() {
                    return None;
                }

                Some(json!({
                    "kind": kind.as_str(),
                    "label": kind.label(),
                    "count": resources.len(),
                    "resources": resources,
                }))
            })
            .collect();

        let outputs: Vec<Value> = plan
            .output_changes
            .iter()
            .map(|o| output_context(o, options))
            .collect();

        let warnings: Vec<Value> = plan
            .warnings
            .iter()
            .map(|w| {
                json!({
                    "title": w.title,
                    "message": w.message,
                    "location": w.location(),
                })
            })
            .collect();

        json!({
            "title": options.title,
            "has_changes": plan.has_changes,
            "counts": {
                "add": plan.to_add,
                "change": plan.to_change,
                "replace": plan.to_replace,
                "destroy": plan.to_destroy,
                "total": plan.total_changes(),
            },
            "groups": groups,
            "outputs": outputs,
            "warnings": warnings,
            "raw_plan_html": colorize(&plan.raw_plan, false),
        })
    }
}

fn resource_context(resource: &ResourceChange, raw_plan: &str, options: &RenderOptions) -> Value {
    let diff = extract_resource_diff(raw_plan, &resource.resource_address);

    let attributes: Vec<Value> = resource
        .attributes_added
        .iter()
        .map(|a| attribute_context("+", a, options))
        .chain(
            resource
                .attributes_changed
                .iter()
                .map(|a| attribute_context("~", a, options)),
        )
        .chain(
            resource
                .attributes_deleted
                .iter()
                .map(|a| attribute_context("-", a, options)),
        )
        .collect();

    json!({
        "address": resource.resource_address,
        "address_html": highlight_resource_type(&resource.resource_address),
        "resource_type": resource.resource_type,
        "resource_name": resource.resource_name,
        "kind": resource.change_kind.as_str(),
        "moved_from": resource.moved_from,
        "is_data_source": resource.is_data_source(),
        "has_sensitive": resource.has_sensitive,
        "has_computed": resource.has_computed,
        "forces_replacement": resource.forces_replacement,
        "attributes": attributes,
        "diff_html": colorize(&diff, true),
    })
}

fn attribute_context(op: &str, attr: &AttributeChange, options: &RenderOptions) -> Value {
    let hide = attr.is_sensitive && !options.show_sensitive;
    let shown = |value: &Option<String>| {
        if hide && value.is_some() {
            Some("(sensitive)".to_string())
        } else {
            value.clone()
        }
    };

    json!({
        "op": op,
        "name": attr.name,
        "old_value": shown(&attr.old_value),
        "new_value": shown(&attr.new_value),
        "is_sensitive": attr.is_sensitive,
        "is_computed": attr.is_computed,
        "forces_replacement": attr.forces_replacement,
    })
}

fn output_context(output: &OutputChange, options: &RenderOptions) -> Value {
    let hide = output.is_sensitive && !options.show_sensitive;
    let new_value = match &output.new_value {
        Some(_) if hide => Some("(sensitive)".to_string()),
        other => other.clone(),
    };

    json!({
        "name": output.name,
        "old_value": output.old_value,
        "new_value": new_value,
        "is_sensitive": output.is_sensitive,
    })
}

impl PlanRenderer for HtmlRenderer {
    fn render(&self, plan: &PlanSummary, options: &RenderOptions) -> Result<String, ReviewError> {
        if plan.has_errors {
            return Err(ReviewError::PlanHasErrors(plan.errors.len()));
        }

        let context = self.context(plan, options);

        match &options.template {
            Some(path) => {
                debug!("Rendering with custom template {}", path.display());
                let template = fs::read_to_string(path).map_err(|e| {
                    ReviewError::Template(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Ok(self.handlebars.render_template(&template, &context)?)
            }
            None => Ok(self.handlebars.render(BUILTIN_TEMPLATE_NAME, &context)?),
        }
    }
}

/// Symbol for a change kind tag, e.g. `{{kind_icon kind}}`
fn kind_icon_helper(
    h: &Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let kind = h
        .param(0)
        .and_then(|v| v.value().as_str())
        .and_then(ChangeKind::from_tag);

    if let Some(kind) = kind {
        out.write(kind.symbol())?;
    }

    Ok(())
}

/// CSS class for a change kind tag, e.g. `{{kind_class kind}}`
fn kind_class_helper(
    h: &Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    if let Some(tag) = h.param(0).and_then(|v| v.value().as_str()) {
        if ChangeKind::from_tag(tag).is_some() {
            out.write(&format!("change-{}", tag))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Diagnostic, PlanParser};

    const PLAN: &str = r#"Terraform used the selected providers to generate the following execution
plan. Resource actions are indicated with the following symbols:
  + create
  ~ update in-place

Terraform will perform the following actions:

  # aws_instance.web will be created
  + resource "aws_instance" "web" {
      + ami      = "ami-12345678"
      + password = (sensitive value)
    }

  # module.vpc.aws_subnet.public[0] will be updated in-place
  ~ resource "aws_subnet" "public" {
      ~ cidr_block = "10.0.1.0/24" -> "10.0.2.0/24" # forces replacement
    }

Plan: 1 to add, 1 to change, 0 to destroy.

Changes to Outputs:
  + url = "https://example.com"
"#;

    fn render(plan: &PlanSummary, options: &RenderOptions) -> String {
        HtmlRenderer::new().unwrap().render(plan, options).unwrap()
    }

    #[test]
    fn test_render_builtin_template() {
        let plan = PlanParser::new().parse(PLAN);
        let html = render(&plan, &RenderOptions::default());

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("Terraform Plan Review"));
        assert!(html.contains("change-create"));
        assert!(html.contains("change-update"));
        assert!(html.contains(r#"<span class="resource-type-bold">aws_subnet</span>"#));
        assert!(html.contains("tf-forces-replacement"));
        assert!(html.contains("url"));
    }

    #[test]
    fn test_title_is_escaped() {
        let plan = PlanParser::new().parse(PLAN);
        let options = RenderOptions {
            title: "<b>staging</b>".to_string(),
            ..Default::default()
        };
        let html = render(&plan, &options);

        assert!(html.contains("&lt;b&gt;staging&lt;/b&gt;"));
        assert!(!html.contains("<b>staging</b>"));
    }

    #[test]
    fn test_context_groups_follow_report_order() {
        let plan = PlanParser::new().parse(PLAN);
        let renderer = HtmlRenderer::new().unwrap();
        let context = renderer.context(&plan, &RenderOptions::default());

        let kinds: Vec<&str> = context["groups"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["kind"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, vec!["create", "update"]);
        assert_eq!(context["counts"]["total"], 2);

        let create = &context["groups"][0]["resources"][0];
        assert_eq!(create["address"], "aws_instance.web");
        assert!(create["diff_html"].as_str().unwrap().contains("tf-add"));
    }

    #[test]
    fn test_sensitive_attributes_redacted_in_context() {
        let plan = PlanParser::new().parse(PLAN);
        let renderer = HtmlRenderer::new().unwrap();

        let context = renderer.context(&plan, &RenderOptions::default());
        let attrs = &context["groups"][0]["resources"][0]["attributes"];
        assert_eq!(attrs[1]["name"], "password");
        assert_eq!(attrs[1]["new_value"], "(sensitive)");
    }

    #[test]
    fn test_custom_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.hbs");
        fs::write(
            &path,
            "{{title}}:{{#each groups}}[{{kind_icon kind}} {{kind_class kind}} {{count}}]{{/each}}",
        )
        .unwrap();

        let plan = PlanParser::new().parse(PLAN);
        let options = RenderOptions {
            template: Some(path),
            ..Default::default()
        };

        assert_eq!(
            render(&plan, &options),
            "Terraform Plan Review:[+ change-create 1][~ change-update 1]"
        );
    }

    #[test]
    fn test_missing_custom_template_is_error() {
        let plan = PlanParser::new().parse(PLAN);
        let options = RenderOptions {
            template: Some("/nonexistent/template.hbs".into()),
            ..Default::default()
        };

        let result = HtmlRenderer::new().unwrap().render(&plan, &options);
        assert!(matches!(result, Err(ReviewError::Template(_))));
    }

    #[test]
    fn test_refuses_plan_with_errors() {
        let mut plan = PlanSummary::empty("");
        plan.has_errors = true;
        plan.errors.push(Diagnostic::error("Error: boom", "Error: boom"));
        plan.errors.push(Diagnostic::error("Error: again", "Error: again"));

        let result = HtmlRenderer::new()
            .unwrap()
            .render(&plan, &RenderOptions::default());
        assert!(matches!(result, Err(ReviewError::PlanHasErrors(2))));
    }
}
