//! Plan parser for Terraform/OpenTofu plan output
//!
//! This module turns the text printed by `terraform plan` into a
//! [`PlanSummary`]. Parsing never fails: errors reported by terraform and
//! inputs that do not look like a plan are returned as diagnostics.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Deserialize;

use super::diagnostics::scan_diagnostics;
use super::resources::scan_changes;
use super::types::{ChangeKind, Diagnostic, PlanSummary};
use super::validity::ValidityPolicy;

lazy_static! {
    static ref NO_CHANGES: Regex = Regex::new(r"No changes\. Infrastructure is up-to-date\.")
        .expect("Invalid no changes regex");
}

/// Title given to diagnostics produced by the validity heuristics
pub const INVALID_INPUT_TITLE: &str = "Invalid Input";

/// Switches affecting which records the parser keeps
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Keep `data.` lookups as records (they are never counted)
    pub include_data_sources: bool,
}

/// Parser for Terraform plan output
#[derive(Debug, Clone, Default)]
pub struct PlanParser {
    policy: ValidityPolicy,
    options: ParserOptions,
}

impl PlanParser {
    /// Create a parser with the default validity policy and options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with an explicit policy and options
    pub fn with_config(policy: ValidityPolicy, options: ParserOptions) -> Self {
        Self { policy, options }
    }

    /// Parse plan text into a structured summary.
    ///
    /// Outcomes, in priority order: diagnostics with errors, the explicit
    /// no-changes marker, input rejected by the validity policy, and finally
    /// a full scan of resource and output changes.
    pub fn parse(&self, plan_text: &str) -> PlanSummary {
        let lines: Vec<&str> = plan_text.lines().collect();

        let (warnings, errors): (Vec<Diagnostic>, Vec<Diagnostic>) = scan_diagnostics(&lines)
            .into_iter()
            .partition(|d| d.is_warning);

        let mut summary = PlanSummary::empty(plan_text);
        summary.has_warnings = !warnings.is_empty();
        summary.warnings = warnings;

        if !errors.is_empty() {
            debug!("Plan reported {} error(s); skipping change parsing", errors.len());
            summary.has_errors = true;
            summary.errors = errors;
            return summary;
        }

        if lines.iter().any(|line| NO_CHANGES.is_match(line)) {
            debug!("Plan reports no changes");
            return summary;
        }

        if let Err(failure) = self.policy.check(plan_text) {
            debug!("Rejected input: {:?}", failure);
            summary.has_errors = true;
            summary
                .errors
                .push(Diagnostic::error(INVALID_INPUT_TITLE, failure.message()));
            return summary;
        }

        let changes = scan_changes(&lines, &self.options);

        for resource in &changes.resources {
            if resource.is_data_source() {
                continue;
            }
            match resource.change_kind {
                ChangeKind::Create => summary.to_add += 1,
                ChangeKind::Update => summary.to_change += 1,
                ChangeKind::Delete => summary.to_destroy += 1,
                ChangeKind::Replace => summary.to_replace += 1,
                ChangeKind::Moved | ChangeKind::NoOp => {}
            }
        }

        if let Some(reported) = changes.reported {
            let counted = (summary.to_add, summary.to_change, summary.to_destroy);
            let stated = (reported.to_add, reported.to_change, reported.to_destroy);
            if counted != stated {
                debug!(
                    "Counted (add, change, destroy) {:?} differs from plan summary line {:?}",
                    counted, stated
                );
            }
        }

        summary.has_changes = !changes.resources.is_empty() || !changes.outputs.is_empty();
        summary.resource_changes = changes.resources;
        summary.output_changes = changes.outputs;
        summary.reported = changes.reported;

        summary
    }
}
