//! Terraform plan parsing
//!
//! This module parses the human-readable text printed by `terraform plan`
//! (or `tofu plan`) into a [`PlanSummary`]: resource changes with their
//! attribute diffs, output changes, counters and any diagnostics.
//!
//! # Example
//!
//! ```
//! use tfreview::plan::{ChangeKind, PlanParser};
//!
//! let text = "\
//! Terraform will perform the following actions:
//!
//!   ## aws_instance.web will be created
//!   + resource \"aws_instance\" \"web\" {
//!       + ami = \"ami-12345678\"
//!     }
//!
//! Plan: 1 to add, 0 to change, 0 to destroy.
//! ";
//!
//! let plan = PlanParser::new().parse(text);
//! assert_eq!(plan.to_add, 1);
//! assert_eq!(plan.resource_changes[0].change_kind, ChangeKind::Create);
//! ```

pub mod address;
pub mod classifier;
pub mod diagnostics;
pub mod outputs;
mod parser;
pub mod resources;
pub mod serialize;
mod types;
pub mod validity;

pub use address::resolve_address;
pub use classifier::classify;
pub use parser::{INVALID_INPUT_TITLE, ParserOptions, PlanParser};
pub use types::{
    AttributeChange, ChangeKind, Diagnostic, OutputChange, PlanSummary, ReportedCounts,
    ResourceChange,
};
pub use validity::{ValidityFailure, ValidityPolicy};
