//! TFReview - review Terraform plans as structured data or an HTML report
//!
//! The [`plan`] module holds the parser; [`render`] turns a parsed plan into
//! terminal text or an HTML page.

pub mod config;
pub mod error;
pub mod output;
pub mod plan;
pub mod render;

pub use error::ReviewError;
