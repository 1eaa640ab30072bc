//! Renderers for parsed plans
//!
//! - **Text**: terminal-friendly summary of every resource change
//! - **HTML**: standalone review page built from a handlebars template
//!
//! # Example
//!
//! ```ignore
//! use tfreview::plan::PlanParser;
//! use tfreview::render::{HtmlRenderer, PlanRenderer};
//!
//! let plan = PlanParser::new().parse(&plan_output);
//! let html = HtmlRenderer::new()?.render(&plan, &RenderOptions::default())?;
//! ```

pub mod diff;
mod html;
mod text;

pub use html::HtmlRenderer;
pub use text::TextRenderer;

use crate::config::RenderOptions;
use crate::error::ReviewError;
use crate::plan::PlanSummary;

/// Trait for plan renderers
pub trait PlanRenderer {
    /// Render the parsed plan to a string
    fn render(&self, plan: &PlanSummary, options: &RenderOptions) -> Result<String, ReviewError>;
}
