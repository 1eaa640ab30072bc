//! Configuration loaded from `.tfreview.yaml`
//!
//! ```yaml
//! validity:
//!   min_chars: 20
//!   min_lines: 2
//!   short_input_chars: 100
//! parser:
//!   include_data_sources: false
//! render:
//!   show_sensitive: false
//!   title: Terraform Plan Review
//!   template: ./templates/custom.hbs
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::error::ReviewError;
use crate::plan::{ParserOptions, PlanParser, ValidityPolicy};

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = ".tfreview.yaml";

/// Options for rendering reports
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Show attribute values flagged sensitive (still redacted by terraform)
    pub show_sensitive: bool,

    /// Report title
    pub title: String,

    /// Custom handlebars template replacing the built-in report
    pub template: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_sensitive: false,
            title: "Terraform Plan Review".to_string(),
            template: None,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub validity: ValidityPolicy,
    pub parser: ParserOptions,
    pub render: RenderOptions,
}

impl Config {
    /// Parse configuration from YAML text
    pub fn from_yaml(text: &str) -> Result<Self, ReviewError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ReviewError> {
        let text = fs::read_to_string(path).map_err(|e| {
            ReviewError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&text)
    }

    /// Load from an explicit path, else `.tfreview.yaml` in `dir` if present,
    /// else defaults
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self, ReviewError> {
        if let Some(path) = explicit {
            debug!("Loading configuration from {}", path.display());
            return Self::from_file(path);
        }

        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            debug!("Loading configuration from {}", candidate.display());
            return Self::from_file(&candidate);
        }

        Ok(Self::default())
    }

    /// Build a parser using this configuration
    pub fn parser(&self) -> PlanParser {
        PlanParser::with_config(self.validity.clone(), self.parser.clone())
    }
}
