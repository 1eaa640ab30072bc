use std::fmt;

/// Errors raised around the parser: decoding, configuration and rendering.
/// Parsing itself never fails.
#[derive(Debug)]
pub enum ReviewError {
    /// Configuration file could not be read or parsed
    Config(String),

    /// Report template failed to compile or render
    Template(String),

    /// A report was requested for a plan that carries errors
    PlanHasErrors(usize),

    /// JSON encoding or decoding error
    Json(serde_json::Error),

    /// General I/O error
    Io(std::io::Error),
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ReviewError::Template(msg) => write!(f, "Template error: {}", msg),
            ReviewError::PlanHasErrors(count) => {
                write!(
                    f,
                    "Plan contains {} error(s); refusing to generate a report",
                    count
                )
            }
            ReviewError::Json(err) => write!(f, "JSON error: {}", err),
            ReviewError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for ReviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReviewError::Json(err) => Some(err),
            ReviewError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReviewError {
    fn from(err: std::io::Error) -> Self {
        ReviewError::Io(err)
    }
}

impl From<serde_json::Error> for ReviewError {
    fn from(err: serde_json::Error) -> Self {
        ReviewError::Json(err)
    }
}

impl From<serde_yaml::Error> for ReviewError {
    fn from(err: serde_yaml::Error) -> Self {
        ReviewError::Config(err.to_string())
    }
}

impl From<handlebars::RenderError> for ReviewError {
    fn from(err: handlebars::RenderError) -> Self {
        ReviewError::Template(err.to_string())
    }
}

impl From<handlebars::TemplateError> for ReviewError {
    fn from(err: handlebars::TemplateError) -> Self {
        ReviewError::Template(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ReviewError::Config("bad yaml".to_string()).to_string(),
            "Configuration error: bad yaml"
        );
        assert_eq!(
            ReviewError::Template("unclosed".to_string()).to_string(),
            "Template error: unclosed"
        );

        assert_eq!(
            ReviewError::PlanHasErrors(2).to_string(),
            "Plan contains 2 error(s); refusing to generate a report"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "plan.txt");
        let err: ReviewError = io.into();
        assert!(matches!(err, ReviewError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
