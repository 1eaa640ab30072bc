//! Heuristics deciding whether text looks like plan output at all
//!
//! These are approximate on purpose: a valid plan shorter than the limits, or
//! unrelated text that mentions terraform, can be misclassified. The limits
//! live in [`ValidityPolicy`] so they can be tuned from configuration.

use serde::Deserialize;

/// Thresholds and keywords used to reject non-plan input
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidityPolicy {
    /// Minimum length of the trimmed input, in characters
    pub min_chars: usize,

    /// Minimum number of non-blank lines
    pub min_lines: usize,

    /// Inputs shorter than this must mention "no changes" or "up-to-date"
    pub short_input_chars: usize,

    /// At least one of these (case-insensitive) must appear
    pub keywords: Vec<String>,
}

impl Default for ValidityPolicy {
    fn default() -> Self {
        Self {
            min_chars: 20,
            min_lines: 2,
            short_input_chars: 100,
            keywords: [
                "terraform",
                "plan:",
                "no changes",
                "will be created",
                "will be destroyed",
                "will be updated",
                "will be replaced",
                "execution plan",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
        }
    }
}

/// Why an input was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityFailure {
    Empty,
    TooShort,
    InsufficientContent,
    NotTerraformOutput,
    Incomplete,
}

impl ValidityFailure {
    /// Human-readable explanation shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            ValidityFailure::Empty => "Input is empty",
            ValidityFailure::TooShort => "Input is too short to be terraform plan output",
            ValidityFailure::InsufficientContent => {
                "Input has insufficient content to be terraform plan output"
            }
            ValidityFailure::NotTerraformOutput => {
                "Input does not appear to be valid terraform output"
            }
            ValidityFailure::Incomplete => "Terraform output appears incomplete or invalid",
        }
    }
}

impl ValidityPolicy {
    /// Run every heuristic in order and report the first failure
    pub fn check(&self, text: &str) -> Result<(), ValidityFailure> {
        let trimmed = text.trim();

        if trimmed.is_empty() {
            return Err(ValidityFailure::Empty);
        }

        let length = trimmed.chars().count();
        if length < self.min_chars {
            return Err(ValidityFailure::TooShort);
        }

        let content_lines = trimmed.lines().filter(|l| !l.trim().is_empty()).count();
        if content_lines < self.min_lines {
            return Err(ValidityFailure::InsufficientContent);
        }

        let lowered = trimmed.to_lowercase();
        if !self
            .keywords
            .iter()
            .any(|k| lowered.contains(&k.to_lowercase()))
        {
            return Err(ValidityFailure::NotTerraformOutput);
        }

        if length < self.short_input_chars
            && !lowered.contains("no changes")
            && !lowered.contains("up-to-date")
        {
            return Err(ValidityFailure::Incomplete);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str) -> Result<(), ValidityFailure> {
        ValidityPolicy::default().check(text)
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(check(""), Err(ValidityFailure::Empty));
        assert_eq!(check("  \n\n\t "), Err(ValidityFailure::Empty));
    }

    #[test]
    fn test_too_short() {
        assert_eq!(check("plan:"), Err(ValidityFailure::TooShort));
    }

    #[test]
    fn test_insufficient_lines() {
        assert_eq!(
            check("This is not a terraform plan"),
            Err(ValidityFailure::InsufficientContent)
        );
    }

    #[test]
    fn test_missing_keywords() {
        let text = "hello world this is text\nand another line of it\n".repeat(5);
        assert_eq!(check(&text), Err(ValidityFailure::NotTerraformOutput));
    }

    #[test]
    fn test_short_without_marker_is_incomplete() {
        assert_eq!(
            check("Terraform used the providers\nPlan: 1 to add"),
            Err(ValidityFailure::Incomplete)
        );
        assert_eq!(
            check("Terraform plan finished\nNo changes here at all."),
            Ok(())
        );
    }

    #[test]
    fn test_real_plan_passes() {
        let text = "Terraform will perform the following actions:\n\n  # aws_instance.a will be created\n  + resource \"aws_instance\" \"a\" {\n    }\n\nPlan: 1 to add, 0 to change, 0 to destroy.\n";
        assert_eq!(check(text), Ok(()));
    }

    #[test]
    fn test_policy_is_configurable() {
        let policy = ValidityPolicy {
            min_chars: 1,
            min_lines: 1,
            short_input_chars: 0,
            ..Default::default()
        };
        assert_eq!(policy.check("plan:"), Ok(()));
    }

    #[test]
    fn test_failure_messages_are_distinct() {
        let failures = [
            ValidityFailure::Empty,
            ValidityFailure::TooShort,
            ValidityFailure::InsufficientContent,
            ValidityFailure::NotTerraformOutput,
            ValidityFailure::Incomplete,
        ];
        for (i, a) in failures.iter().enumerate() {
            for b in &failures[i + 1..] {
                assert_ne!(a.message(), b.message());
            }
        }
    }
}
