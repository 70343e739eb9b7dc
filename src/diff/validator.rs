//! Producer-contract validation for diff documents.
//!
//! Checks a diff (and optionally the plan annotations that go with it)
//! before annotation, without touching the tree.

use crate::error::{InputError, JobPlanError, Result};
use crate::plan::PlanAnnotations;
use std::collections::HashSet;
use tracing::debug;

use super::types::{COUNT_FIELD, JobDiff, TaskGroupDiff};

/// Validator for diff documents.
#[derive(Debug, Default)]
pub struct DiffValidator;

/// Validation result containing all problems found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// Path of the offending node, e.g. `task_groups.web`.
    pub path: String,
    /// The error message.
    pub message: String,
}

impl DiffValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a diff and fails if any error was found.
    ///
    /// # Errors
    ///
    /// Returns an error listing every problem when the diff violates the
    /// producer contract.
    pub fn validate(
        &self,
        diff: &JobDiff,
        plan: Option<&PlanAnnotations>,
    ) -> Result<ValidationResult> {
        let result = self.check(diff, plan);

        if result.is_valid() {
            Ok(result)
        } else {
            Err(JobPlanError::Input(InputError::Invalid {
                problems: result.errors.iter().map(ToString::to_string).collect(),
            }))
        }
    }

    /// Collects errors and warnings without failing.
    #[must_use]
    pub fn check(&self, diff: &JobDiff, plan: Option<&PlanAnnotations>) -> ValidationResult {
        let mut result = ValidationResult::default();

        debug!("Validating diff for job '{}'", diff.id);

        let mut seen = HashSet::new();
        for group in &diff.task_groups {
            if !seen.insert(group.name.as_str()) {
                result.add_error(
                    format!("task_groups.{}", group.name),
                    "duplicate task group name",
                );
            }
            Self::check_count(group, &mut result);
        }

        if let Some(plan) = plan {
            let mut unknown: Vec<&str> = plan
                .desired_tg_updates
                .keys()
                .map(String::as_str)
                .filter(|name| !seen.contains(name))
                .collect();
            unknown.sort_unstable();

            for name in unknown {
                result.add_warning(format!(
                    "plan annotations name task group '{name}' which is not in the diff"
                ));
            }
        }

        result
    }

    fn check_count(group: &TaskGroupDiff, result: &mut ValidationResult) {
        let counts: Vec<_> = group
            .fields
            .iter()
            .filter(|f| f.name == COUNT_FIELD)
            .collect();

        if counts.len() > 1 {
            result.add_error(
                format!("task_groups.{}.fields", group.name),
                format!("{} Count fields, expected at most one", counts.len()),
            );
        }

        let Some(count) = counts.first() else {
            return;
        };

        for (side, value) in [("old", &count.old), ("new", &count.new)] {
            if value.parse::<i64>().is_err() {
                result.add_warning(format!(
                    "task group '{}' has a non-integer {side} count {value:?}",
                    group.name
                ));
            }
        }
    }
}

impl ValidationResult {
    /// Returns true if no errors were found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn add_error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::types::{DiffType, FieldDiff};
    use crate::plan::DesiredUpdates;

    fn group(name: &str, old: &str, new: &str) -> TaskGroupDiff {
        TaskGroupDiff::new(name, DiffType::Edited).with_field(FieldDiff::edited("Count", old, new))
    }

    #[test]
    fn test_valid_diff() {
        let diff = JobDiff::edited("example")
            .with_task_group(group("web", "1", "2"))
            .with_task_group(group("db", "1", "1"));

        let result = DiffValidator::new().validate(&diff, None).unwrap();
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_group_names() {
        let diff = JobDiff::edited("example")
            .with_task_group(group("web", "1", "2"))
            .with_task_group(group("web", "2", "3"));

        let result = DiffValidator::new().check(&diff, None);
        assert!(!result.is_valid());
        assert_eq!(result.errors[0].to_string(), "task_groups.web: duplicate task group name");

        let err = DiffValidator::new().validate(&diff, None).unwrap_err();
        assert!(err.to_string().contains("duplicate task group name"));
    }

    #[test]
    fn test_multiple_count_fields() {
        let diff = JobDiff::edited("example")
            .with_task_group(group("web", "1", "2").with_field(FieldDiff::edited("Count", "3", "4")));

        let result = DiffValidator::new().check(&diff, None);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("2 Count fields"));
    }

    #[test]
    fn test_unparseable_count_is_a_warning() {
        let diff = JobDiff::edited("example").with_task_group(group("web", "abc", "3"));

        let result = DiffValidator::new().check(&diff, None);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("non-integer old count"));
    }

    #[test]
    fn test_plan_entry_without_group() {
        let diff = JobDiff::edited("example").with_task_group(group("web", "1", "2"));
        let plan = PlanAnnotations::default()
            .with_group("web", DesiredUpdates::default())
            .with_group("cache", DesiredUpdates::default());

        let result = DiffValidator::new().check(&diff, Some(&plan));
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("'cache'"));
    }
}
