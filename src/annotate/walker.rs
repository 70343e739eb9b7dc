//! Diff walker: the annotation entry point.
//!
//! Walks job -> task groups -> {count field, tasks} and applies the
//! classifiers to every edited node.
//!
//! Under the default [`ErrorPolicy::FailFast`] the walk is not
//! transactional: when a task group carries a malformed count the walk stops
//! there and returns the error, and annotations already applied to earlier
//! task groups (and the update counts merged into the failing group) stay
//! in the tree.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::diff::{JobDiff, TaskGroupDiff};
use crate::error::{AnnotateError, MalformedCountError};
use crate::plan::PlanAnnotations;

use super::count::classify_count_change;
use super::task::classify_task;
use super::updates::merge_updates;

/// What to do when a task group cannot be annotated.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Stop at the first failing task group and keep partial annotations.
    #[default]
    FailFast,
    /// Stop at the first failing task group and restore the tree to its
    /// state before the call.
    Rollback,
    /// Annotate every task group that can be annotated and report all
    /// failures together.
    Aggregate,
}

/// Annotates job diffs with update causes.
#[derive(Debug, Default)]
pub struct Annotator {
    /// Behaviour on malformed counts.
    error_policy: ErrorPolicy,
}

impl Annotator {
    /// Creates an annotator with the fail-fast policy.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            error_policy: ErrorPolicy::FailFast,
        }
    }

    /// Sets the error policy.
    #[must_use]
    pub const fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    /// Returns the configured error policy.
    #[must_use]
    pub const fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// Annotates `diff` in place using the scheduler's plan annotations.
    ///
    /// Does nothing unless the job itself was edited.
    ///
    /// # Errors
    ///
    /// Returns an error if a task group's count is malformed. What remains
    /// annotated depends on the [`ErrorPolicy`].
    pub fn annotate(
        &self,
        diff: &mut JobDiff,
        plan: Option<&PlanAnnotations>,
    ) -> Result<(), AnnotateError> {
        if !diff.diff_type.is_edited() || diff.task_groups.is_empty() {
            debug!("Job '{}' is not edited, nothing to annotate", diff.id);
            return Ok(());
        }

        info!(
            "Annotating job '{}' ({} task groups, policy {:?})",
            diff.id,
            diff.task_groups.len(),
            self.error_policy
        );

        match self.error_policy {
            ErrorPolicy::FailFast => Self::annotate_fail_fast(diff, plan),
            ErrorPolicy::Rollback => {
                let snapshot = diff.clone();
                let result = Self::annotate_fail_fast(diff, plan);
                if result.is_err() {
                    warn!("Rolling back annotations on job '{}'", diff.id);
                    *diff = snapshot;
                }
                result
            }
            ErrorPolicy::Aggregate => {
                let errors: Vec<MalformedCountError> = diff
                    .task_groups
                    .iter_mut()
                    .filter_map(|group| annotate_task_group(group, plan).err())
                    .collect();

                if !errors.is_empty() {
                    warn!(
                        "{} of {} task groups in job '{}' could not be annotated",
                        errors.len(),
                        diff.task_groups.len(),
                        diff.id
                    );
                }

                AnnotateError::from_many(errors).map_or(Ok(()), Err)
            }
        }
    }

    fn annotate_fail_fast(
        diff: &mut JobDiff,
        plan: Option<&PlanAnnotations>,
    ) -> Result<(), AnnotateError> {
        for group in &mut diff.task_groups {
            annotate_task_group(group, plan)?;
        }
        Ok(())
    }
}

/// Annotates `diff` in place with the default fail-fast policy.
///
/// # Errors
///
/// Returns an error if a task group's count is malformed; annotations
/// applied before the failure are kept.
pub fn annotate(diff: &mut JobDiff, plan: Option<&PlanAnnotations>) -> Result<(), AnnotateError> {
    Annotator::new().annotate(diff, plan)
}

/// Annotates a single edited task group: merges update counts, classifies
/// the count change, then classifies every task.
///
/// # Errors
///
/// Returns an error if the count is malformed, in which case the tasks are
/// left unclassified.
pub fn annotate_task_group(
    group: &mut TaskGroupDiff,
    plan: Option<&PlanAnnotations>,
) -> Result<(), MalformedCountError> {
    if !group.diff_type.is_edited() {
        return Ok(());
    }

    merge_updates(group, plan);
    classify_count_change(group)?;

    for task in &mut group.tasks {
        classify_task(task);
    }

    Ok(())
}
