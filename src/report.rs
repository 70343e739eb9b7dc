//! Annotation reports.
//!
//! A report bundles an annotated diff with its identifying hash and a
//! summary of what the annotations say, ready for presentation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::annotate::{Annotator, ErrorPolicy, UpdateCause};
use crate::diff::{DiffHasher, JobDiff, TaskDiff};
use crate::error::AnnotateError;
use crate::plan::PlanAnnotations;

/// An annotated diff ready for display.
#[derive(Debug, Serialize)]
pub struct AnnotationReport {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Hash of the diff content (annotations excluded).
    pub diff_hash: String,
    /// Job identifier.
    pub job_id: String,
    /// Error policy the diff was annotated under.
    pub error_policy: ErrorPolicy,
    /// Summary of the annotations.
    pub summary: AnnotationSummary,
    /// The annotated diff.
    pub diff: JobDiff,
}

/// Totals over an annotated diff.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationSummary {
    /// Edited task groups.
    pub task_groups_edited: usize,
    /// Count fields annotated "forces create".
    pub count_increases: usize,
    /// Count fields annotated "forces destroy".
    pub count_decreases: usize,
    /// Tasks annotated "forces in-place update".
    pub in_place_tasks: usize,
    /// Tasks annotated "forces create/destroy update".
    pub destructive_tasks: usize,
    /// Scheduler update counts summed over all task groups.
    pub updates: BTreeMap<UpdateCause, u64>,
}

impl AnnotationReport {
    /// Annotates `diff` and wraps the result in a report.
    ///
    /// # Errors
    ///
    /// Returns the annotator's error; the diff is consumed either way.
    pub fn build(
        annotator: &Annotator,
        mut diff: JobDiff,
        plan: Option<&PlanAnnotations>,
    ) -> Result<Self, AnnotateError> {
        let diff_hash = DiffHasher::new().hash_diff(&diff);
        annotator.annotate(&mut diff, plan)?;

        Ok(Self {
            generated_at: Utc::now(),
            diff_hash,
            job_id: diff.id.clone(),
            error_policy: annotator.error_policy(),
            summary: AnnotationSummary::from_diff(&diff),
            diff,
        })
    }

    /// Returns true if any task needs to be recreated.
    #[must_use]
    pub const fn has_destructive_changes(&self) -> bool {
        self.summary.destructive_tasks > 0
    }
}

impl AnnotationSummary {
    /// Tallies the annotations present in a diff.
    #[must_use]
    pub fn from_diff(diff: &JobDiff) -> Self {
        let mut summary = Self::default();

        for group in &diff.task_groups {
            if group.diff_type.is_edited() {
                summary.task_groups_edited += 1;
            }

            if let Some(count) = group.count_field() {
                for annotation in &count.annotations {
                    match UpdateCause::from_annotation(annotation) {
                        Some(UpdateCause::Create) => summary.count_increases += 1,
                        Some(UpdateCause::Destroy) => summary.count_decreases += 1,
                        _ => {}
                    }
                }
            }

            for task in &group.tasks {
                match task_cause(task) {
                    Some(UpdateCause::InPlace) => summary.in_place_tasks += 1,
                    Some(UpdateCause::Destructive) => summary.destructive_tasks += 1,
                    _ => {}
                }
            }

            for (cause, count) in &group.updates {
                let total = summary.updates.entry(*cause).or_insert(0);
                *total = total.saturating_add(*count);
            }
        }

        summary
    }

    /// Total allocations touched by the plan, ignored ones excluded.
    #[must_use]
    pub fn total_updates(&self) -> u64 {
        self.updates
            .iter()
            .filter(|(cause, _)| **cause != UpdateCause::Ignore)
            .map(|(_, count)| *count)
            .fold(0, u64::saturating_add)
    }
}

/// Returns the classification carried by a task diff, if any.
#[must_use]
pub fn task_cause(task: &TaskDiff) -> Option<UpdateCause> {
    task.annotations
        .iter()
        .filter_map(|a| UpdateCause::from_annotation(a))
        .find(|c| matches!(c, UpdateCause::InPlace | UpdateCause::Destructive))
}

impl std::fmt::Display for AnnotationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} task groups edited, {} tasks in-place, {} tasks create/destroy",
            self.task_groups_edited, self.in_place_tasks, self.destructive_tasks
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{DiffType, FieldDiff, ObjectDiff, TaskGroupDiff};
    use crate::plan::DesiredUpdates;

    fn test_diff(count: &str) -> JobDiff {
        JobDiff::edited("example")
            .with_task_group(
                TaskGroupDiff::new("web", DiffType::Edited)
                    .with_field(FieldDiff::edited("Count", "1", count))
                    .with_task(
                        TaskDiff::new("frontend", DiffType::Edited)
                            .with_object(ObjectDiff::edited("Service")),
                    )
                    .with_task(
                        TaskDiff::new("sidecar", DiffType::Edited)
                            .with_object(ObjectDiff::edited("Template")),
                    ),
            )
            .with_task_group(TaskGroupDiff::new("db", DiffType::Added))
    }

    fn test_plan() -> PlanAnnotations {
        PlanAnnotations::default()
            .with_group(
                "web",
                DesiredUpdates {
                    ignore: 4,
                    place: 2,
                    destructive_update: 1,
                    ..DesiredUpdates::default()
                },
            )
            .with_group(
                "db",
                DesiredUpdates {
                    place: 3,
                    ..DesiredUpdates::default()
                },
            )
    }

    #[test]
    fn test_build_report() {
        let diff = test_diff("3");
        let expected_hash = DiffHasher::new().hash_diff(&diff);

        let report = AnnotationReport::build(&Annotator::new(), diff, Some(&test_plan())).unwrap();

        assert_eq!(report.diff_hash, expected_hash);
        assert_eq!(report.job_id, "example");
        assert_eq!(report.error_policy, ErrorPolicy::FailFast);
        assert_eq!(report.summary.task_groups_edited, 1);
        assert_eq!(report.summary.count_increases, 1);
        assert_eq!(report.summary.count_decreases, 0);
        assert_eq!(report.summary.in_place_tasks, 1);
        assert_eq!(report.summary.destructive_tasks, 1);
        assert!(report.has_destructive_changes());

        // The added "db" group is never merged.
        assert_eq!(report.summary.updates.get(&UpdateCause::Create), Some(&2));
        assert_eq!(report.summary.total_updates(), 3);
    }

    #[test]
    fn test_build_report_error() {
        let err = AnnotationReport::build(
            &Annotator::new().with_error_policy(ErrorPolicy::Rollback),
            test_diff("many"),
            None,
        )
        .unwrap_err();
        assert_eq!(err.malformed_counts()[0].task_group, "web");
    }

    #[test]
    fn test_report_json_shape() {
        let report = AnnotationReport::build(&Annotator::new(), test_diff("0"), Some(&test_plan())).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["summary"]["count_decreases"], 1);
        assert_eq!(json["summary"]["updates"]["create/destroy update"], 1);
        assert_eq!(
            json["diff"]["TaskGroups"][0]["Fields"][0]["Annotations"][0],
            "forces destroy"
        );
        assert_eq!(json["diff"]["TaskGroups"][0]["Updates"]["ignore"], 4);
        assert_eq!(json["error_policy"], "fail_fast");
    }

    #[test]
    fn test_summary_saturates_large_counts() {
        let diff = JobDiff::edited("example")
            .with_task_group(
                TaskGroupDiff::new("web", DiffType::Edited)
                    .with_field(FieldDiff::edited("Count", "1", "3")),
            )
            .with_task_group(
                TaskGroupDiff::new("db", DiffType::Edited)
                    .with_field(FieldDiff::edited("Count", "1", "3")),
            );
        let huge = DesiredUpdates {
            place: u64::MAX,
            ..DesiredUpdates::default()
        };
        let plan = PlanAnnotations::default()
            .with_group("web", huge)
            .with_group("db", huge);

        let report = AnnotationReport::build(&Annotator::new(), diff, Some(&plan)).unwrap();

        assert_eq!(report.summary.updates[&UpdateCause::Create], u64::MAX);
        assert_eq!(report.summary.total_updates(), u64::MAX);
    }

    #[test]
    fn test_summary_of_unannotated_diff() {
        let summary = AnnotationSummary::from_diff(&test_diff("3"));
        assert_eq!(summary.task_groups_edited, 1);
        assert_eq!(summary.in_place_tasks, 0);
        assert_eq!(summary.total_updates(), 0);
        assert_eq!(
            summary.to_string(),
            "1 task groups edited, 0 tasks in-place, 0 tasks create/destroy"
        );
    }
}
