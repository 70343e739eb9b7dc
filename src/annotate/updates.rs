//! Merging of scheduler update counts into task group diffs.

use tracing::debug;

use crate::diff::TaskGroupDiff;
use crate::plan::{DesiredUpdates, PlanAnnotations};

use super::cause::UpdateCause;

/// Copies the scheduler's desired update counts for a task group into its
/// `updates` map. Zero counts are never written.
pub fn merge_updates(group: &mut TaskGroupDiff, plan: Option<&PlanAnnotations>) {
    let Some(desired) = plan.and_then(|p| p.for_group(&group.name)) else {
        return;
    };

    if desired.is_empty() {
        debug!("No updates planned for task group '{}'", group.name);
        return;
    }

    for (cause, count) in desired.counts() {
        if count != 0 {
            group.updates.insert(cause, count);
        }
    }

    debug!(
        "Merged {} update kinds into task group '{}'",
        group.updates.len(),
        group.name
    );
}

impl DesiredUpdates {
    /// Pairs each count with the cause it maps to.
    #[must_use]
    pub const fn counts(&self) -> [(UpdateCause, u64); 6] {
        [
            (UpdateCause::Ignore, self.ignore),
            (UpdateCause::Create, self.place),
            (UpdateCause::Migrate, self.migrate),
            (UpdateCause::Destroy, self.stop),
            (UpdateCause::InPlace, self.in_place_update),
            (UpdateCause::Destructive, self.destructive_update),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffType;

    fn web_plan(updates: DesiredUpdates) -> PlanAnnotations {
        PlanAnnotations::default().with_group("web", updates)
    }

    #[test]
    fn test_merge_skips_zero_counts() {
        let mut group = TaskGroupDiff::new("web", DiffType::Edited);
        let plan = web_plan(DesiredUpdates {
            place: 2,
            stop: 1,
            ..DesiredUpdates::default()
        });

        merge_updates(&mut group, Some(&plan));

        assert_eq!(group.updates.len(), 2);
        assert_eq!(group.updates[&UpdateCause::Create], 2);
        assert_eq!(group.updates[&UpdateCause::Destroy], 1);
    }

    #[test]
    fn test_merge_maps_every_count() {
        let mut group = TaskGroupDiff::new("web", DiffType::Edited);
        let plan = web_plan(DesiredUpdates {
            ignore: 1,
            place: 2,
            migrate: 3,
            stop: 4,
            in_place_update: 5,
            destructive_update: 6,
        });

        merge_updates(&mut group, Some(&plan));

        let merged: Vec<_> = group.updates.iter().map(|(c, n)| (c.label(), *n)).collect();
        assert_eq!(
            merged,
            vec![
                ("ignore", 1),
                ("create", 2),
                ("destroy", 4),
                ("migrate", 3),
                ("in-place update", 5),
                ("create/destroy update", 6),
            ]
        );
    }

    #[test]
    fn test_merge_without_entry_or_plan() {
        let mut group = TaskGroupDiff::new("web", DiffType::Edited);

        merge_updates(&mut group, None);
        assert!(group.updates.is_empty());

        let other = PlanAnnotations::default().with_group("db", DesiredUpdates {
            place: 1,
            ..DesiredUpdates::default()
        });
        merge_updates(&mut group, Some(&other));
        assert!(group.updates.is_empty());
    }

    #[test]
    fn test_all_zero_entry_writes_nothing() {
        let mut group = TaskGroupDiff::new("web", DiffType::Edited);
        merge_updates(&mut group, Some(&web_plan(DesiredUpdates::default())));
        assert!(group.updates.is_empty());
    }
}
