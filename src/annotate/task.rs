//! Classification of task changes as in-place or destructive.

use tracing::debug;

use crate::diff::{ObjectDiff, TaskDiff};

use super::cause::UpdateCause;

/// Sub-object kinds whose changes can be applied to a running task.
pub const IN_PLACE_OBJECTS: &[&str] = &["LogConfig", "Service", "Constraint"];

/// Returns true if a change to this sub-object can be applied in place.
#[must_use]
pub fn is_in_place_object(object: &ObjectDiff) -> bool {
    IN_PLACE_OBJECTS.contains(&object.name.as_str())
}

/// Decides how an edited task will be updated.
///
/// Any changed primitive field forces a destructive update, as does any
/// changed sub-object outside [`IN_PLACE_OBJECTS`]. Every object is looked
/// at; the verdict does not depend on their order.
#[must_use]
pub fn task_update_cause(task: &TaskDiff) -> UpdateCause {
    let destructive = !task.fields.is_empty()
        || task
            .objects
            .iter()
            .fold(false, |acc, object| acc | !is_in_place_object(object));

    if destructive {
        UpdateCause::Destructive
    } else {
        UpdateCause::InPlace
    }
}

/// Appends exactly one of "forces in-place update" or
/// "forces create/destroy update" to an edited task diff.
pub fn classify_task(task: &mut TaskDiff) {
    if !task.diff_type.is_edited() {
        return;
    }

    let cause = task_update_cause(task);
    debug!("Task '{}' {cause}", task.name);

    if let Some(annotation) = cause.annotation() {
        task.annotations.push(annotation.to_string());
    }
}
