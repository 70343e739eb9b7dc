//! Classification of task group count changes.

use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::diff::TaskGroupDiff;
use crate::error::{CountSide, MalformedCountError};

use super::cause::UpdateCause;

/// Tags the group's `Count` field diff with "forces create" when the count
/// grows and "forces destroy" when it shrinks.
///
/// Values are compared numerically, so `"03"` and `"3"` are equal and leave
/// the field untouched. Only the first `Count` field is considered.
///
/// # Errors
///
/// Returns an error if either value is not a base-10 integer. The field is
/// left unannotated in that case.
pub fn classify_count_change(group: &mut TaskGroupDiff) -> Result<(), MalformedCountError> {
    if !group.diff_type.is_edited() {
        return Ok(());
    }

    let name = group.name.clone();
    let Some(count) = group.count_field_mut() else {
        return Ok(());
    };

    let old = parse_count(&name, CountSide::Old, &count.old)?;
    let new = parse_count(&name, CountSide::New, &count.new)?;

    let cause = match new.cmp(&old) {
        Ordering::Greater => UpdateCause::Create,
        Ordering::Less => UpdateCause::Destroy,
        Ordering::Equal => return Ok(()),
    };

    debug!("Task group '{name}' count {old} -> {new}: {cause}");
    if let Some(annotation) = cause.annotation() {
        count.annotations.push(annotation.to_string());
    }

    Ok(())
}

fn parse_count(group: &str, side: CountSide, value: &str) -> Result<i64, MalformedCountError> {
    value.parse::<i64>().map_err(|source| {
        warn!("Task group '{group}' has a malformed {side} count: {value:?}");
        MalformedCountError {
            task_group: group.to_string(),
            side,
            value: value.to_string(),
            source,
        }
    })
}
