//! Plan annotation module.
//!
//! This module labels an already-built job diff with the reasons each
//! change needs a particular kind of update, and merges the scheduler's
//! per task group update counts into the tree.

mod cause;
mod count;
mod task;
mod updates;
mod walker;

pub use cause::UpdateCause;
pub use count::classify_count_change;
pub use task::{IN_PLACE_OBJECTS, classify_task, is_in_place_object, task_update_cause};
pub use updates::merge_updates;
pub use walker::{Annotator, ErrorPolicy, annotate, annotate_task_group};
