//! Scheduler plan annotations.
//!
//! The scheduler computes, per task group, how many allocations will be
//! placed, stopped, migrated or updated. This module models that input.

mod types;

pub use types::{DesiredUpdates, PlanAnnotations};
