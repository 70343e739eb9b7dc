//! Plan annotation types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scheduler output attached to a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlanAnnotations {
    /// Desired update counts keyed by task group name.
    #[serde(rename = "DesiredTGUpdates")]
    pub desired_tg_updates: HashMap<String, DesiredUpdates>,
}

/// Desired update counts for a single task group.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct DesiredUpdates {
    /// Allocations left untouched.
    pub ignore: u64,
    /// Allocations to place.
    pub place: u64,
    /// Allocations to migrate.
    pub migrate: u64,
    /// Allocations to stop.
    pub stop: u64,
    /// Allocations updated in place.
    pub in_place_update: u64,
    /// Allocations stopped and recreated.
    pub destructive_update: u64,
}

impl PlanAnnotations {
    /// Adds desired updates for a task group.
    #[must_use]
    pub fn with_group(mut self, name: impl Into<String>, updates: DesiredUpdates) -> Self {
        self.desired_tg_updates.insert(name.into(), updates);
        self
    }

    /// Looks up the desired updates for a task group.
    #[must_use]
    pub fn for_group(&self, name: &str) -> Option<&DesiredUpdates> {
        self.desired_tg_updates.get(name)
    }
}

impl DesiredUpdates {
    /// Returns true when every count is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ignore == 0
            && self.place == 0
            && self.migrate == 0
            && self.stop == 0
            && self.in_place_update == 0
            && self.destructive_update == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scheduler_json() {
        let json = r#"{
            "DesiredTGUpdates": {
                "web": {"Ignore": 1, "Place": 2, "Migrate": 0, "Stop": 1, "InPlaceUpdate": 3, "DestructiveUpdate": 0}
            }
        }"#;

        let plan: PlanAnnotations = serde_json::from_str(json).unwrap();
        let web = plan.for_group("web").unwrap();
        assert_eq!(web.ignore, 1);
        assert_eq!(web.in_place_update, 3);
        assert!(plan.for_group("db").is_none());
    }

    #[test]
    fn test_is_empty() {
        assert!(DesiredUpdates::default().is_empty());
        assert!(!DesiredUpdates { migrate: 1, ..DesiredUpdates::default() }.is_empty());
    }
}
