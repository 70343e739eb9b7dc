//! Diff tree types.
//!
//! These types mirror the hierarchical diff between two versions of a job
//! as emitted by the diff producer. Keys are `PascalCase` on the wire.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::annotate::UpdateCause;

/// Name of the task group field holding the replica count.
pub const COUNT_FIELD: &str = "Count";

/// Kind of change a diff node describes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DiffType {
    /// Unchanged.
    #[default]
    None,
    /// Present only in the new version.
    Added,
    /// Present only in the old version.
    Deleted,
    /// Present in both versions with changes.
    Edited,
}

/// Diff of a whole job.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct JobDiff {
    /// Type of change.
    #[serde(rename = "Type")]
    pub diff_type: DiffType,
    /// Job identifier.
    #[serde(rename = "ID")]
    pub id: String,
    /// Changed primitive job fields.
    pub fields: Vec<FieldDiff>,
    /// Changed job sub-objects.
    pub objects: Vec<ObjectDiff>,
    /// Task group diffs.
    pub task_groups: Vec<TaskGroupDiff>,
}

/// Diff of a single task group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct TaskGroupDiff {
    /// Type of change.
    #[serde(rename = "Type")]
    pub diff_type: DiffType,
    /// Task group name, unique within the job.
    pub name: String,
    /// Changed primitive fields, `Count` among them.
    pub fields: Vec<FieldDiff>,
    /// Changed sub-objects.
    pub objects: Vec<ObjectDiff>,
    /// Task diffs.
    pub tasks: Vec<TaskDiff>,
    /// Scheduler update counts; only strictly positive counts are present.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub updates: BTreeMap<UpdateCause, u64>,
    /// Labels attached to the group.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
}

/// Diff of a primitive field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct FieldDiff {
    /// Type of change.
    #[serde(rename = "Type")]
    pub diff_type: DiffType,
    /// Field name.
    pub name: String,
    /// String-encoded old value.
    pub old: String,
    /// String-encoded new value.
    pub new: String,
    /// Labels attached to the field.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
}

/// Diff of a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct TaskDiff {
    /// Type of change.
    #[serde(rename = "Type")]
    pub diff_type: DiffType,
    /// Task name.
    pub name: String,
    /// Changed primitive fields.
    pub fields: Vec<FieldDiff>,
    /// Changed sub-objects (log config, services, templates...).
    pub objects: Vec<ObjectDiff>,
    /// Labels attached to the task.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
}

/// Diff of a structural sub-component. Only `name` is interpreted here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct ObjectDiff {
    /// Type of change.
    #[serde(rename = "Type")]
    pub diff_type: DiffType,
    /// Kind of sub-component, e.g. `LogConfig` or `Service`.
    pub name: String,
    /// Changed primitive fields.
    pub fields: Vec<FieldDiff>,
    /// Nested object diffs.
    pub objects: Vec<ObjectDiff>,
}

impl DiffType {
    /// Returns true for nodes present in both versions.
    #[must_use]
    pub const fn is_edited(self) -> bool {
        matches!(self, Self::Edited)
    }
}

impl JobDiff {
    /// Creates an edited job diff.
    #[must_use]
    pub fn edited(id: impl Into<String>) -> Self {
        Self {
            diff_type: DiffType::Edited,
            id: id.into(),
            ..Self::default()
        }
    }

    /// Adds a task group diff.
    #[must_use]
    pub fn with_task_group(mut self, group: TaskGroupDiff) -> Self {
        self.task_groups.push(group);
        self
    }

    /// Looks up a task group diff by name.
    #[must_use]
    pub fn task_group(&self, name: &str) -> Option<&TaskGroupDiff> {
        self.task_groups.iter().find(|g| g.name == name)
    }
}

impl TaskGroupDiff {
    /// Creates a task group diff of the given type.
    #[must_use]
    pub fn new(name: impl Into<String>, diff_type: DiffType) -> Self {
        Self {
            diff_type,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a field diff.
    #[must_use]
    pub fn with_field(mut self, field: FieldDiff) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a task diff.
    #[must_use]
    pub fn with_task(mut self, task: TaskDiff) -> Self {
        self.tasks.push(task);
        self
    }

    /// Returns the first `Count` field diff, if any.
    #[must_use]
    pub fn count_field(&self) -> Option<&FieldDiff> {
        self.fields.iter().find(|f| f.name == COUNT_FIELD)
    }

    /// Mutable variant of [`Self::count_field`].
    pub fn count_field_mut(&mut self) -> Option<&mut FieldDiff> {
        self.fields.iter_mut().find(|f| f.name == COUNT_FIELD)
    }
}

impl FieldDiff {
    /// Creates an edited field diff.
    #[must_use]
    pub fn edited(name: impl Into<String>, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            diff_type: DiffType::Edited,
            name: name.into(),
            old: old.into(),
            new: new.into(),
            annotations: Vec::new(),
        }
    }
}

impl TaskDiff {
    /// Creates a task diff of the given type.
    #[must_use]
    pub fn new(name: impl Into<String>, diff_type: DiffType) -> Self {
        Self {
            diff_type,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a field diff.
    #[must_use]
    pub fn with_field(mut self, field: FieldDiff) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds an object diff.
    #[must_use]
    pub fn with_object(mut self, object: ObjectDiff) -> Self {
        self.objects.push(object);
        self
    }
}

impl ObjectDiff {
    /// Creates an edited object diff for a sub-component kind.
    #[must_use]
    pub fn edited(name: impl Into<String>) -> Self {
        Self {
            diff_type: DiffType::Edited,
            name: name.into(),
            ..Self::default()
        }
    }
}

impl std::fmt::Display for DiffType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Added => "added",
            Self::Deleted => "deleted",
            Self::Edited => "edited",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_producer_json() {
        let json = r#"{
            "Type": "Edited",
            "ID": "example",
            "TaskGroups": [{
                "Type": "Edited",
                "Name": "web",
                "Fields": [{"Type": "Edited", "Name": "Count", "Old": "1", "New": "3"}],
                "Tasks": [{
                    "Type": "Edited",
                    "Name": "frontend",
                    "Objects": [{"Type": "Added", "Name": "Service", "Fields": []}]
                }]
            }]
        }"#;

        let diff: JobDiff = serde_json::from_str(json).unwrap();
        assert_eq!(diff.diff_type, DiffType::Edited);
        assert_eq!(diff.id, "example");

        let group = diff.task_group("web").unwrap();
        assert_eq!(group.count_field().unwrap().new, "3");
        assert!(group.updates.is_empty());
        assert_eq!(group.tasks[0].objects[0].name, "Service");
        assert!(group.tasks[0].annotations.is_empty());
    }

    #[test]
    fn test_empty_collections_are_omitted() {
        let field = FieldDiff::edited("Count", "1", "2");
        let json = serde_json::to_value(&field).unwrap();
        assert!(json.get("Annotations").is_none());
        assert_eq!(json["Type"], "Edited");
        assert_eq!(json["Old"], "1");
    }

    #[test]
    fn test_count_field_takes_first_match() {
        let group = TaskGroupDiff::new("web", DiffType::Edited)
            .with_field(FieldDiff::edited("Meta", "a", "b"))
            .with_field(FieldDiff::edited(COUNT_FIELD, "1", "2"))
            .with_field(FieldDiff::edited(COUNT_FIELD, "9", "9"));

        assert_eq!(group.count_field().unwrap().old, "1");
    }
}
