//! Diff hashing for plan identification.
//!
//! The hash covers the structural content of a diff (types, names and
//! values) and ignores annotations and update counts, so a diff hashes the
//! same before and after annotation.

use sha2::{Digest, Sha256};

use super::types::{DiffType, FieldDiff, JobDiff, ObjectDiff, TaskDiff, TaskGroupDiff};

/// Hasher for computing diff hashes.
#[derive(Debug, Default)]
pub struct DiffHasher;

impl DiffHasher {
    /// Creates a new diff hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes a hash of an entire job diff.
    #[must_use]
    pub fn hash_diff(&self, diff: &JobDiff) -> String {
        let mut hasher = Sha256::new();

        hasher.update(b"job");
        Self::update_node(&mut hasher, diff.diff_type, &diff.id);
        Self::update_fields(&mut hasher, &diff.fields);
        Self::update_objects(&mut hasher, &diff.objects);

        for group in &diff.task_groups {
            hasher.update(self.hash_task_group(group).as_bytes());
        }

        hex::encode(hasher.finalize())
    }

    /// Computes a hash for a single task group diff.
    #[must_use]
    pub fn hash_task_group(&self, group: &TaskGroupDiff) -> String {
        let mut hasher = Sha256::new();

        hasher.update(b"group");
        Self::update_node(&mut hasher, group.diff_type, &group.name);
        Self::update_fields(&mut hasher, &group.fields);
        Self::update_objects(&mut hasher, &group.objects);

        for task in &group.tasks {
            Self::update_task(&mut hasher, task);
        }

        hex::encode(hasher.finalize())
    }

    /// Returns a short (8 char) version of a hash.
    #[must_use]
    pub fn short_hash<'a>(&self, hash: &'a str) -> &'a str {
        hash.get(..8).unwrap_or(hash)
    }

    fn update_task(hasher: &mut Sha256, task: &TaskDiff) {
        hasher.update(b"task");
        Self::update_node(hasher, task.diff_type, &task.name);
        Self::update_fields(hasher, &task.fields);
        Self::update_objects(hasher, &task.objects);
    }

    fn update_fields(hasher: &mut Sha256, fields: &[FieldDiff]) {
        hasher.update((fields.len() as u64).to_be_bytes());
        for field in fields {
            Self::update_node(hasher, field.diff_type, &field.name);
            Self::update_str(hasher, &field.old);
            Self::update_str(hasher, &field.new);
        }
    }

    fn update_objects(hasher: &mut Sha256, objects: &[ObjectDiff]) {
        hasher.update((objects.len() as u64).to_be_bytes());
        for object in objects {
            Self::update_node(hasher, object.diff_type, &object.name);
            Self::update_fields(hasher, &object.fields);
            Self::update_objects(hasher, &object.objects);
        }
    }

    fn update_node(hasher: &mut Sha256, diff_type: DiffType, name: &str) {
        hasher.update([diff_type as u8]);
        Self::update_str(hasher, name);
    }

    // Length-prefixed so adjacent values cannot run into each other.
    fn update_str(hasher: &mut Sha256, value: &str) {
        hasher.update((value.len() as u64).to_be_bytes());
        hasher.update(value.as_bytes());
    }
}
