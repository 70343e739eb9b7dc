//! Diff tree module.
//!
//! This module holds the job diff data model produced by the diff engine,
//! along with the tooling that reads, identifies and checks diff documents
//! before they are annotated.

mod hash;
mod loader;
mod types;
mod validator;

pub use hash::DiffHasher;
pub use loader::{DocumentFormat, DocumentLoader};
pub use types::{
    COUNT_FIELD, DiffType, FieldDiff, JobDiff, ObjectDiff, TaskDiff, TaskGroupDiff,
};
pub use validator::{DiffValidator, ValidationError, ValidationResult};
