// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![warn(dead_code)]                   // Unused code is reported
#![warn(unused_imports)]              // Unused imports are reported
#![warn(unused_variables)]            // Unused variables are reported
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Job Plan Annotate
//!
//! Explains, for a change to a job specification, which kind of update each
//! part of the change forces once the scheduler applies it.
//!
//! ## Overview
//!
//! Given the diff between the old and new version of a job and the
//! scheduler's per task group update counts, the annotator labels:
//!
//! - task group `Count` changes with "forces create" or "forces destroy"
//! - each edited task with "forces in-place update" or
//!   "forces create/destroy update"
//! - each edited task group with the number of allocations created,
//!   destroyed, migrated, ignored and updated
//!
//! Annotation is a pure, synchronous, in-place transformation of an
//! already-built diff tree. Reading documents, configuration and rendering
//! live in the surrounding modules and the `jobplan` binary.
//!
//! ## Modules
//!
//! - [`diff`]: Diff tree model, hashing, validation and loading
//! - [`plan`]: Scheduler plan annotations
//! - [`annotate`]: Update causes and the annotation walk
//! - [`report`]: Summaries of annotated diffs
//! - [`config`]: Configuration parsing
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```
//! use jobplan_annotate::annotate::annotate;
//! use jobplan_annotate::diff::{DiffType, FieldDiff, JobDiff, TaskGroupDiff};
//!
//! let mut diff = JobDiff::edited("example").with_task_group(
//!     TaskGroupDiff::new("web", DiffType::Edited)
//!         .with_field(FieldDiff::edited("Count", "1", "3")),
//! );
//!
//! annotate(&mut diff, None).unwrap();
//! assert_eq!(diff.task_groups[0].fields[0].annotations, ["forces create"]);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod annotate;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod plan;
pub mod report;

// ============================================================================
// Re-exports
// ============================================================================

pub use annotate::{Annotator, ErrorPolicy, UpdateCause, annotate};
pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{AnnotatorConfig, ConfigParser};
pub use diff::{DiffHasher, DiffValidator, DocumentLoader, JobDiff};
pub use error::{AnnotateError, JobPlanError, MalformedCountError, Result};
pub use plan::PlanAnnotations;
pub use report::{AnnotationReport, AnnotationSummary};
