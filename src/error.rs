//! Error types for the job plan annotator.
//!
//! The annotation core has a single failure mode, a task group whose
//! `Count` field does not parse as an integer. Everything else in this
//! module belongs to the tooling around the core: configuration, input
//! documents and the CLI.

use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the job plan annotator.
#[derive(Debug, Error)]
pub enum JobPlanError {
    /// Annotation errors.
    #[error("Annotation error: {0}")]
    Annotate(#[from] AnnotateError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input document errors.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which side of a count field diff failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountSide {
    /// The value before the change.
    Old,
    /// The value after the change.
    New,
}

impl std::fmt::Display for CountSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Old => write!(f, "old"),
            Self::New => write!(f, "new"),
        }
    }
}

/// A task group's `Count` field diff carries a value that is not a
/// base-10 integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("task group '{task_group}' has a malformed {side} count {value:?}: {source}")]
pub struct MalformedCountError {
    /// Name of the task group owning the field.
    pub task_group: String,
    /// Which value failed to parse.
    pub side: CountSide,
    /// The raw value.
    pub value: String,
    /// The underlying parse failure.
    #[source]
    pub source: ParseIntError,
}

/// Errors raised while annotating a job diff.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotateError {
    /// A single malformed count.
    #[error(transparent)]
    MalformedCount(#[from] MalformedCountError),

    /// Several task groups carried malformed counts (aggregate policy).
    #[error("{} task groups have malformed counts: {}", .0.len(), join_groups(.0))]
    Multiple(Vec<MalformedCountError>),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// An environment override carries a value we do not understand.
    #[error("Invalid value {value:?} for {name}: expected one of {expected}")]
    InvalidOverride {
        /// Name of the environment variable.
        name: String,
        /// The rejected value.
        value: String,
        /// Accepted values.
        expected: String,
    },
}

/// Input document errors.
#[derive(Debug, Error)]
pub enum InputError {
    /// The input document was not found.
    #[error("Input document not found: {path}")]
    NotFound {
        /// Path to the missing document.
        path: PathBuf,
    },

    /// The document extension does not map to a known format.
    #[error("Unsupported document format for {path} (expected .json, .yaml or .yml)")]
    UnsupportedFormat {
        /// Path to the document.
        path: PathBuf,
    },

    /// The document could not be parsed.
    #[error("Failed to parse {path}: {message}")]
    ParseError {
        /// Path to the document.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// The diff violates the producer contract.
    #[error("Diff validation failed: {}", .problems.join("; "))]
    Invalid {
        /// Problems found.
        problems: Vec<String>,
    },
}

/// Result type alias for job plan operations.
pub type Result<T> = std::result::Result<T, JobPlanError>;

fn join_groups(errors: &[MalformedCountError]) -> String {
    errors
        .iter()
        .map(|e| e.task_group.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl AnnotateError {
    /// Collapses a list of errors into one, if any.
    ///
    /// A single error stays a plain `MalformedCount`.
    #[must_use]
    pub fn from_many(mut errors: Vec<MalformedCountError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop().map(Self::MalformedCount),
            _ => Some(Self::Multiple(errors)),
        }
    }

    /// Returns every malformed count carried by this error.
    #[must_use]
    pub fn malformed_counts(&self) -> &[MalformedCountError] {
        match self {
            Self::MalformedCount(e) => std::slice::from_ref(e),
            Self::Multiple(errors) => errors,
        }
    }
}

impl ConfigError {
    /// Creates a parse error with a location.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: Some(location.into()),
        }
    }
}

impl InputError {
    /// Creates a parse error for a document.
    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed(group: &str) -> MalformedCountError {
        let source = "abc".parse::<i64>().unwrap_err();
        MalformedCountError {
            task_group: group.to_string(),
            side: CountSide::Old,
            value: String::from("abc"),
            source,
        }
    }

    #[test]
    fn test_malformed_count_message() {
        let err = malformed("web");
        let msg = err.to_string();
        assert!(msg.contains("'web'"));
        assert!(msg.contains("old count \"abc\""));
    }

    #[test]
    fn test_from_many() {
        assert!(AnnotateError::from_many(vec![]).is_none());

        let single = AnnotateError::from_many(vec![malformed("web")]).unwrap();
        assert!(matches!(single, AnnotateError::MalformedCount(_)));

        let multi = AnnotateError::from_many(vec![malformed("web"), malformed("db")]).unwrap();
        assert_eq!(multi.malformed_counts().len(), 2);
        assert_eq!(
            multi.to_string(),
            "2 task groups have malformed counts: web, db"
        );
    }

    #[test]
    fn test_wraps_into_top_level() {
        let err: JobPlanError = AnnotateError::from(malformed("web")).into();
        assert!(err.to_string().starts_with("Annotation error:"));
    }
}
