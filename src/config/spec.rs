//! Configuration specification types for the annotator.
//!
//! These structs map to the `jobplan.yaml` file. Every section is optional;
//! an empty file yields the defaults.

use serde::{Deserialize, Serialize};

use crate::annotate::ErrorPolicy;

/// The root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Annotation behaviour.
    pub annotate: AnnotateConfig,
    /// Output settings.
    pub output: OutputConfig,
}

/// Annotation behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnnotateConfig {
    /// What to do when a task group's count is malformed.
    pub error_policy: ErrorPolicy,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format.
    pub format: OutputFormat,
    /// Whether to colorize text output.
    pub color: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
        }
    }
}
