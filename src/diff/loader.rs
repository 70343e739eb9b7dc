//! Loading of diff and plan documents from disk.
//!
//! Documents are JSON or YAML, picked by file extension.

use crate::error::{InputError, JobPlanError, Result};
use crate::plan::PlanAnnotations;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info};

use super::types::JobDiff;

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

/// Loader for diff and plan documents.
#[derive(Debug, Default)]
pub struct DocumentLoader;

impl DocumentLoader {
    /// Creates a new document loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads a job diff.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, has an unknown extension or
    /// cannot be parsed.
    pub fn load_diff(&self, path: impl AsRef<Path>) -> Result<JobDiff> {
        let diff: JobDiff = self.load(path.as_ref())?;
        debug!(
            "Loaded diff for job '{}' with {} task groups",
            diff.id,
            diff.task_groups.len()
        );
        Ok(diff)
    }

    /// Loads scheduler plan annotations.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, has an unknown extension or
    /// cannot be parsed.
    pub fn load_plan(&self, path: impl AsRef<Path>) -> Result<PlanAnnotations> {
        let plan: PlanAnnotations = self.load(path.as_ref())?;
        debug!(
            "Loaded plan annotations for {} task groups",
            plan.desired_tg_updates.len()
        );
        Ok(plan)
    }

    /// Parses a document from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content does not parse in the given format.
    pub fn parse_str<T: DeserializeOwned>(
        &self,
        content: &str,
        format: DocumentFormat,
        source: &Path,
    ) -> Result<T> {
        let parsed = match format {
            DocumentFormat::Json => {
                serde_json::from_str(content).map_err(|e| format!("JSON parse error: {e}"))
            }
            DocumentFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| format!("YAML parse error: {e}"))
            }
        };

        parsed.map_err(|message| JobPlanError::Input(InputError::parse(source, message)))
    }

    fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        info!("Loading document: {}", path.display());

        if !path.exists() {
            return Err(JobPlanError::Input(InputError::NotFound {
                path: path.to_path_buf(),
            }));
        }

        let format = DocumentFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| InputError::parse(path, format!("Failed to read file: {e}")))?;

        self.parse_str(&content, format, path)
    }
}

impl DocumentFormat {
    /// Picks the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error for extensions other than json, yaml and yml.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(JobPlanError::Input(InputError::UnsupportedFormat {
                path: path.to_path_buf(),
            })),
        }
    }
}
