//! Configuration parser for loading the annotator configuration.
//!
//! Configuration comes from an optional YAML file, then environment
//! variables, with the CLI flags applied last by the binary.

use crate::annotate::ErrorPolicy;
use crate::error::{ConfigError, JobPlanError, Result};
use std::path::Path;
use tracing::{debug, info};

use super::spec::{AnnotatorConfig, OutputFormat};

/// Environment variable overriding `annotate.error_policy`.
pub const ENV_ERROR_POLICY: &str = "JOBPLAN_ERROR_POLICY";
/// Environment variable overriding `output.format`.
pub const ENV_OUTPUT_FORMAT: &str = "JOBPLAN_OUTPUT_FORMAT";
/// Environment variable overriding `output.color`.
pub const ENV_COLOR: &str = "JOBPLAN_COLOR";

/// Configuration parser for loading annotator configuration.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving the `.env` file.
    base_path: Option<std::path::PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path used to find the `.env` file.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<AnnotatorConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(JobPlanError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::parse(format!("Failed to read file: {e}"), path.display().to_string())
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<AnnotatorConfig> {
        debug!("Parsing YAML configuration");

        if content.trim().is_empty() {
            return Ok(AnnotatorConfig::default());
        }

        serde_yaml::from_str(content).map_err(|e| {
            JobPlanError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location: source.map(|p| p.display().to_string()),
            })
        })
    }

    /// Loads configuration with environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an
    /// override carries an invalid value.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<AnnotatorConfig> {
        let mut config = self.load_file(path)?;
        Self::apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies environment overrides, reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value we do not accept.
    pub fn apply_env_overrides<F>(config: &mut AnnotatorConfig, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ERROR_POLICY) {
            debug!("Overriding annotate.error_policy from environment");
            config.annotate.error_policy = match value.trim().to_ascii_lowercase().as_str() {
                "fail_fast" | "fail-fast" => ErrorPolicy::FailFast,
                "rollback" => ErrorPolicy::Rollback,
                "aggregate" => ErrorPolicy::Aggregate,
                _ => return Err(invalid_override(ENV_ERROR_POLICY, value, "fail_fast, rollback, aggregate")),
            };
        }

        if let Some(value) = lookup(ENV_OUTPUT_FORMAT) {
            debug!("Overriding output.format from environment");
            config.output.format = match value.trim().to_ascii_lowercase().as_str() {
                "text" => OutputFormat::Text,
                "json" => OutputFormat::Json,
                _ => return Err(invalid_override(ENV_OUTPUT_FORMAT, value, "text, json")),
            };
        }

        if let Some(value) = lookup(ENV_COLOR) {
            debug!("Overriding output.color from environment");
            config.output.color = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(invalid_override(ENV_COLOR, value, "true, false")),
            };
        }

        Ok(())
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| std::path::PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                ConfigError::parse(
                    format!("Failed to load .env file: {e}"),
                    env_path.display().to_string(),
                )
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

fn invalid_override(name: &str, value: String, expected: &str) -> JobPlanError {
    JobPlanError::Config(ConfigError::InvalidOverride {
        name: name.to_string(),
        value,
        expected: expected.to_string(),
    })
}

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["jobplan.yaml", "jobplan.yml"];

/// Finds the configuration file in the given directory or its parents.
///
/// Returns `None` when no configuration file exists; the defaults apply.
#[must_use]
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Option<std::path::PathBuf> {
    let mut current = start_dir.as_ref().to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found configuration file: {}", config_path.display());
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_parse_empty_config() {
        let config = ConfigParser::new().parse_yaml("", None).unwrap();
        assert_eq!(config, AnnotatorConfig::default());
        assert_eq!(config.annotate.error_policy, ErrorPolicy::FailFast);
        assert!(config.output.color);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r"
annotate:
  error_policy: aggregate
output:
  format: json
  color: false
";
        let config = ConfigParser::new().parse_yaml(yaml, None).unwrap();
        assert_eq!(config.annotate.error_policy, ErrorPolicy::Aggregate);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.color);
    }

    #[test]
    fn test_parse_invalid_policy() {
        let yaml = "annotate:\n  error_policy: sometimes\n";
        let err = ConfigParser::new()
            .parse_yaml(yaml, Some(Path::new("jobplan.yaml")))
            .unwrap_err();
        assert!(matches!(
            err,
            JobPlanError::Config(ConfigError::ParseError { location: Some(_), .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AnnotatorConfig::default();
        ConfigParser::apply_env_overrides(
            &mut config,
            lookup_from(&[
                (ENV_ERROR_POLICY, "Rollback"),
                (ENV_OUTPUT_FORMAT, "json"),
                (ENV_COLOR, "0"),
            ]),
        )
        .unwrap();

        assert_eq!(config.annotate.error_policy, ErrorPolicy::Rollback);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.color);
    }

    #[test]
    fn test_invalid_env_override() {
        let mut config = AnnotatorConfig::default();
        let err = ConfigParser::apply_env_overrides(&mut config, lookup_from(&[(ENV_COLOR, "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_COLOR));
    }

    #[test]
    fn test_load_and_find_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("jobs").join("web");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join("jobplan.yaml"),
            "annotate:\n  error_policy: rollback\n",
        )
        .unwrap();

        let found = find_config_file(&nested).unwrap();
        let config = ConfigParser::new().load_file(&found).unwrap();
        assert_eq!(config.annotate.error_policy, ErrorPolicy::Rollback);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConfigParser::new()
            .load_file("/nonexistent/jobplan.yaml")
            .unwrap_err();
        assert!(matches!(err, JobPlanError::Config(ConfigError::FileNotFound { .. })));
    }
}
