//! Configuration module for the annotator.
//!
//! This module handles:
//! - Parsing and deserializing `jobplan.yaml`
//! - Environment variable overrides
//! - Locating the configuration file

mod parser;
mod spec;

pub use parser::{
    ConfigParser, DEFAULT_CONFIG_FILES, ENV_COLOR, ENV_ERROR_POLICY, ENV_OUTPUT_FORMAT,
    find_config_file,
};
pub use spec::{AnnotateConfig, AnnotatorConfig, OutputConfig, OutputFormat};
