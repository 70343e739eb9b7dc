//! CLI module for the jobplan tool.
//!
//! This module provides the command-line interface for previewing
//! annotated job plans.

mod commands;
mod output;

pub use crate::config::OutputFormat;
pub use commands::{Cli, Commands};
pub use output::OutputFormatter;
