//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::annotate::ErrorPolicy;
use crate::config::OutputFormat;

/// jobplan - Explain what applying a job change will do.
#[derive(Parser, Debug)]
#[command(name = "jobplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, env = "JOBPLAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json). Overrides the configuration file.
    #[arg(long, global = true)]
    pub output: Option<OutputFormat>,

    /// Emit log lines as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a configuration template.
    Init {
        /// Directory to initialize (defaults to current directory).
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Force overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },

    /// Annotate a job diff with the update each change forces.
    Annotate {
        /// Job diff document (.json, .yaml).
        #[arg(short, long)]
        diff: PathBuf,

        /// Scheduler plan annotations document (.json, .yaml).
        #[arg(short, long)]
        plan: Option<PathBuf>,

        /// Behaviour on malformed task group counts.
        #[arg(long)]
        error_policy: Option<ErrorPolicy>,
    },

    /// Check a job diff against the producer contract.
    Validate {
        /// Job diff document (.json, .yaml).
        #[arg(short, long)]
        diff: PathBuf,

        /// Scheduler plan annotations document (.json, .yaml).
        #[arg(short, long)]
        plan: Option<PathBuf>,

        /// Show all warnings, not just errors.
        #[arg(short, long)]
        warnings: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_annotate() {
        let cli = Cli::try_parse_from([
            "jobplan",
            "--output",
            "json",
            "annotate",
            "--diff",
            "diff.json",
            "--plan",
            "plan.yaml",
            "--error-policy",
            "aggregate",
        ])
        .unwrap();

        assert!(matches!(cli.output, Some(OutputFormat::Json)));
        match cli.command {
            Commands::Annotate {
                diff,
                plan,
                error_policy,
            } => {
                assert_eq!(diff, PathBuf::from("diff.json"));
                assert_eq!(plan, Some(PathBuf::from("plan.yaml")));
                assert_eq!(error_policy, Some(ErrorPolicy::Aggregate));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_annotate_requires_diff() {
        assert!(Cli::try_parse_from(["jobplan", "annotate"]).is_err());
    }

    #[test]
    fn test_error_policy_names() {
        let cli = Cli::try_parse_from([
            "jobplan",
            "annotate",
            "-d",
            "diff.json",
            "--error-policy",
            "fail-fast",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Annotate {
                error_policy: Some(ErrorPolicy::FailFast),
                ..
            }
        ));
    }
}
