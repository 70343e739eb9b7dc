//! jobplan CLI entrypoint.
//!
//! This is the main entrypoint for the jobplan command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use jobplan_annotate::annotate::{Annotator, ErrorPolicy};
use jobplan_annotate::cli::{Cli, Commands, OutputFormatter};
use jobplan_annotate::config::{AnnotatorConfig, ConfigParser, find_config_file};
use jobplan_annotate::diff::{DiffValidator, DocumentLoader};
use jobplan_annotate::error::Result;
use jobplan_annotate::report::AnnotationReport;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_json);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool, json: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Dispatches the parsed command.
fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_ref())?;

    if let Some(format) = cli.output {
        config.output.format = format;
    }
    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let formatter = OutputFormatter::new(config.output.format);

    match cli.command {
        Commands::Init { path, force } => cmd_init(&path, force),
        Commands::Annotate {
            diff,
            plan,
            error_policy,
        } => {
            let policy = error_policy.unwrap_or(config.annotate.error_policy);
            cmd_annotate(&diff, plan.as_deref(), policy, &formatter)
        }
        Commands::Validate {
            diff,
            plan,
            warnings,
        } => cmd_validate(&diff, plan.as_deref(), warnings, &formatter),
    }
}

/// Write a configuration template.
fn cmd_init(path: &Path, force: bool) -> Result<()> {
    info!("Initializing jobplan configuration in: {}", path.display());

    let config_path = path.join("jobplan.yaml");

    if !force && config_path.exists() {
        eprintln!("Configuration file already exists: {}", config_path.display());
        eprintln!("Use --force to overwrite.");
        return Ok(());
    }

    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }

    let config_template = include_str!("../templates/jobplan.yaml");
    std::fs::write(&config_path, config_template)?;
    eprintln!("Created: {}", config_path.display());

    Ok(())
}

/// Annotate a diff and print the report.
fn cmd_annotate(
    diff_path: &Path,
    plan_path: Option<&Path>,
    policy: ErrorPolicy,
    formatter: &OutputFormatter,
) -> Result<()> {
    let loader = DocumentLoader::new();
    let diff = loader.load_diff(diff_path)?;
    let plan = plan_path.map(|p| loader.load_plan(p)).transpose()?;

    let annotator = Annotator::new().with_error_policy(policy);
    let report = AnnotationReport::build(&annotator, diff, plan.as_ref())?;

    debug!("Annotated job '{}': {}", report.job_id, report.summary);
    write_stdout(&formatter.format_report(&report))
}

/// Validate a diff against the producer contract.
fn cmd_validate(
    diff_path: &Path,
    plan_path: Option<&Path>,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let loader = DocumentLoader::new();
    let diff = loader.load_diff(diff_path)?;
    let plan = plan_path.map(|p| loader.load_plan(p)).transpose()?;

    let validator = DiffValidator::new();
    let result = validator.check(&diff, plan.as_ref());
    write_stdout(&formatter.format_validation(&result, show_warnings))?;

    validator.validate(&diff, plan.as_ref()).map(|_| ())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Loads the configuration file, falling back to defaults when none exists.
fn load_config(config_path: Option<&PathBuf>) -> Result<AnnotatorConfig> {
    let config_file = config_path.cloned().or_else(|| find_config_file("."));

    let parser = ConfigParser::new().with_base_path(
        config_file
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new(".")),
    );
    parser.load_dotenv()?;

    if let Some(path) = config_file {
        debug!("Loading configuration from: {}", path.display());
        parser.load_with_env(&path)
    } else {
        debug!("No configuration file found, using defaults");
        let mut config = AnnotatorConfig::default();
        ConfigParser::apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
        Ok(config)
    }
}

/// Writes command output to stdout.
fn write_stdout(output: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
