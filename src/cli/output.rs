//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying annotated
//! plans to the user in various formats.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::annotate::UpdateCause;
use crate::config::OutputFormat;
use crate::diff::{DiffHasher, DiffType, TaskGroupDiff, ValidationResult};
use crate::report::{AnnotationReport, task_cause};

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Task group row for table display.
#[derive(Tabled)]
struct TaskGroupRow {
    #[tabled(rename = "Group")]
    name: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Count")]
    count: String,
    #[tabled(rename = "Updates")]
    updates: String,
}

/// Task row for table display.
#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Task")]
    task: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Update")]
    update: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats an annotation report for display.
    #[must_use]
    pub fn format_report(&self, report: &AnnotationReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => Self::format_report_text(report),
        }
    }

    /// Formats a report as text.
    fn format_report_text(report: &AnnotationReport) -> String {
        let mut output = String::new();

        let _ = write!(
            output,
            "\nJob Plan: {}\n   Diff hash: {}\n\n",
            report.job_id.bold(),
            DiffHasher::new().short_hash(&report.diff_hash)
        );

        if report.diff.diff_type != DiffType::Edited {
            let _ = writeln!(
                output,
                "   Job is {}, no annotations apply.",
                report.diff.diff_type
            );
            return output;
        }

        let groups: Vec<TaskGroupRow> = report
            .diff
            .task_groups
            .iter()
            .map(|g| TaskGroupRow {
                name: g.name.clone(),
                change: Self::format_change(g.diff_type),
                count: Self::format_count(g),
                updates: Self::format_updates(g),
            })
            .collect();

        if !groups.is_empty() {
            output.push_str(&Table::new(groups).to_string());
            output.push('\n');
        }

        let tasks: Vec<TaskRow> = report
            .diff
            .task_groups
            .iter()
            .flat_map(|g| {
                g.tasks.iter().map(move |t| TaskRow {
                    group: g.name.clone(),
                    task: t.name.clone(),
                    change: Self::format_change(t.diff_type),
                    update: task_cause(t).map_or_else(String::new, Self::format_cause),
                })
            })
            .collect();

        if !tasks.is_empty() {
            output.push('\n');
            output.push_str(&Table::new(tasks).to_string());
            output.push('\n');
        }

        let summary = &report.summary;
        let _ = write!(
            output,
            "\nPlan: {} in-place, {} create/destroy, {} allocations touched\n",
            summary.in_place_tasks.to_string().yellow(),
            summary.destructive_tasks.to_string().red(),
            summary.total_updates()
        );

        if report.has_destructive_changes() {
            let _ = writeln!(
                output,
                "\n{} Some tasks will be stopped and recreated.",
                "!".red().bold()
            );
        }

        output
    }

    /// Formats a validation result.
    #[must_use]
    pub fn format_validation(&self, result: &ValidationResult, show_warnings: bool) -> String {
        match self.format {
            OutputFormat::Json => {
                let errors: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
                let warnings = if show_warnings {
                    result.warnings.clone()
                } else {
                    Vec::new()
                };
                let json = serde_json::json!({
                    "valid": result.is_valid(),
                    "errors": errors,
                    "warnings": warnings,
                });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => {
                let mut output = if result.is_valid() {
                    format!("{} Diff is valid.\n", "ok".green())
                } else {
                    let mut output = format!("{} Diff is invalid:\n", "error".red());
                    for error in &result.errors {
                        let _ = writeln!(output, "   - {error}");
                    }
                    output
                };

                if show_warnings && !result.warnings.is_empty() {
                    let _ = write!(output, "\n{}:\n", "Warnings".yellow());
                    for warning in &result.warnings {
                        let _ = writeln!(output, "   - {warning}");
                    }
                }

                output
            }
        }
    }

    /// Formats a diff type with color.
    fn format_change(diff_type: DiffType) -> String {
        match diff_type {
            DiffType::Added => "+added".green().to_string(),
            DiffType::Deleted => "-deleted".red().to_string(),
            DiffType::Edited => "~edited".yellow().to_string(),
            DiffType::None => "none".dimmed().to_string(),
        }
    }

    /// Formats an update cause with color.
    fn format_cause(cause: UpdateCause) -> String {
        let label = cause.annotation().unwrap_or_else(|| cause.label());
        match cause {
            UpdateCause::Create | UpdateCause::InPlace => label.green().to_string(),
            UpdateCause::Destroy | UpdateCause::Destructive => label.red().to_string(),
            UpdateCause::Ignore | UpdateCause::Migrate => label.dimmed().to_string(),
        }
    }

    /// Formats the count change of a group, with its annotation.
    fn format_count(group: &TaskGroupDiff) -> String {
        group.count_field().map_or_else(String::new, |count| {
            let mut text = format!("{} -> {}", count.old, count.new);
            for annotation in &count.annotations {
                let _ = write!(text, " ({annotation})");
            }
            text
        })
    }

    /// Formats the merged update counts of a group.
    fn format_updates(group: &TaskGroupDiff) -> String {
        group
            .updates
            .iter()
            .map(|(cause, count)| format!("{count} {cause}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
