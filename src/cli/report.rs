//! Report formatting and printing utilities.
//!
//! Issues are shown in cargo-style format, or as JSON with `--json`.
//! Kept apart from the scanners so locscan can be used as a library.

use std::io::{self, Write};

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CommandResult, CommandSummary, RefsSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print a command result to stdout (diagnostics go to stderr).
pub fn print(result: &CommandResult, json: bool, verbose: bool) -> Result<()> {
    if let CommandSummary::Init(summary) = &result.summary {
        if summary.created {
            println!(
                "{} {}",
                SUCCESS_MARK.green(),
                format!("Created {}", CONFIG_FILE_NAME).green()
            );
        } else {
            eprintln!(
                "{} {} already exists",
                "error:".bold().red(),
                CONFIG_FILE_NAME
            );
        }
        return Ok(());
    }

    if json {
        let mut stdout = io::stdout().lock();
        print_json_to(result, &mut stdout)?;
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    if result.issues.is_empty() {
        print_success_to(result.files_checked, &mut stdout);
    } else {
        report_to(&result.issues, &mut stdout);
    }
    if let CommandSummary::Refs(summary) = &result.summary {
        print_unreferenced_to(summary, &result.issues, &mut stdout);
    }
    print_parse_warning_to(result.parse_error_count, verbose, &mut io::stderr().lock());
    Ok(())
}

/// Print issues to a custom writer. Issues are expected sorted.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let max_line_width = calculate_max_line_width(issues);
    for issue in issues {
        print_issue(issue, writer, max_line_width);
    }
    print_summary(issues, writer);
}

/// Print a success message when nothing was found.
pub fn print_success_to<W: Write>(files_checked: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} {} - no issues found",
            files_checked,
            if files_checked == 1 { "file" } else { "files" }
        )
        .green()
    );
}

/// Print a warning about files that could not be parsed.
pub fn print_parse_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

fn print_unreferenced_to<W: Write>(summary: &RefsSummary, issues: &[Issue], writer: &mut W) {
    for key in summary.unreferenced_keys(issues) {
        let _ = writeln!(
            writer,
            "{} no references to \"{}\"",
            "note:".bold().green(),
            key
        );
    }
}

// ============================================================
// JSON Output
// ============================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    files_checked: usize,
    issues: Vec<JsonIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unreferenced_keys: Option<Vec<&'a str>>,
}

#[derive(Serialize)]
struct JsonIssue {
    severity: Severity,
    rule: String,
    message: String,
    file: String,
    line: usize,
    col: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl From<&Issue> for JsonIssue {
    fn from(issue: &Issue) -> Self {
        let location = issue.location();
        let (file, line, col) = location.position();
        Self {
            severity: issue.report_severity(),
            rule: issue.report_rule().to_string(),
            message: issue.message(),
            file: file.to_string(),
            line,
            col,
            details: issue.details(),
        }
    }
}

pub fn print_json_to<W: Write>(result: &CommandResult, writer: &mut W) -> Result<()> {
    let unreferenced_keys = match &result.summary {
        CommandSummary::Refs(summary) => Some(summary.unreferenced_keys(&result.issues)),
        _ => None,
    };
    let report = JsonReport {
        files_checked: result.files_checked,
        issues: result.issues.iter().map(JsonIssue::from).collect(),
        unreferenced_keys,
    };
    serde_json::to_writer_pretty(&mut *writer, &report).context("Failed to write JSON report")?;
    writeln!(writer).context("Failed to write JSON report")?;
    Ok(())
}

// ============================================================
// Internal Functions
// ============================================================

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
        Severity::Note => "note".bold().green(),
    }
}

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let loc = issue.location();
    let severity = issue.report_severity();

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_label(severity),
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    match &loc {
        ReportLocation::Source(ctx) => {
            let _ = writeln!(
                writer,
                "  {} {}:{}:{}",
                "-->".blue(),
                ctx.file_path(),
                ctx.line(),
                ctx.col()
            );
            print_source_line(
                writer,
                &ctx.source_line,
                ctx.line(),
                ctx.col(),
                severity,
                max_line_width,
            );
        }
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer);
}

fn print_source_line<W: Write>(
    writer: &mut W,
    source_line: &str,
    line: usize,
    col: usize,
    severity: Severity,
    max_line_width: usize,
) {
    let caret_char = match severity {
        Severity::Error => "^".red(),
        Severity::Warning => "^".yellow(),
        Severity::Note => "^".green(),
    };

    let _ = writeln!(
        writer,
        "{:>width$} {}",
        "",
        "|".blue(),
        width = max_line_width
    );
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        line.to_string().blue(),
        "|".blue(),
        source_line,
        width = max_line_width
    );

    // col is 1-based
    let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        caret_char,
        width = max_line_width,
        padding = caret_padding
    );
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let count = |severity| {
        issues
            .iter()
            .filter(|i| i.report_severity() == severity)
            .count()
    };
    let total_errors = count(Severity::Error);
    let total_warnings = count(Severity::Warning);
    let total_notes = count(Severity::Note);
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} problems ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
    if total_notes > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} found",
            SUCCESS_MARK.green(),
            total_notes,
            if total_notes == 1 {
                "reference"
            } else {
                "references"
            }
        );
    }
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(ctx) => Some(ctx.line()),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}
