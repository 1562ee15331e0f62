use anyhow::Result;

use super::{CommandResult, CommandSummary, ScanContext};
use crate::cli::args::CheckCommand;
use crate::core::collect::{CollectOptions, collect_localizable};
use crate::core::file_scanner::SourceKind;
use crate::issues::{HardcodedTextIssue, Issue, ParseErrorIssue, SourceContext};

pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let ctx = ScanContext::new(&cmd.common)?;
    let options = ctx.config.collect_options();

    let (issues, files_checked) = ctx.scan_sources(&[SourceKind::Markup], |_, path, content| {
        hardcoded_text_issues(path, content, &options)
    });

    Ok(CommandResult::new(
        CommandSummary::Check,
        issues,
        files_checked,
    ))
}

/// Hardcoded text issues of one markup document.
pub fn hardcoded_text_issues(path: &str, markup: &str, options: &CollectOptions) -> Vec<Issue> {
    match collect_localizable(markup, options) {
        Ok(items) => items
            .into_iter()
            .map(|item| {
                Issue::HardcodedText(HardcodedTextIssue {
                    context: SourceContext::from_source(
                        path,
                        markup,
                        item.position.line,
                        item.position.column,
                    ),
                    text: item.text,
                    source: item.source,
                })
            })
            .collect(),
        Err(e) => vec![Issue::ParseError(ParseErrorIssue {
            file_path: path.to_string(),
            error: e.to_string(),
        })],
    }
}
