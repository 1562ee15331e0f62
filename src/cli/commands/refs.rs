use anyhow::{Context, Result, bail};

use super::{CommandResult, CommandSummary, RefsSummary, ScanContext};
use crate::cli::args::RefsCommand;
use crate::core::file_scanner::SourceKind;
use crate::core::references::{
    ReferenceScanner, ResourceReference, code_references, markup_references,
};
use crate::issues::{Issue, ParseErrorIssue, ResourceReferenceIssue, SourceContext};

pub fn refs(cmd: RefsCommand) -> Result<CommandResult> {
    let ctx = ScanContext::new(&cmd.common)?;

    let keys: Vec<String> = if cmd.keys.is_empty() {
        ctx.config.resource_keys.clone()
    } else {
        cmd.keys
    };
    if keys.is_empty() {
        bail!("No resource keys given. Use --key or set 'resourceKeys' in the config file.");
    }
    let scanner = ReferenceScanner::new(&keys).context("Invalid resource key")?;

    let (issues, files_checked) = ctx.scan_sources(
        &[SourceKind::Markup, SourceKind::Code],
        |file, path, content| reference_issues(file.kind, path, content, &scanner),
    );

    Ok(CommandResult::new(
        CommandSummary::Refs(RefsSummary { keys }),
        issues,
        files_checked,
    ))
}

/// Reference issues of one source file.
pub fn reference_issues(
    kind: SourceKind,
    path: &str,
    content: &str,
    scanner: &ReferenceScanner,
) -> Vec<Issue> {
    let references: Vec<ResourceReference> = match kind {
        SourceKind::Code => code_references(content, scanner),
        SourceKind::Markup => match markup_references(content, scanner) {
            Ok(references) => references,
            Err(e) => {
                return vec![Issue::ParseError(ParseErrorIssue {
                    file_path: path.to_string(),
                    error: e.to_string(),
                })];
            }
        },
    };

    references
        .into_iter()
        .map(|reference| {
            Issue::ResourceReference(ResourceReferenceIssue {
                context: SourceContext::from_source(
                    path,
                    content,
                    reference.start.line,
                    reference.start.column,
                ),
                key: reference.key,
            })
        })
        .collect()
}
