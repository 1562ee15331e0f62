use crate::cli::exit_status::ExitStatus;
use crate::issues::{Issue, Report, Severity};

#[derive(Debug)]
pub enum CommandSummary {
    Check,
    Refs(RefsSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct RefsSummary {
    /// Keys searched for.
    pub keys: Vec<String>,
}

impl RefsSummary {
    /// Keys with no reference among `issues`.
    pub fn unreferenced_keys<'a>(&'a self, issues: &[Issue]) -> Vec<&'a str> {
        self.keys
            .iter()
            .filter(|key| {
                !issues
                    .iter()
                    .any(|issue| matches!(issue, Issue::ResourceReference(r) if &r.key == *key))
            })
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug)]
pub struct InitSummary {
    /// False when a config file already existed.
    pub created: bool,
}

/// Result of running a locscan command.
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// All issues found, sorted by location.
    pub issues: Vec<Issue>,
    /// Number of files that could not be read or parsed.
    pub parse_error_count: usize,
    /// Number of source files scanned.
    pub files_checked: usize,
}

impl CommandResult {
    pub fn new(summary: CommandSummary, mut issues: Vec<Issue>, files_checked: usize) -> Self {
        issues.sort_by(compare_issues);
        let parse_error_count = issues
            .iter()
            .filter(|i| matches!(i, Issue::ParseError(_)))
            .count();

        Self {
            summary,
            issues,
            parse_error_count,
            files_checked,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity() == severity)
            .count()
    }

    /// Notes never fail a run.
    pub fn exit_status(&self) -> ExitStatus {
        if let CommandSummary::Init(summary) = &self.summary
            && !summary.created
        {
            return ExitStatus::Failure;
        }
        ExitStatus::from_problem_count(self.count(Severity::Error) + self.count(Severity::Warning))
    }
}

/// Path, then line, then column, then rule.
pub fn compare_issues(a: &Issue, b: &Issue) -> std::cmp::Ordering {
    let a_loc = a.location();
    let b_loc = b.location();
    a_loc
        .position()
        .cmp(&b_loc.position())
        .then_with(|| a.rule().cmp(&b.rule()))
}
