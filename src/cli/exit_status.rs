use std::process::ExitCode;

/// Exit status for CLI commands, following common conventions for linter tools.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Command completed successfully, no problems found.
    Success,
    /// Command completed but found problems (errors/warnings).
    Failure,
    /// Command failed (bad config, unreadable source root, etc.).
    Error,
}

impl ExitStatus {
    pub fn from_problem_count(problems: usize) -> Self {
        if problems == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
