//! Command-line layer: argument parsing, command dispatch and reporting.

use std::env;

use anyhow::{Context, Result};

mod args;
pub mod commands;
mod exit_status;
pub mod report;

pub use args::{Arguments, CheckCommand, Command, CommonArgs, RefsCommand};
pub use exit_status::ExitStatus;

use commands::{check::check, init::init, refs::refs};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let verbose = args.verbose();

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    let (result, json) = match args.command {
        Some(Command::Check(cmd)) => {
            let json = cmd.common.json;
            (check(cmd)?, json)
        }
        Some(Command::Refs(cmd)) => {
            let json = cmd.common.json;
            (refs(cmd)?, json)
        }
        Some(Command::Init) => {
            let dir = env::current_dir().context("Failed to read the current directory")?;
            (init(&dir)?, false)
        }
        None => return Ok(ExitStatus::Success),
    };

    report::print(&result, json, verbose)?;
    Ok(result.exit_status())
}
