//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Report hardcoded user-visible text in markup files
//! - `refs`: Report where resource keys are referenced
//! - `init`: Write a default configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Refs(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Arguments shared by the scanning commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Source root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct RefsCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Resource key to look for (overrides config file)
    /// Can be specified multiple times: --key Resources.A --key Resources.B
    #[arg(long = "key")]
    pub keys: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report hardcoded text in ASPX markup (plain text and display attributes)
    Check(CheckCommand),
    /// Report references to resource keys in markup and code-behind files
    Refs(RefsCommand),
    /// Initialize a new .locscanrc.json configuration file
    Init,
}
