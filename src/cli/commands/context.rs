use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use rayon::prelude::*;

use crate::cli::args::CommonArgs;
use crate::config::{Config, load_config};
use crate::core::file_scanner::{ScanOptions, ScanResult, SourceFile, SourceKind, scan_files};
use crate::issues::{Issue, ParseErrorIssue};

/// Configuration and discovered sources for one command run.
pub struct ScanContext {
    pub config: Config,
    pub source_root: PathBuf,
    pub files: ScanResult,
    pub verbose: bool,
}

impl ScanContext {
    pub fn new(common: &CommonArgs) -> Result<Self> {
        let start_dir = match &common.source_root {
            Some(root) => root.clone(),
            None => env::current_dir().context("Failed to read the current directory")?,
        };
        let loaded = load_config(&start_dir)?;
        if common.verbose {
            if loaded.from_file {
                eprintln!("{} using config file", "info:".dimmed());
            } else {
                eprintln!("{} no config file found, using defaults", "info:".dimmed());
            }
        }

        let source_root = match &common.source_root {
            Some(root) => root.clone(),
            None => PathBuf::from(&loaded.config.source_root),
        };
        if !source_root.is_dir() {
            bail!("Source root is not a directory: {}", source_root.display());
        }

        let config = loaded.config;
        let base_dir = source_root.to_string_lossy().into_owned();
        let files = scan_files(&ScanOptions {
            base_dir: &base_dir,
            includes: &config.includes,
            ignores: &config.ignores,
            markup_extensions: &config.markup_extensions,
            code_extensions: &config.code_extensions,
            verbose: common.verbose,
        });

        if common.verbose && files.skipped_count > 0 {
            eprintln!(
                "{} {} path(s) could not be accessed",
                "warning:".bold().yellow(),
                files.skipped_count
            );
        }

        Ok(Self {
            config,
            source_root,
            files,
            verbose: common.verbose,
        })
    }

    /// Path as shown in reports: relative to the source root when possible.
    pub fn display_path(&self, path: &str) -> String {
        Path::new(path)
            .strip_prefix(&self.source_root)
            .map(|relative| relative.to_string_lossy().into_owned())
            .unwrap_or_else(|_| path.to_string())
    }

    /// Read every file of `kinds` in parallel and hand its content to `scan`.
    ///
    /// Unreadable files become parse errors. Empty files are skipped.
    pub fn scan_sources<F>(&self, kinds: &[SourceKind], scan: F) -> (Vec<Issue>, usize)
    where
        F: Fn(&SourceFile, &str, &str) -> Vec<Issue> + Sync,
    {
        let files: Vec<&SourceFile> = self
            .files
            .files
            .iter()
            .filter(|file| kinds.contains(&file.kind))
            .collect();

        let issues = files
            .par_iter()
            .flat_map(|file| {
                let display_path = self.display_path(&file.path);
                match fs::read_to_string(&file.path) {
                    Ok(content) if content.is_empty() => Vec::new(),
                    Ok(content) => scan(*file, &display_path, &content),
                    Err(e) => {
                        if self.verbose {
                            eprintln!(
                                "{} Cannot read {}: {}",
                                "warning:".bold().yellow(),
                                display_path,
                                e
                            );
                        }
                        vec![Issue::ParseError(ParseErrorIssue {
                            file_path: display_path,
                            error: e.to_string(),
                        })]
                    }
                }
            })
            .collect();

        (issues, files.len())
    }
}
