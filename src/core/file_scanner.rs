use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

/// Patterns without wildcards are literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// How a discovered file is scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceKind {
    /// `.aspx`, `.ascx`, `.master`: parsed as markup.
    Markup,
    /// Code-behind: scanned as plain text.
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub kind: SourceKind,
}

pub struct ScanOptions<'a> {
    pub base_dir: &'a str,
    pub includes: &'a [String],
    pub ignores: &'a [String],
    pub markup_extensions: &'a [String],
    pub code_extensions: &'a [String],
    pub verbose: bool,
}

impl ScanOptions<'_> {
    fn classify(&self, path: &Path) -> Option<SourceKind> {
        let extension = path.extension()?.to_str()?;
        let matches = |extensions: &[String]| {
            extensions
                .iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(extension))
        };
        if matches(self.markup_extensions) {
            Some(SourceKind::Markup)
        } else if matches(self.code_extensions) {
            Some(SourceKind::Code)
        } else {
            None
        }
    }
}

/// Result of scanning files. Files are sorted by path.
pub struct ScanResult {
    pub files: Vec<SourceFile>,
    pub skipped_count: usize,
}

impl ScanResult {
    pub fn of_kind(&self, kind: SourceKind) -> impl Iterator<Item = &SourceFile> {
        self.files.iter().filter(move |file| file.kind == kind)
    }
}

pub fn scan_files(options: &ScanOptions) -> ScanResult {
    let base_dir = Path::new(options.base_dir);
    let mut files: BTreeMap<String, SourceKind> = BTreeMap::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in options.ignores {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => {
                    if options.verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    for dir in roots(base_dir, options) {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    if options.verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };
            let path = entry.path();
            let path_str = path.to_string_lossy();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }
            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if !path.is_file() {
                continue;
            }
            if let Some(kind) = options.classify(path) {
                files.insert(path_str.into_owned(), kind);
            }
        }
    }

    ScanResult {
        files: files
            .into_iter()
            .map(|(path, kind)| SourceFile { path, kind })
            .collect(),
        skipped_count,
    }
}

/// Directories to walk: the includes, or the base directory when there are none.
fn roots(base_dir: &Path, options: &ScanOptions) -> Vec<PathBuf> {
    if options.includes.is_empty() {
        return vec![base_dir.to_path_buf()];
    }

    let mut paths = Vec::new();
    for inc in options.includes {
        if is_glob_pattern(inc) {
            let full_pattern = base_dir.join(inc);
            match glob(&full_pattern.to_string_lossy()) {
                Ok(entries) => paths.extend(entries.flatten().filter(|entry| entry.is_dir())),
                Err(e) => {
                    if options.verbose {
                        eprintln!(
                            "{} Invalid glob pattern '{}': {}",
                            "warning:".bold().yellow(),
                            inc,
                            e
                        );
                    }
                }
            }
        } else {
            let path = base_dir.join(inc);
            if path.exists() {
                paths.push(path);
            } else if options.verbose {
                eprintln!(
                    "{} Include path does not exist: {}",
                    "warning:".bold().yellow(),
                    path.display()
                );
            }
        }
    }
    paths
}
