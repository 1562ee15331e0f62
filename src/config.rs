use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::collect::CollectOptions;

pub const CONFIG_FILE_NAME: &str = ".locscanrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_markup_extensions")]
    pub markup_extensions: Vec<String>,
    #[serde(default = "default_code_extensions")]
    pub code_extensions: Vec<String>,
    #[serde(default = "default_checked_attributes")]
    pub checked_attributes: Vec<String>,
    #[serde(default)]
    pub ignore_texts: Vec<String>,
    #[serde(default = "default_ignore_client_comments")]
    pub ignore_client_comments: bool,
    #[serde(default)]
    pub resource_keys: Vec<String>,
}

fn default_ignores() -> Vec<String> {
    ["**/bin/**", "**/obj/**"].map(String::from).to_vec()
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_markup_extensions() -> Vec<String> {
    ["aspx", "ascx", "master"].map(String::from).to_vec()
}

fn default_code_extensions() -> Vec<String> {
    ["cs", "vb"].map(String::from).to_vec()
}

fn default_checked_attributes() -> Vec<String> {
    [
        "Text",
        "ToolTip",
        "HeaderText",
        "ErrorMessage",
        "title",
        "alt",
        "placeholder",
    ]
    .map(String::from)
    .to_vec()
}

fn default_ignore_client_comments() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignores: default_ignores(),
            includes: Vec::new(),
            source_root: default_source_root(),
            markup_extensions: default_markup_extensions(),
            code_extensions: default_code_extensions(),
            checked_attributes: default_checked_attributes(),
            ignore_texts: Vec::new(),
            ignore_client_comments: default_ignore_client_comments(),
            resource_keys: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Rejects invalid glob patterns in `ignores` or `includes` and blank
    /// resource keys.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Includes without wildcards are literal paths, brackets and all.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if self.resource_keys.iter().any(|key| key.trim().is_empty()) {
            bail!("Empty key in 'resourceKeys'");
        }

        Ok(())
    }

    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            checked_attributes: self.checked_attributes.clone(),
            ignore_texts: self.ignore_texts.iter().cloned().collect::<HashSet<_>>(),
            ignore_client_comments: self.ignore_client_comments,
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
