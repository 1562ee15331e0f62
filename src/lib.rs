//! locscan - localization scanner for ASP.NET Web Forms projects
//!
//! locscan parses ASPX markup in a single streaming pass and reports
//! user-visible text that is not localized, and finds where resource keys are
//! referenced in markup and code-behind files.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (commands and reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Markup parser, key trie and the collectors built on them
//! - `issues`: Issue type definitions and reporting

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
