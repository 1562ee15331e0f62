//! Core scanning engine.
//!
//! - `markup`: streaming ASPX parser and its handler interface
//! - `trie`: Aho-Corasick matcher for dotted resource keys
//! - `collect`: markup handler gathering localizable text
//! - `references`: resource key lookups over code and markup
//! - `file_scanner`: source discovery

pub mod collect;
pub mod error;
pub mod file_scanner;
pub mod markup;
pub mod references;
pub mod span;
pub mod trie;

pub use error::ScanError;
