//! Localizable text collection.
//!
//! [`LocalizableTextCollector`] listens to the markup parser and keeps the
//! text a user would see: plain text between tags and literal values of
//! display attributes such as `Text` or `ToolTip`.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::ScanError;
use crate::core::markup::{ElementBeginContext, MarkupHandler, PlainTextContext, parse_markup};
use crate::core::span::Position;

/// `&nbsp;`, `&#169;`, `&#x2014;`
static ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);").unwrap());

/// Attribute marking an element as already bound to a local resource.
const RESOURCE_KEY_ATTRIBUTE: &str = "meta:resourcekey";

/// Text contains at least one letter once character entities are removed.
pub fn has_letters(text: &str) -> bool {
    ENTITY_REGEX
        .replace_all(text, " ")
        .chars()
        .any(char::is_alphabetic)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    PlainText,
    Attribute { element: String, attribute: String },
}

/// A piece of user-visible text, trimmed, located at its first non-blank char.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localizable {
    pub text: String,
    pub position: Position,
    pub source: TextSource,
}

#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub checked_attributes: Vec<String>,
    pub ignore_texts: HashSet<String>,
    pub ignore_client_comments: bool,
}

impl CollectOptions {
    fn is_checked(&self, attribute: &str) -> bool {
        self.checked_attributes
            .iter()
            .any(|name| name.eq_ignore_ascii_case(attribute))
    }
}

pub struct LocalizableTextCollector<'a> {
    options: &'a CollectOptions,
    items: Vec<Localizable>,
}

impl<'a> LocalizableTextCollector<'a> {
    pub fn new(options: &'a CollectOptions) -> Self {
        Self {
            options,
            items: Vec::new(),
        }
    }

    pub fn into_items(self) -> Vec<Localizable> {
        self.items
    }

    fn push(&mut self, raw: &str, start: Position, source: TextSource) {
        let text = raw.trim();
        if text.is_empty() || !has_letters(text) || self.options.ignore_texts.contains(text) {
            return;
        }
        let leading = &raw[..raw.len() - raw.trim_start().len()];
        self.items.push(Localizable {
            text: text.to_string(),
            position: start.after(leading),
            source,
        });
    }
}

impl MarkupHandler for LocalizableTextCollector<'_> {
    fn on_element_begin(&mut self, context: &ElementBeginContext) {
        if context.within_client_side_comment && self.options.ignore_client_comments {
            return;
        }
        if context.attribute(RESOURCE_KEY_ATTRIBUTE).is_some() {
            return;
        }

        let element = context.full_name();
        for attribute in &context.attributes {
            if attribute.contains_asp_tags || !self.options.is_checked(&attribute.name) {
                continue;
            }
            self.push(
                &attribute.value,
                attribute.value_span.start(),
                TextSource::Attribute {
                    element: element.clone(),
                    attribute: attribute.name.clone(),
                },
            );
        }
    }

    fn on_plain_text(&mut self, context: &PlainTextContext) {
        if context.within_client_side_comment && self.options.ignore_client_comments {
            return;
        }
        self.push(
            &context.text,
            context.block_span.start(),
            TextSource::PlainText,
        );
    }
}

/// Parse `markup` and return its localizable texts in document order.
pub fn collect_localizable(
    markup: &str,
    options: &CollectOptions,
) -> Result<Vec<Localizable>, ScanError> {
    let mut collector = LocalizableTextCollector::new(options);
    parse_markup(markup, &mut collector)?;
    Ok(collector.into_items())
}
