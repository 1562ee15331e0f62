//! Resource key references in code and markup.
//!
//! Keys are dotted paths such as `Resources.Strings.Title`. Code may break a
//! long member chain after a dot, so whitespace following a dot is tolerated.

use serde::Serialize;

use crate::core::ScanError;
use crate::core::markup::{
    CodeBlockContext, ElementBeginContext, MarkupHandler, OutputElementContext, PlainTextContext,
    parse_markup,
};
use crate::core::span::Position;
use crate::core::trie::Trie;

/// One occurrence of a resource key. `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceReference {
    pub key: String,
    pub start: Position,
    pub end: Position,
}

/// Finds resource keys as whole identifiers.
#[derive(Debug)]
pub struct ReferenceScanner {
    trie: Trie,
}

impl ReferenceScanner {
    pub fn new<I, S>(keys: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            trie: Trie::from_patterns(keys)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// References in `text`, which starts at `origin` in its document.
    ///
    /// A match glued to an identifier character on either side is part of a
    /// longer name and is skipped.
    pub fn scan(&self, text: &str, origin: Position) -> Vec<ResourceReference> {
        // The trie is compiled in `new`.
        let Ok(matches) = self.trie.find_all(text) else {
            return Vec::new();
        };
        if matches.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let mut positions = Vec::with_capacity(chars.len() + 1);
        let mut position = origin;
        for &c in &chars {
            positions.push(position);
            position.advance(c);
        }
        positions.push(position);

        matches
            .into_iter()
            .filter(|m| {
                let before = m.start.checked_sub(1).map(|i| chars[i]);
                let after = chars.get(m.end).copied();
                !before.is_some_and(is_identifier_char) && !after.is_some_and(is_identifier_char)
            })
            .map(|m| ResourceReference {
                key: m.pattern.to_string(),
                start: positions[m.start],
                end: positions[m.end],
            })
            .collect()
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Markup handler scanning every fragment that may hold a key: server code,
/// output expressions, attribute values and plain text.
pub struct MarkupReferenceCollector<'a> {
    scanner: &'a ReferenceScanner,
    references: Vec<ResourceReference>,
}

impl<'a> MarkupReferenceCollector<'a> {
    pub fn new(scanner: &'a ReferenceScanner) -> Self {
        Self {
            scanner,
            references: Vec::new(),
        }
    }

    /// References ordered by position. Server tags inside attribute values are
    /// seen twice (as a tag and as part of the value) and reported once.
    pub fn into_references(mut self) -> Vec<ResourceReference> {
        self.references.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.key.cmp(&b.key)));
        self.references.dedup_by(|a, b| a.start == b.start && a.key == b.key);
        self.references
    }

    fn scan(&mut self, text: &str, origin: Position) {
        let found = self.scanner.scan(text, origin);
        self.references.extend(found);
    }
}

impl MarkupHandler for MarkupReferenceCollector<'_> {
    fn on_element_begin(&mut self, context: &ElementBeginContext) {
        for attribute in &context.attributes {
            self.scan(&attribute.value, attribute.value_span.start());
        }
    }

    fn on_output_element(&mut self, context: &OutputElementContext) {
        self.scan(&context.expression, context.inner_block_span.start());
    }

    fn on_code_block(&mut self, context: &CodeBlockContext) {
        self.scan(&context.block_text, context.inner_block_span.start());
    }

    fn on_plain_text(&mut self, context: &PlainTextContext) {
        self.scan(&context.text, context.block_span.start());
    }
}

/// References in a markup document.
pub fn markup_references(
    markup: &str,
    scanner: &ReferenceScanner,
) -> Result<Vec<ResourceReference>, ScanError> {
    let mut collector = MarkupReferenceCollector::new(scanner);
    parse_markup(markup, &mut collector)?;
    Ok(collector.into_references())
}

/// References in a code file, scanned as one fragment.
pub fn code_references(code: &str, scanner: &ReferenceScanner) -> Vec<ResourceReference> {
    scanner.scan(code, Position::default())
}
