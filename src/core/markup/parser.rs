//! Single-pass streaming parser for ASPX markup.
//!
//! The parser walks the document one character at a time and keeps its state on
//! a few independent axes (tag nesting, server tag content, attribute scanning,
//! client comment, raw text content) because they overlap: a server tag can sit
//! inside a quoted attribute value inside an HTML comment.
//!
//! Recognized delimiters are consumed by peeking ahead and then skipping their
//! remaining characters, so every event fires on the character that completes
//! its unit.

use crate::core::ScanError;
use crate::core::span::{BlockSpan, Position};

use super::context::{
    AttributeInfo, CodeBlockContext, CodeBlockKind, DirectiveContext, ElementBeginContext,
    ElementEndContext, OutputElementContext, OutputElementKind, PlainTextContext,
};
use super::handler::MarkupHandler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagState {
    Outside,
    /// After `<`, reading the element name.
    ElementName,
    /// Inside an opening tag, after its name.
    Attributes,
    /// After `</`, up to `>`.
    EndTag,
    /// Inside `<%@ ... %>`.
    Directive,
    /// `<!DOCTYPE ...>`, `<?xml ...?>`: skipped up to `>`.
    Declaration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServerState {
    None,
    CodeBlock,
    Output(OutputElementKind),
    /// `<%-- ... --%>`
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeState {
    Between,
    Name,
    AfterName,
    BeforeValue,
    /// Reading a value, remembering the opening quote if any.
    Value(Option<char>),
}

/// Content of `<script>` and `<style>` elements is not markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawText {
    None,
    ClientScript,
    ServerScript,
    Style,
}

impl RawText {
    fn closing_name(self) -> &'static str {
        match self {
            RawText::Style => "style",
            _ => "script",
        }
    }
}

/// How an opening tag or directive ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagClose {
    /// `>`
    Open,
    /// `/>`
    SelfClosing,
    /// `%>`
    Directive,
}

/// Streaming ASPX parser reporting to a [`MarkupHandler`].
///
/// ```ignore
/// let mut handler = MyHandler::default();
/// MarkupParser::new(&text, &mut handler)?.with_limit(10, 4).process();
/// ```
pub struct MarkupParser<'h, H: MarkupHandler> {
    text: Vec<char>,
    handler: &'h mut H,
    /// Inclusive (line, column) ceiling.
    limit: Option<(usize, usize)>,

    pos: Position,
    /// Remaining characters of an already recognized delimiter.
    skip: usize,
    tag: TagState,
    server: ServerState,
    attribute: AttributeState,
    raw: RawText,
    in_client_comment: bool,

    plain: String,
    plain_span: BlockSpan,

    code: String,
    server_outer: BlockSpan,
    server_inner: BlockSpan,
    server_in_attribute: bool,

    element_name: String,
    element_span: BlockSpan,
    directive_name: Option<String>,
    attributes: Vec<AttributeInfo>,
    attribute_name: String,
    attribute_value: String,
    attribute_name_span: BlockSpan,
    attribute_value_span: BlockSpan,
    attribute_quote: Option<char>,
    attribute_has_asp: bool,

    raw_text: String,
    raw_span: BlockSpan,

    soft_stop: bool,
    hard_stop: bool,
}

impl<'h, H: MarkupHandler> MarkupParser<'h, H> {
    pub fn new(text: &str, handler: &'h mut H) -> Result<Self, ScanError> {
        if text.is_empty() {
            return Err(ScanError::EmptyDocument);
        }

        Ok(Self {
            text: text.chars().collect(),
            handler,
            limit: None,
            pos: Position::default(),
            skip: 0,
            tag: TagState::Outside,
            server: ServerState::None,
            attribute: AttributeState::Between,
            raw: RawText::None,
            in_client_comment: false,
            plain: String::new(),
            plain_span: BlockSpan::default(),
            code: String::new(),
            server_outer: BlockSpan::default(),
            server_inner: BlockSpan::default(),
            server_in_attribute: false,
            element_name: String::new(),
            element_span: BlockSpan::default(),
            directive_name: None,
            attributes: Vec::new(),
            attribute_name: String::new(),
            attribute_value: String::new(),
            attribute_name_span: BlockSpan::default(),
            attribute_value_span: BlockSpan::default(),
            attribute_quote: None,
            attribute_has_asp: false,
            raw_text: String::new(),
            raw_span: BlockSpan::default(),
            soft_stop: false,
            hard_stop: false,
        })
    }

    /// Stop once the scan passes `line`/`column` (both 0-based, inclusive).
    /// The unit in progress at that point is still reported.
    pub fn with_limit(mut self, line: usize, column: usize) -> Self {
        self.limit = Some((line, column));
        self
    }

    /// Run the scan to the end of the document or to a stop.
    pub fn process(mut self) {
        let text = std::mem::take(&mut self.text);

        for (index, &c) in text.iter().enumerate() {
            if !self.soft_stop && (self.past_limit() || self.handler.stop_requested()) {
                self.soft_stop = true;
            }
            if self.soft_stop && self.is_idle() {
                return;
            }

            if self.skip > 0 {
                self.skip -= 1;
            } else {
                self.step(&text, index, c);
            }

            if self.hard_stop {
                return;
            }
            self.pos.advance(c);
        }

        // Trailing text is complete; anything else still open is dropped.
        if self.tag == TagState::Outside && self.server == ServerState::None {
            self.flush_plain_text();
        }
    }

    fn past_limit(&self) -> bool {
        self.limit.is_some_and(|limit| (self.pos.line, self.pos.column) > limit)
    }

    /// No lexical unit is in progress.
    fn is_idle(&self) -> bool {
        self.skip == 0
            && self.tag == TagState::Outside
            && self.server == ServerState::None
            && self.raw == RawText::None
            && self.plain.trim().is_empty()
    }

    fn step(&mut self, text: &[char], i: usize, c: char) {
        match self.server {
            ServerState::Comment => {
                if c == '-' && matches_at(text, i, "--%>") {
                    self.skip = 3;
                    self.server = ServerState::None;
                }
                return;
            }
            ServerState::CodeBlock | ServerState::Output(_) => {
                if c == '%' && peek(text, i + 1) == Some('>') {
                    self.skip = 1;
                    self.close_server_tag(text);
                } else {
                    self.code.push(c);
                }
                return;
            }
            ServerState::None => {}
        }

        if c == '<' && peek(text, i + 1) == Some('%') && self.raw != RawText::ServerScript {
            self.open_server_tag(text, i);
            return;
        }

        if self.raw != RawText::None {
            self.step_raw_text(text, i, c);
            return;
        }

        match self.tag {
            TagState::Outside => self.step_outside(text, i, c),
            TagState::ElementName => self.step_element_name(text, i, c),
            TagState::Attributes | TagState::Directive => self.step_attributes(text, i, c),
            TagState::EndTag => self.step_end_tag(c),
            TagState::Declaration => {
                if c == '>' {
                    self.tag = TagState::Outside;
                }
            }
        }
    }

    // ============================================================
    // Server tags
    // ============================================================

    /// At the `<` of `<%`.
    fn open_server_tag(&mut self, text: &[char], i: usize) {
        let marker = peek(text, i + 2);
        // Server comments never render, so an attribute value skips them.
        let is_comment = marker == Some('-') && peek(text, i + 3) == Some('-');

        match self.tag {
            TagState::Outside => {
                self.flush_plain_text();
                if self.hard_stop {
                    return;
                }
            }
            TagState::ElementName => self.end_element_name(),
            TagState::Attributes | TagState::Directive => {
                if self.attribute == AttributeState::BeforeValue {
                    self.begin_attribute_value(None, self.pos);
                }
                if !is_comment && matches!(self.attribute, AttributeState::Value(_)) {
                    self.server_in_attribute = true;
                    self.attribute_has_asp = true;
                }
            }
            _ => {}
        }

        self.code.clear();
        self.server_outer.mark_start(self.pos);

        if marker == Some('@') && self.tag == TagState::Outside {
            self.tag = TagState::Directive;
            self.element_span.mark_start(self.pos);
            self.directive_name = None;
            self.attributes.clear();
            self.attribute = AttributeState::Between;
            self.skip = 2;
        } else if is_comment {
            self.server = ServerState::Comment;
            self.skip = 3;
        } else if let Some(kind) = marker.and_then(OutputElementKind::from_marker) {
            self.server = ServerState::Output(kind);
            self.server_inner.mark_start(self.pos.shifted(3));
            self.skip = 2;
        } else {
            self.server = ServerState::CodeBlock;
            self.server_inner.mark_start(self.pos.shifted(2));
            self.skip = 1;
        }
    }

    /// At the `%` of `%>`.
    fn close_server_tag(&mut self, text: &[char]) {
        self.server_inner.mark_end(self.pos);
        self.server_outer.mark_end(self.pos.shifted(2));
        let block_text = std::mem::take(&mut self.code);

        match self.server {
            ServerState::Output(kind) => {
                let context = OutputElementContext {
                    kind,
                    expression: block_text,
                    outer_block_span: self.server_outer,
                    inner_block_span: self.server_inner,
                    within_elements_attribute: self.server_in_attribute,
                    within_client_side_comment: self.in_client_comment,
                };
                self.handler.on_output_element(&context);
            }
            _ => {
                let context = CodeBlockContext {
                    kind: CodeBlockKind::Inline,
                    block_text,
                    outer_block_span: self.server_outer,
                    inner_block_span: self.server_inner,
                    within_client_side_comment: self.in_client_comment,
                };
                self.handler.on_code_block(&context);
            }
        }
        self.server = ServerState::None;

        if self.server_in_attribute {
            // The attribute keeps the literal source of the embedded tag.
            let start = self.server_outer.absolute_char_offset;
            let end = self.server_outer.end_offset().min(text.len());
            self.attribute_value.extend(&text[start..end]);
            self.server_in_attribute = false;
        }
        // Inside a tag, the enclosing element reports the stop.
        if self.tag == TagState::Outside {
            self.after_event();
        }
    }

    // ============================================================
    // Text between tags
    // ============================================================

    fn step_outside(&mut self, text: &[char], i: usize, c: char) {
        if c == '<' {
            let next = peek(text, i + 1);
            if next == Some('/') && peek(text, i + 2).is_some_and(is_name_start) {
                self.flush_plain_text();
                if self.hard_stop {
                    return;
                }
                self.begin_end_tag();
            } else if next == Some('!') && matches_at(text, i + 2, "--") {
                self.flush_plain_text();
                if self.hard_stop {
                    return;
                }
                self.in_client_comment = true;
                self.skip = 3;
            } else if matches!(next, Some('!') | Some('?')) {
                self.flush_plain_text();
                if self.hard_stop {
                    return;
                }
                self.tag = TagState::Declaration;
            } else if next.is_some_and(is_name_start) {
                self.flush_plain_text();
                if self.hard_stop {
                    return;
                }
                self.tag = TagState::ElementName;
                self.element_span.mark_start(self.pos);
                self.element_name.clear();
                self.attributes.clear();
            } else {
                self.push_plain(c);
            }
            return;
        }

        if self.in_client_comment && c == '-' && matches_at(text, i, "-->") {
            self.flush_plain_text();
            if self.hard_stop {
                return;
            }
            self.in_client_comment = false;
            self.skip = 2;
            return;
        }

        self.push_plain(c);
    }

    fn push_plain(&mut self, c: char) {
        if self.plain.is_empty() {
            self.plain_span.mark_start(self.pos);
        }
        self.plain.push(c);
    }

    /// Report accumulated text unless it is whitespace only.
    fn flush_plain_text(&mut self) {
        if self.plain.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.plain);
        if text.trim().is_empty() {
            return;
        }

        self.plain_span.mark_end(self.pos);
        let context = PlainTextContext {
            text,
            block_span: self.plain_span,
            within_client_side_comment: self.in_client_comment,
        };
        self.handler.on_plain_text(&context);
        self.after_event();
    }

    // ============================================================
    // Elements
    // ============================================================

    fn step_element_name(&mut self, text: &[char], i: usize, c: char) {
        if c.is_whitespace() || matches!(c, '/' | '>' | '"' | '\'' | '=') {
            self.end_element_name();
            self.step_attributes(text, i, c);
        } else {
            self.element_name.push(c);
        }
    }

    fn end_element_name(&mut self) {
        self.tag = TagState::Attributes;
        self.attribute = AttributeState::Between;
    }

    fn begin_end_tag(&mut self) {
        self.tag = TagState::EndTag;
        self.element_span.mark_start(self.pos);
        self.element_name.clear();
        self.skip = 1;
    }

    fn step_end_tag(&mut self, c: char) {
        if c != '>' {
            self.element_name.push(c);
            return;
        }

        self.element_span.mark_end(self.pos.shifted(1));
        let raw_name = std::mem::take(&mut self.element_name);
        let name = raw_name.split_whitespace().next().unwrap_or_default();
        let (prefix, element_name) = split_element_name(name);
        self.tag = TagState::Outside;

        let context = ElementEndContext {
            prefix,
            element_name,
            block_span: self.element_span,
            within_client_side_comment: self.in_client_comment,
        };
        self.handler.on_element_end(&context);
        self.after_event();
    }

    fn tag_close(&self, text: &[char], i: usize, c: char) -> Option<TagClose> {
        let next = peek(text, i + 1);
        match self.tag {
            TagState::Directive => (c == '%' && next == Some('>')).then_some(TagClose::Directive),
            _ if c == '>' => Some(TagClose::Open),
            _ if c == '/' && next == Some('>') => Some(TagClose::SelfClosing),
            _ => None,
        }
    }

    fn step_attributes(&mut self, text: &[char], i: usize, c: char) {
        let close = self.tag_close(text, i, c);

        match self.attribute {
            AttributeState::Between => {
                if let Some(close) = close {
                    self.close_tag(close);
                } else if !c.is_whitespace() && !matches!(c, '"' | '\'' | '/' | '=') {
                    self.attribute_name.clear();
                    self.attribute_name.push(c);
                    self.attribute_name_span.mark_start(self.pos);
                    self.attribute_has_asp = false;
                    self.attribute = AttributeState::Name;
                }
            }
            AttributeState::Name => {
                if c == '=' {
                    self.attribute_name_span.mark_end(self.pos);
                    self.attribute = AttributeState::BeforeValue;
                } else if c.is_whitespace() {
                    self.attribute_name_span.mark_end(self.pos);
                    self.attribute = AttributeState::AfterName;
                } else if let Some(close) = close {
                    self.attribute_name_span.mark_end(self.pos);
                    self.push_valueless_attribute();
                    self.close_tag(close);
                } else {
                    self.attribute_name.push(c);
                }
            }
            AttributeState::AfterName => {
                if c == '=' {
                    self.attribute = AttributeState::BeforeValue;
                } else if !c.is_whitespace() {
                    self.push_valueless_attribute();
                    self.attribute = AttributeState::Between;
                    self.step_attributes(text, i, c);
                }
            }
            AttributeState::BeforeValue => {
                if c == '"' || c == '\'' {
                    self.begin_attribute_value(Some(c), self.pos.shifted(1));
                } else if let Some(close) = close {
                    self.begin_attribute_value(None, self.pos);
                    self.push_attribute();
                    self.close_tag(close);
                } else if !c.is_whitespace() {
                    self.begin_attribute_value(None, self.pos);
                    self.attribute_value.push(c);
                }
            }
            AttributeState::Value(Some(quote)) => {
                if c == quote {
                    self.attribute_value_span.mark_end(self.pos);
                    self.push_attribute();
                } else {
                    self.attribute_value.push(c);
                }
            }
            AttributeState::Value(None) => {
                if c.is_whitespace() {
                    self.attribute_value_span.mark_end(self.pos);
                    self.push_attribute();
                } else if let Some(close) = close {
                    self.attribute_value_span.mark_end(self.pos);
                    self.push_attribute();
                    self.close_tag(close);
                } else {
                    self.attribute_value.push(c);
                }
            }
        }
    }

    fn begin_attribute_value(&mut self, quote: Option<char>, start: Position) {
        self.attribute_quote = quote;
        self.attribute_value.clear();
        self.attribute_value_span.mark_start(start);
        self.attribute = AttributeState::Value(quote);
    }

    fn push_valueless_attribute(&mut self) {
        let name = std::mem::take(&mut self.attribute_name);
        // The first bare word of a directive is its name.
        if self.tag == TagState::Directive
            && self.directive_name.is_none()
            && self.attributes.is_empty()
        {
            self.directive_name = Some(name);
            self.attribute = AttributeState::Between;
            return;
        }

        self.attributes.push(AttributeInfo {
            name,
            value: String::new(),
            name_span: self.attribute_name_span,
            value_span: BlockSpan::at(self.attribute_name_span.end()),
            quote: None,
            contains_asp_tags: false,
        });
        self.attribute = AttributeState::Between;
    }

    fn push_attribute(&mut self) {
        self.attributes.push(AttributeInfo {
            name: std::mem::take(&mut self.attribute_name),
            value: std::mem::take(&mut self.attribute_value),
            name_span: self.attribute_name_span,
            value_span: self.attribute_value_span,
            quote: self.attribute_quote.take(),
            contains_asp_tags: self.attribute_has_asp,
        });
        self.attribute_has_asp = false;
        self.attribute = AttributeState::Between;
    }

    fn close_tag(&mut self, close: TagClose) {
        let width = match close {
            TagClose::Open => 1,
            TagClose::SelfClosing | TagClose::Directive => {
                self.skip = 1;
                2
            }
        };
        self.element_span.mark_end(self.pos.shifted(width));
        let attributes = std::mem::take(&mut self.attributes);
        self.tag = TagState::Outside;
        self.attribute = AttributeState::Between;

        if close == TagClose::Directive {
            let context = DirectiveContext {
                directive_name: self.directive_name.take().unwrap_or_default(),
                attributes,
                block_span: self.element_span,
                within_client_side_comment: self.in_client_comment,
            };
            self.handler.on_page_directive(&context);
            self.after_event();
            return;
        }

        let raw_name = std::mem::take(&mut self.element_name);
        let (prefix, element_name) = split_element_name(&raw_name);
        let context = ElementBeginContext {
            prefix,
            element_name,
            attributes,
            is_end: close == TagClose::SelfClosing,
            block_span: self.element_span,
            within_client_side_comment: self.in_client_comment,
        };
        self.handler.on_element_begin(&context);

        if !context.is_end && context.prefix.is_none() {
            self.raw = raw_text_mode(&context);
            if self.raw != RawText::None {
                self.raw_text.clear();
                self.raw_span.mark_start(self.element_span.end());
            }
        }
        self.after_event();
    }

    // ============================================================
    // <script> / <style> content
    // ============================================================

    fn step_raw_text(&mut self, text: &[char], i: usize, c: char) {
        let closes = c == '<'
            && peek(text, i + 1) == Some('/')
            && matches_ignore_case_at(text, i + 2, self.raw.closing_name());

        if !closes {
            if self.raw == RawText::ServerScript {
                self.raw_text.push(c);
            }
            return;
        }

        let raw = std::mem::replace(&mut self.raw, RawText::None);
        if raw == RawText::ServerScript {
            self.raw_span.mark_end(self.pos);
            let context = CodeBlockContext {
                kind: CodeBlockKind::ServerScript,
                block_text: std::mem::take(&mut self.raw_text),
                outer_block_span: self.raw_span,
                inner_block_span: self.raw_span,
                within_client_side_comment: self.in_client_comment,
            };
            self.handler.on_code_block(&context);
            self.after_event();
            if self.hard_stop {
                return;
            }
        }
        self.begin_end_tag();
    }

    /// Escalate a pending soft stop once an event has been reported.
    fn after_event(&mut self) {
        if self.soft_stop {
            self.hard_stop = true;
        }
    }
}

/// Parse `text` to completion.
pub fn parse_markup<H: MarkupHandler>(text: &str, handler: &mut H) -> Result<(), ScanError> {
    MarkupParser::new(text, handler)?.process();
    Ok(())
}

fn raw_text_mode(element: &ElementBeginContext) -> RawText {
    if element.element_name.eq_ignore_ascii_case("style") {
        return RawText::Style;
    }
    if !element.element_name.eq_ignore_ascii_case("script") {
        return RawText::None;
    }
    let runs_at_server = element
        .attributes
        .iter()
        .any(|attribute| attribute.has_name("runat") && attribute.value == "server");
    if runs_at_server {
        RawText::ServerScript
    } else {
        RawText::ClientScript
    }
}

/// Split `prefix:name`. Whitespace is trimmed and a bare leading colon dropped.
pub(crate) fn split_element_name(raw: &str) -> (Option<String>, String) {
    let trimmed = raw.trim();
    match trimmed.split_once(':') {
        Some((prefix, name)) if !prefix.is_empty() => {
            (Some(prefix.to_string()), name.trim().to_string())
        }
        _ => (
            None,
            trimmed.strip_prefix(':').unwrap_or(trimmed).to_string(),
        ),
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn peek(text: &[char], i: usize) -> Option<char> {
    text.get(i).copied()
}

fn matches_at(text: &[char], i: usize, expected: &str) -> bool {
    let mut index = i;
    for e in expected.chars() {
        if peek(text, index) != Some(e) {
            return false;
        }
        index += 1;
    }
    true
}

fn matches_ignore_case_at(text: &[char], i: usize, expected: &str) -> bool {
    let mut index = i;
    for e in expected.chars() {
        match peek(text, index) {
            Some(c) if c.eq_ignore_ascii_case(&e) => index += 1,
            _ => return false,
        }
    }
    true
}
