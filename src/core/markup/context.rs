//! Payloads handed to [`MarkupHandler`](super::MarkupHandler) callbacks.
//!
//! Contexts are borrowed for the duration of one callback. Handlers clone
//! whatever they want to keep.

use serde::Serialize;

use crate::core::span::BlockSpan;

/// Flavour of a `<%X ... %>` output tag, keyed by its marker character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputElementKind {
    /// `<%= expr %>`
    Plain,
    /// `<%: expr %>`
    HtmlEscaped,
    /// `<%$ Resources:Class, Key %>`
    Expression,
    /// `<%# Eval("Field") %>`
    Bind,
}

impl OutputElementKind {
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '=' => Some(Self::Plain),
            ':' => Some(Self::HtmlEscaped),
            '$' => Some(Self::Expression),
            '#' => Some(Self::Bind),
            _ => None,
        }
    }

    pub fn marker(&self) -> char {
        match self {
            Self::Plain => '=',
            Self::HtmlEscaped => ':',
            Self::Expression => '$',
            Self::Bind => '#',
        }
    }
}

/// Where a code block came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeBlockKind {
    /// `<% ... %>`
    Inline,
    /// Body of `<script runat="server">`.
    ServerScript,
}

/// One attribute of an element or directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    pub name: String,
    /// Literal source text of the value, embedded server tags included.
    pub value: String,
    pub name_span: BlockSpan,
    /// Span of the value without its quotes. Empty for valueless attributes.
    pub value_span: BlockSpan,
    pub quote: Option<char>,
    /// The value contains an embedded `<% %>` tag.
    pub contains_asp_tags: bool,
}

impl AttributeInfo {
    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

fn find_attribute<'a>(attributes: &'a [AttributeInfo], name: &str) -> Option<&'a AttributeInfo> {
    attributes.iter().find(|attribute| attribute.has_name(name))
}

/// `<%@ Name attr="value" ... %>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveContext {
    /// `Page`, `Control`, `Register`, ... Empty when the directive has no name.
    pub directive_name: String,
    pub attributes: Vec<AttributeInfo>,
    pub block_span: BlockSpan,
    pub within_client_side_comment: bool,
}

impl DirectiveContext {
    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        find_attribute(&self.attributes, name)
    }
}

/// An opening (or self-closing) tag such as `<asp:Label ID="L1" />`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementBeginContext {
    pub prefix: Option<String>,
    pub element_name: String,
    pub attributes: Vec<AttributeInfo>,
    /// Self-closing tag (`/>`).
    pub is_end: bool,
    /// From `<` through `>`.
    pub block_span: BlockSpan,
    pub within_client_side_comment: bool,
}

impl ElementBeginContext {
    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        find_attribute(&self.attributes, name)
    }

    /// `prefix:name`, or just the name.
    pub fn full_name(&self) -> String {
        full_name(self.prefix.as_deref(), &self.element_name)
    }

    /// Server control or element marked `runat="server"`.
    pub fn is_server_side(&self) -> bool {
        self.prefix.is_some()
            || self
                .attribute("runat")
                .is_some_and(|attribute| attribute.value == "server")
    }
}

/// A closing tag such as `</asp:Panel>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementEndContext {
    pub prefix: Option<String>,
    pub element_name: String,
    pub block_span: BlockSpan,
    pub within_client_side_comment: bool,
}

impl ElementEndContext {
    pub fn full_name(&self) -> String {
        full_name(self.prefix.as_deref(), &self.element_name)
    }
}

/// `<%= ... %>` and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputElementContext {
    pub kind: OutputElementKind,
    /// Text between the marker and `%>`.
    pub expression: String,
    pub outer_block_span: BlockSpan,
    pub inner_block_span: BlockSpan,
    /// The tag sits inside an attribute value of an element.
    pub within_elements_attribute: bool,
    pub within_client_side_comment: bool,
}

/// `<% ... %>` or a server-side script body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockContext {
    pub kind: CodeBlockKind,
    /// Raw content, aligned with `inner_block_span`.
    pub block_text: String,
    pub outer_block_span: BlockSpan,
    pub inner_block_span: BlockSpan,
    pub within_client_side_comment: bool,
}

impl CodeBlockContext {
    pub fn trimmed_text(&self) -> &str {
        self.block_text.trim()
    }
}

/// Markup text between tags. Never whitespace-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainTextContext {
    pub text: String,
    pub block_span: BlockSpan,
    pub within_client_side_comment: bool,
}

fn full_name(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, name),
        None => name.to_string(),
    }
}
