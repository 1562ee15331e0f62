//! Streaming ASPX markup parsing.
//!
//! [`MarkupParser`] walks a document once and reports directives, elements,
//! server tags and text to a [`MarkupHandler`] as soon as each unit is complete.

mod context;
mod handler;
mod parser;

pub use context::{
    AttributeInfo, CodeBlockContext, CodeBlockKind, DirectiveContext, ElementBeginContext,
    ElementEndContext, OutputElementContext, OutputElementKind, PlainTextContext,
};
pub use handler::MarkupHandler;
pub use parser::{MarkupParser, parse_markup};
