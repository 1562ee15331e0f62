use super::context::{
    CodeBlockContext, DirectiveContext, ElementBeginContext, ElementEndContext,
    OutputElementContext, PlainTextContext,
};

/// Receives markup events in document order.
///
/// Every callback has a no-op default so a handler only implements what it
/// cares about.
pub trait MarkupHandler {
    fn on_page_directive(&mut self, _context: &DirectiveContext) {}

    fn on_element_begin(&mut self, _context: &ElementBeginContext) {}

    fn on_element_end(&mut self, _context: &ElementEndContext) {}

    fn on_output_element(&mut self, _context: &OutputElementContext) {}

    fn on_code_block(&mut self, _context: &CodeBlockContext) {}

    fn on_plain_text(&mut self, _context: &PlainTextContext) {}

    /// Polled once per character. Returning `true` lets the current unit
    /// finish and then ends the scan.
    fn stop_requested(&self) -> bool {
        false
    }
}
