use serde::Serialize;

/// A position in a document.
///
/// Lines and columns are 0-based, the offset counts `char`s from the start of
/// the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Moves past `c`.
    pub fn advance(&mut self, c: char) {
        self.offset += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    /// Shifts the position along the current line.
    ///
    /// Only valid while the shifted range stays on one line, which holds for
    /// every delimiter the markup parser corrects for.
    pub fn shifted(self, delta: isize) -> Self {
        Self {
            line: self.line,
            column: self.column.saturating_add_signed(delta),
            offset: self.offset.saturating_add_signed(delta),
        }
    }

    /// Position reached after walking over `text`.
    pub fn after(mut self, text: &str) -> Self {
        for c in text.chars() {
            self.advance(c);
        }
        self
    }
}

/// One contiguous range of source text.
///
/// The end is exclusive: it is the position just past the last character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BlockSpan {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub absolute_char_offset: usize,
    pub absolute_char_length: usize,
}

impl BlockSpan {
    /// An empty span located at `position`.
    pub fn at(position: Position) -> Self {
        let mut span = Self::default();
        span.mark_start(position);
        span
    }

    pub fn between(start: Position, end: Position) -> Self {
        let mut span = Self::at(start);
        span.mark_end(end);
        span
    }

    /// Records `position` as the start of the span and collapses the end onto it.
    pub fn mark_start(&mut self, position: Position) {
        self.start_line = position.line;
        self.start_column = position.column;
        self.end_line = position.line;
        self.end_column = position.column;
        self.absolute_char_offset = position.offset;
        self.absolute_char_length = 0;
    }

    /// Records `position` as the (exclusive) end of the span.
    pub fn mark_end(&mut self, position: Position) {
        let end = position.max(self.start());
        self.end_line = end.line;
        self.end_column = end.column;
        self.absolute_char_length = end.offset - self.absolute_char_offset;
    }

    pub fn start(&self) -> Position {
        Position::new(
            self.start_line,
            self.start_column,
            self.absolute_char_offset,
        )
    }

    pub fn end(&self) -> Position {
        Position::new(self.end_line, self.end_column, self.end_offset())
    }

    pub fn end_offset(&self) -> usize {
        self.absolute_char_offset + self.absolute_char_length
    }

    pub fn is_empty(&self) -> bool {
        self.absolute_char_length == 0
    }

    pub fn contains_offset(&self, offset: usize) -> bool {
        offset >= self.absolute_char_offset && offset < self.end_offset()
    }

    /// Line/column containment, end exclusive.
    pub fn contains_position(&self, line: usize, column: usize) -> bool {
        let point = (line, column);
        point >= (self.start_line, self.start_column) && point < (self.end_line, self.end_column)
    }

    pub fn contains_span(&self, other: &BlockSpan) -> bool {
        other.absolute_char_offset >= self.absolute_char_offset
            && other.end_offset() <= self.end_offset()
    }
}
