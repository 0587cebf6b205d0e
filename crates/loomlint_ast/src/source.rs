//! Immutable source text with offset/line conversion.

use crate::{Location, Position, Span};

/// Raw source text plus a precomputed table of line start offsets.
///
/// Recognized line terminators are `\n`, `\r\n`, `\r`, U+2028 and U+2029.
/// The text is never mutated after construction; applying fixes produces a
/// new `SourceText`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    text: String,
    line_starts: Vec<u32>,
}

impl SourceText {
    /// Wraps the given text and indexes its line starts.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        Self { text, line_starts }
    }

    /// Returns the full text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the wrapper and returns the owned text.
    pub fn into_string(self) -> String {
        self.text
    }

    /// Returns the text length in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.text.len() as u32
    }

    /// Returns true if the text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the number of lines. An empty text has one (empty) line.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns true if `span` lies within the text and both ends fall on
    /// character boundaries.
    pub fn is_valid_span(&self, span: Span) -> bool {
        span.start <= span.end
            && span.end <= self.len()
            && self.text.is_char_boundary(span.start as usize)
            && self.text.is_char_boundary(span.end as usize)
    }

    /// Returns the substring covered by `span`, or `None` when the span is
    /// out of bounds or splits a character.
    pub fn slice(&self, span: Span) -> Option<&str> {
        if span.start > span.end {
            return None;
        }
        self.text.get(span.range())
    }

    /// Converts a byte offset to a 1-indexed line number.
    ///
    /// Offsets past the end are clamped to the end of the text.
    pub fn line_of(&self, offset: u32) -> u32 {
        let offset = offset.min(self.len());
        let idx = self.line_starts.partition_point(|&start| start <= offset);
        idx.max(1) as u32
    }

    /// Converts a byte offset to a line/column position.
    ///
    /// Columns count UTF-16 code units, so a character outside the Basic
    /// Multilingual Plane advances the column by two.
    pub fn position(&self, offset: u32) -> Position {
        let mut offset = offset.min(self.len()) as usize;
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.line_of(offset as u32);
        let line_start = self.line_starts[line as usize - 1] as usize;
        let column = self.text[line_start..offset]
            .chars()
            .map(char::len_utf16)
            .sum::<usize>() as u32;
        Position::new(line, column)
    }

    /// Converts a line/column position back to a byte offset.
    ///
    /// Returns `None` if the line does not exist. A column past the end of
    /// the line resolves to the end of that line's content.
    pub fn offset(&self, position: Position) -> Option<u32> {
        let line_text = self.line_text(position.line)?;
        let line_start = self.line_starts[position.line as usize - 1];
        let mut units = 0;
        let within = line_text
            .char_indices()
            .find(|&(_, c)| {
                let reached = units >= position.column as usize;
                units += c.len_utf16();
                reached
            })
            .map_or(line_text.len(), |(idx, _)| idx);
        Some(line_start + within as u32)
    }

    /// Returns start and end positions for a span.
    pub fn location(&self, span: Span) -> Location {
        Location::new(self.position(span.start), self.position(span.end))
    }

    /// Returns the text of a line (1-indexed) without its terminator.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        if line == 0 {
            return None;
        }
        let idx = line as usize - 1;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(self.text.len(), |&next| next as usize);
        let raw = &self.text[start..end];
        Some(strip_terminator(raw))
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Returns true for characters that end a line.
#[inline]
pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn compute_line_starts(text: &str) -> Vec<u32> {
    let mut starts = vec![0];
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_line_terminator(c) {
            continue;
        }
        if c == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
            continue;
        }
        starts.push((idx + c.len_utf8()) as u32);
    }

    starts
}

fn strip_terminator(line: &str) -> &str {
    if let Some(rest) = line.strip_suffix("\r\n") {
        return rest;
    }
    match line.chars().next_back() {
        Some(c) if is_line_terminator(c) => &line[..line.len() - c.len_utf8()],
        _ => line,
    }
}
