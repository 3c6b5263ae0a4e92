//! Segment buffer: the span of lines between two consecutive tool changes.
//!
//! A segment owns its lines exclusively and is drained wholesale when it
//! has been processed, so memory stays bounded by the longest span between
//! tool changes rather than the whole file.

/// One input line with its 1-indexed position in the original stream.
///
/// Lines spliced in during processing carry line number 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-indexed position in the input stream, 0 for synthetic lines.
    pub number: u64,
    /// The line text, without trailing newline.
    pub text: String,
}

impl Line {
    /// Create a line read from the input stream.
    pub fn new(number: u64, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    /// Create a line spliced in by the processor.
    pub fn synthetic(text: impl Into<String>) -> Self {
        Self {
            number: 0,
            text: text.into(),
        }
    }
}

/// Ordered, mutable buffer of lines bounded by tool-change events.
#[derive(Debug, Default)]
pub struct Segment {
    lines: Vec<Line>,
}

impl Segment {
    /// Create a new empty segment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffered lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the segment is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Append a line at the tail.
    pub fn append(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Get the line at `index`.
    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Get the last line, if any.
    pub fn last(&self) -> Option<&Line> {
        self.lines.last()
    }

    /// Replace the text of the last line, keeping its line number.
    ///
    /// Used to turn a skipped or relocated tool-change line into a comment
    /// without removing it from the stream.
    pub fn rewrite_last(&mut self, text: impl Into<String>) {
        if let Some(last) = self.lines.last_mut() {
            last.text = text.into();
        }
    }

    /// Insert synthetic lines immediately after `index`, preserving the
    /// order of `texts`.
    pub fn insert_after<I, S>(&mut self, index: usize, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let at = (index + 1).min(self.lines.len());
        for (offset, text) in texts.into_iter().enumerate() {
            self.lines.insert(at + offset, Line::synthetic(text));
        }
    }

    /// Empty the buffer, yielding the lines in order.
    pub fn drain(&mut self) -> Vec<Line> {
        std::mem::take(&mut self.lines)
    }

    /// Iterate over the buffered lines in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }
}
