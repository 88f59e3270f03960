//! Splitting document text into rows and cells
//!
//! Rows are lines; cells are separated by `|`. Each cell keeps the byte and
//! character offsets of its (trimmed) text within the line so errors can
//! point back into the source.

/// Text of one cell plus where it starts in its line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    pub text: String,
    /// Byte offset of `text` within the line
    pub offset: usize,
    /// Character offset of `text` within the line
    pub char_offset: usize,
}

impl RawCell {
    /// A cell preceded by ASCII text only, where both offsets agree
    pub fn new(text: impl Into<String>, offset: usize) -> Self {
        Self::with_char_offset(text, offset, offset)
    }

    pub fn with_char_offset(text: impl Into<String>, offset: usize, char_offset: usize) -> Self {
        Self {
            text: text.into(),
            offset,
            char_offset,
        }
    }
}

/// Split one line on `|`, trimming each cell
///
/// An empty line is a single empty cell; a trailing `|` adds an empty cell.
pub fn split_line(line: &str) -> Vec<RawCell> {
    let mut cells = Vec::new();
    let mut start = 0;
    let mut char_start = 0;

    for part in line.split('|') {
        let leading = part.len() - part.trim_start().len();
        let text = part.trim();
        let (offset, char_offset) = if text.is_empty() {
            (start, char_start)
        } else {
            (start + leading, char_start + part[..leading].chars().count())
        };
        cells.push(RawCell::with_char_offset(text, offset, char_offset));
        start += part.len() + 1;
        char_start += part.chars().count() + 1;
    }

    cells
}

/// Split a whole document; row `i` is line `i` of the text
pub fn split_document(source: &str) -> Vec<Vec<RawCell>> {
    source.lines().map(split_line).collect()
}
