//! Error types for cell compilation and their diagnostics

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::lexer::Token;
use crate::source::RawCell;
use crate::values::ValueParseError;

/// Byte range in the original line
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileErrorKind {
    #[error("malformed cell: {message}")]
    MalformedCell {
        message: String,
        expected: Vec<String>,
    },

    #[error("unknown shape '{token}'")]
    UnknownShape { token: String },

    #[error("unknown layout '{name}'")]
    UnknownLayout { name: String },

    #[error("unknown property '{name}'")]
    UnknownProperty { name: String },

    #[error("too many positional properties: {count} given for {slots} native slots")]
    TooManyPositionalProperties { count: usize, slots: usize },

    #[error("invalid value '{token}' for property '{property}': {source}")]
    PropertyType {
        property: String,
        token: String,
        source: ValueParseError,
    },

    #[error("invalid {parameter} for {shape}: {reason}")]
    InvalidShapeParameter {
        shape: String,
        parameter: String,
        reason: String,
    },
}

/// A failure while compiling one cell
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}")]
pub struct CompileError {
    pub kind: CompileErrorKind,
    /// Offending bytes within the original line
    pub span: Option<Span>,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, span: Option<Span>) -> Self {
        Self { kind, span }
    }

    pub fn malformed(message: impl Into<String>, expected: Vec<String>, span: Span) -> Self {
        Self::new(
            CompileErrorKind::MalformedCell {
                message: message.into(),
                expected,
            },
            Some(span),
        )
    }

    pub fn unknown_shape(token: impl Into<String>, span: Span) -> Self {
        Self::new(
            CompileErrorKind::UnknownShape {
                token: token.into(),
            },
            Some(span),
        )
    }

    pub fn property_type(
        property: impl Into<String>,
        token: impl Into<String>,
        source: ValueParseError,
        span: Option<Span>,
    ) -> Self {
        Self::new(
            CompileErrorKind::PropertyType {
                property: property.into(),
                token: token.into(),
                source,
            },
            span,
        )
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for CompileError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::{RichPattern, RichReason};

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(tok) => format!("unexpected {}", format_token(tok)),
                None => "unexpected end of cell".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of cell".to_string()),
                RichPattern::Identifier(s) => Some(format!("'{}'", s)),
                RichPattern::Any => Some("any token".to_string()),
                RichPattern::SomethingElse => None,
            })
            .collect();

        CompileError::malformed(message, expected, err.span().into_range())
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::BraceOpen => "'{'".to_string(),
        Token::BraceClose => "'}'".to_string(),
        Token::BracketOpen => "'['".to_string(),
        Token::BracketClose => "']'".to_string(),
        Token::Semicolon => "';'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Equals => "'='".to_string(),
        Token::Pipe => "'|'".to_string(),
        Token::Integer(n) => format!("number {}", n),
        Token::Word(w) => format!("'{}'", w),
    }
}

/// A compile error located in a document
#[derive(Error, Debug, Clone, PartialEq)]
#[error("row {}, column {}: {}", .row + 1, .column + 1, .error)]
pub struct CellError {
    /// 0-based row (line) index
    pub row: usize,
    /// 0-based cell index within the row
    pub column: usize,
    /// Byte offset of the cell text within its line
    pub cell_start: usize,
    /// Character offset of the cell text within its line
    pub cell_char_start: usize,
    /// Characters between the cell start and the error
    error_chars: usize,
    pub error: CompileError,
}

impl CellError {
    pub fn new(row: usize, column: usize, cell: &RawCell, error: CompileError) -> Self {
        let error_chars = error.span.as_ref().map_or(0, |span| {
            let bytes = span.start.saturating_sub(cell.offset);
            cell.text
                .get(..bytes)
                .map_or(bytes, |prefix| prefix.chars().count())
        });
        Self {
            row,
            column,
            cell_start: cell.offset,
            cell_char_start: cell.char_offset,
            error_chars,
            error,
        }
    }

    pub fn kind(&self) -> &CompileErrorKind {
        &self.error.kind
    }

    /// Character offset of the error within its line
    pub fn offset(&self) -> usize {
        self.cell_char_start + self.error_chars
    }

    /// Character offset of the error within its cell
    pub fn cell_offset(&self) -> usize {
        self.error_chars
    }

    /// Byte offset of the error within its line
    pub fn byte_offset(&self) -> usize {
        self.error
            .span
            .as_ref()
            .map_or(self.cell_start, |span| span.start)
    }

    /// Render the error over the whole document text using ariadne
    pub fn report(&self, source: &str, filename: &str) -> String {
        let line_start: usize = source
            .split_inclusive('\n')
            .take(self.row)
            .map(str::len)
            .sum();
        let span = self
            .error
            .span
            .clone()
            .unwrap_or(self.cell_start..self.cell_start);
        let start = char_offset(source, line_start + span.start);
        let total = source.chars().count();
        let end = char_offset(source, line_start + span.end)
            .max(start + 1)
            .min(total.max(start));

        let label = match &self.error.kind {
            CompileErrorKind::MalformedCell { expected, .. } if !expected.is_empty() => {
                format!("expected {}", expected.join(", "))
            }
            kind => kind.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, start)
            .with_message(format!(
                "cell {} of row {}: {}",
                self.column + 1,
                self.row + 1,
                self.error
            ))
            .with_label(
                Label::new((filename, start..end))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Character index of a byte offset, clamped to the text
fn char_offset(source: &str, byte: usize) -> usize {
    source.char_indices().take_while(|(i, _)| *i < byte).count()
}

/// All cell errors of a failed document
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", format_cell_errors(.errors))]
pub struct DocumentError {
    pub errors: Vec<CellError>,
}

impl DocumentError {
    pub fn new(errors: Vec<CellError>) -> Self {
        Self { errors }
    }

    /// Render every error, in document order
    pub fn report(&self, source: &str, filename: &str) -> String {
        self.errors
            .iter()
            .map(|e| e.report(source, filename))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn format_cell_errors(errors: &[CellError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unknown_shape_at(row: usize, column: usize, cell: RawCell, span: Span) -> CellError {
        CellError::new(row, column, &cell, CompileError::unknown_shape("Blob", span))
    }

    #[test]
    fn test_offsets() {
        let err = unknown_shape_at(0, 1, RawCell::new("C;Blob", 4), 6..10);
        assert_eq!(err.offset(), 6);
        assert_eq!(err.byte_offset(), 6);
        assert_eq!(err.cell_offset(), 2);
    }

    #[test]
    fn test_offsets_count_characters() {
        // "é|C;Blob": the cell starts at byte 3, character 2
        let err = unknown_shape_at(0, 1, RawCell::with_char_offset("C;Blob", 3, 2), 5..9);
        assert_eq!(err.offset(), 4);
        assert_eq!(err.cell_offset(), 2);
        assert_eq!(err.byte_offset(), 5);

        let err = unknown_shape_at(0, 0, RawCell::new("ü;Blob", 0), 3..7);
        assert_eq!(err.offset(), 2);
        assert_eq!(err.byte_offset(), 3);
    }

    #[test]
    fn test_offsets_without_span() {
        let err = CellError::new(
            2,
            0,
            &RawCell::new("C{foo=1}", 3),
            CompileError::new(
                CompileErrorKind::UnknownProperty {
                    name: "foo".into(),
                },
                None,
            ),
        );
        assert_eq!(err.offset(), 3);
        assert_eq!(err.byte_offset(), 3);
        assert_eq!(err.cell_offset(), 0);
    }

    #[test]
    fn test_display_is_one_based() {
        let err = unknown_shape_at(1, 2, RawCell::new("Blob", 0), 0..4);
        assert_eq!(err.to_string(), "row 2, column 3: unknown shape 'Blob'");
    }

    #[test]
    fn test_report_points_into_the_right_line() {
        let source = "C|T\nR|2Blob\n";
        let err = unknown_shape_at(1, 1, RawCell::new("2Blob", 2), 3..7);
        let report = err.report(source, "grid.txt");
        assert!(report.contains("unknown shape 'Blob'"), "{report}");
        assert!(report.contains("grid.txt"), "{report}");
        assert!(report.contains("R|2Blob"), "{report}");
    }

    #[test]
    fn test_document_error_joins_messages() {
        let doc = DocumentError::new(vec![
            unknown_shape_at(0, 0, RawCell::new("Blob", 0), 0..4),
            unknown_shape_at(1, 0, RawCell::new("Blob", 0), 0..4),
        ]);
        assert_eq!(
            doc.to_string(),
            "row 1, column 1: unknown shape 'Blob'; row 2, column 1: unknown shape 'Blob'"
        );
    }

    #[test]
    fn test_property_type_keeps_source() {
        let err = CompileError::property_type(
            "fill",
            "45%",
            ValueParseError::InvalidColor("45%".into()),
            Some(1..4),
        );
        assert_eq!(
            err.to_string(),
            "invalid value '45%' for property 'fill': '45%' is not a color (expected #RGB, #RRGGBB or a color name)"
        );
    }
}
