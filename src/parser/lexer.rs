//! Lexer for cell text using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    // Property block delimiters
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,

    // Layout argument delimiters, e.g. `line[L,R]`
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,

    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("=")]
    Equals,

    // Cell separator; only ever stray inside a cell
    #[token("|")]
    Pipe,

    // Digits only, kept as text so overflow is reported by the parser
    #[regex(r"[0-9]+", |lex| lex.slice().to_string(), priority = 3)]
    Integer(String),

    // Anything else up to the next delimiter or whitespace
    #[regex(r"[^{}\[\];,=| \t\r\n]+", |lex| lex.slice().to_string(), priority = 1)]
    Word(String),
}

/// Lex cell text into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}
