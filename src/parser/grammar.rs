//! Cell grammar using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::CompileError;
use crate::parser::ast::*;
use crate::parser::lexer::{lex, Token};
use crate::shapes::ShapeKind;

/// Largest repeat count accepted in front of a shape
///
/// Every instance becomes its own placed shape, so the count is capped well
/// below what a `u32` could hold.
pub const MAX_REPEAT: u32 = 1024;

/// Shape group as written, before the shape token is matched
#[derive(Debug, Clone)]
struct RawGroup {
    count: Option<Spanned<String>>,
    shape: Spanned<String>,
    properties: Option<Vec<Spanned<PropertyEntry>>>,
}

#[derive(Debug, Clone)]
struct RawCell {
    config: Option<Vec<Spanned<PropertyEntry>>>,
    groups: Vec<Spanned<RawGroup>>,
}

/// Parse one cell's text into an AST
///
/// `base` is the byte offset of `text` within its original line; every span
/// in the result (and in errors) is relative to that line.
pub fn parse_cell(text: &str, base: usize) -> Result<CellAst, CompileError> {
    let end = base + text.len();

    let token_iter = lex(text).map(move |(tok, span)| {
        let span: SimpleSpan = (span.start + base..span.end + base).into();
        (tok, span)
    });
    let token_stream = Stream::from_iter(token_iter).map((end..end).into(), |(t, s): (_, _)| (t, s));

    let raw = cell_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(err) => CompileError::from(err),
            None => CompileError::malformed("invalid cell", Vec::new(), base..end),
        })?;

    build_cell(raw)
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn cell_parser<'a, I>() -> impl Parser<'a, I, RawCell, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    // Any value-carrying token; integers are valid property values too
    let word = select! {
        Token::Word(w) => w,
        Token::Integer(n) => n,
    }
    .map_with(|w, e| Spanned::new(w, span_range(&e.span())));

    let name = select! {
        Token::Word(w) => w,
    }
    .map_with(|w, e| Spanned::new(w, span_range(&e.span())));

    // `line[L,R]`: arguments are folded back into the value text
    let arguments = word
        .clone()
        .separated_by(just(Token::Comma))
        .at_least(1)
        .collect::<Vec<_>>()
        .delimited_by(just(Token::BracketOpen), just(Token::BracketClose));

    let value = word
        .clone()
        .then(arguments.or_not())
        .map_with(|(head, args), e| {
            let text = match args {
                Some(args) => {
                    let args: Vec<&str> = args.iter().map(|a| a.node.as_str()).collect();
                    format!("{}[{}]", head.node, args.join(","))
                }
                None => head.node,
            };
            Spanned::new(text, span_range(&e.span()))
        });

    let entry = choice((
        name.then_ignore(just(Token::Equals))
            .then(value.clone())
            .map(|(name, value)| PropertyEntry::Named { name, value }),
        value.map(PropertyEntry::Positional),
    ))
    .map_with(|entry, e| Spanned::new(entry, span_range(&e.span())));

    let block = entry
        .separated_by(just(Token::Semicolon))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::BraceOpen), just(Token::BraceClose));

    let count = select! {
        Token::Integer(n) => n,
    }
    .map_with(|n, e| Spanned::new(n, span_range(&e.span())));

    let shape = select! {
        Token::Word(w) => w,
    }
    .map_with(|w, e| Spanned::new(w, span_range(&e.span())));

    let group = count
        .or_not()
        .then(shape)
        .then(block.clone().or_not())
        .map_with(|((count, shape), properties), e| {
            Spanned::new(
                RawGroup {
                    count,
                    shape,
                    properties,
                },
                span_range(&e.span()),
            )
        });

    block
        .or_not()
        .then(
            group
                .separated_by(just(Token::Semicolon))
                .allow_trailing()
                .collect::<Vec<_>>(),
        )
        .then_ignore(end())
        .map(|(config, groups)| RawCell { config, groups })
}

fn build_cell(raw: RawCell) -> Result<CellAst, CompileError> {
    let groups = raw
        .groups
        .into_iter()
        .map(build_group)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CellAst {
        config: PropertyList::new(raw.config.unwrap_or_default()),
        groups,
    })
}

/// Split the repeat count off the shape token and match the shape kind
fn build_group(raw: Spanned<RawGroup>) -> Result<ShapeGroup, CompileError> {
    let Spanned { node: group, span } = raw;
    let word = &group.shape.node;

    // `3Arrow` lexes as a single word: peel the digits off
    let digits = word.len() - word.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let glued = (digits > 0).then(|| {
        let start = group.shape.span.start;
        Spanned::new(word[..digits].to_string(), start..start + digits)
    });

    let count_text = match (group.count, glued) {
        (Some(_), Some(extra)) => {
            return Err(CompileError::malformed(
                format!("unexpected second repeat count '{}'", extra.node),
                vec!["shape".to_string()],
                extra.span,
            ))
        }
        (count, glued) => count.or(glued),
    };

    let count = match count_text {
        None => 1,
        Some(text) => match text.node.parse::<u32>() {
            Ok(n) if (1..=MAX_REPEAT).contains(&n) => n,
            _ => {
                return Err(CompileError::malformed(
                    format!(
                        "repeat count '{}' must be between 1 and {} (the instance cap)",
                        text.node, MAX_REPEAT
                    ),
                    Vec::new(),
                    text.span,
                ))
            }
        },
    };

    let token = &word[digits..];
    let token_span = group.shape.span.start + digits..group.shape.span.end;
    if token.is_empty() {
        return Err(CompileError::malformed(
            "expected a shape after the repeat count",
            vec!["shape".to_string()],
            token_span,
        ));
    }
    let kind = ShapeKind::from_token(token)
        .ok_or_else(|| CompileError::unknown_shape(token, token_span.clone()))?;

    Ok(ShapeGroup {
        count,
        kind: Spanned::new(kind, token_span),
        properties: PropertyList::new(group.properties.unwrap_or_default()),
        span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileErrorKind;

    fn parse(text: &str) -> Result<CellAst, CompileError> {
        parse_cell(text, 0)
    }

    #[test]
    fn test_empty_cell() {
        assert_eq!(parse("").expect("Should parse"), CellAst::default());
        assert_eq!(parse("   ").expect("Should parse"), CellAst::default());
    }

    #[test]
    fn test_single_shape() {
        let cell = parse("C").expect("Should parse");
        assert!(cell.config.is_empty());
        assert_eq!(cell.groups.len(), 1);
        assert_eq!(cell.groups[0].kind.node, ShapeKind::Circle);
        assert_eq!(cell.groups[0].count, 1);
    }

    #[test]
    fn test_cell_config_and_groups() {
        let cell = parse("{horizontal;red}3Arrow{top};Sq{40%;blue}").expect("Should parse");
        assert_eq!(cell.config.len(), 2);
        assert_eq!(cell.groups.len(), 2);
        assert_eq!(cell.groups[0].count, 3);
        assert_eq!(cell.groups[0].kind.node, ShapeKind::Arrow);
        assert_eq!(cell.groups[0].properties.len(), 1);
        assert_eq!(cell.groups[1].kind.node, ShapeKind::Square);
        assert_eq!(cell.groups[1].properties.len(), 2);
    }

    #[test]
    fn test_separated_repeat_count() {
        let cell = parse("2 Star").expect("Should parse");
        assert_eq!(cell.groups[0].count, 2);
        assert_eq!(cell.groups[0].kind.node, ShapeKind::Star);
    }

    #[test]
    fn test_named_and_positional_entries() {
        let cell = parse("R{80;23%;border-color=#00f}").expect("Should parse");
        let props = &cell.groups[0].properties;
        let positional: Vec<_> = props.positional().map(|v| v.node.as_str()).collect();
        assert_eq!(positional, vec!["80", "23%"]);
        let (name, value) = props.named().next().expect("named entry");
        assert_eq!(name.node, "border-color");
        assert_eq!(value.node, "#00f");
    }

    #[test]
    fn test_layout_value_with_arguments() {
        let cell = parse("{line[L, R]}2C").expect("Should parse");
        let value = cell.config.positional().next().expect("layout value");
        assert_eq!(value.node, "line[L,R]");
        assert_eq!(value.span, 1..11);
    }

    #[test]
    fn test_spans_include_base_offset() {
        let cell = parse_cell("Sq{red}", 10).expect("Should parse");
        assert_eq!(cell.groups[0].kind.span, 10..12);
        assert_eq!(cell.groups[0].span, 10..17);
    }

    #[test]
    fn test_glued_count_span() {
        let cell = parse("12St").expect("Should parse");
        assert_eq!(cell.groups[0].count, 12);
        assert_eq!(cell.groups[0].kind.span, 2..4);
    }

    #[test]
    fn test_unknown_shape_reports_token_and_offset() {
        let err = parse_cell("C;3Blob", 4).unwrap_err();
        assert_eq!(
            err.kind,
            CompileErrorKind::UnknownShape {
                token: "Blob".to_string()
            }
        );
        assert_eq!(err.span, Some(7..11));
    }

    #[test]
    fn test_unterminated_block_is_malformed() {
        let err = parse("C{red").unwrap_err();
        assert!(matches!(err.kind, CompileErrorKind::MalformedCell { .. }));
    }

    #[test]
    fn test_stray_delimiters_are_malformed() {
        for text in ["C}", "{red", "C{{red}}", "C;;T", "C|T", "=C", "{a}{b}C", "C{red}{blue}"] {
            let err = parse(text).unwrap_err();
            assert!(
                matches!(err.kind, CompileErrorKind::MalformedCell { .. }),
                "{text}: {err:?}"
            );
        }
    }

    #[test]
    fn test_zero_repeat_count_rejected() {
        let err = parse("0C").unwrap_err();
        assert!(matches!(err.kind, CompileErrorKind::MalformedCell { .. }));
        assert_eq!(err.span, Some(0..1));
    }

    #[test]
    fn test_repeat_count_cap() {
        let ast = parse("1024C").unwrap();
        assert_eq!(ast.groups[0].count, MAX_REPEAT);

        let err = parse("1025C").unwrap_err();
        match err.kind {
            CompileErrorKind::MalformedCell { message, .. } => {
                assert!(message.contains("instance cap"), "{message}")
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.span, Some(0..4));
    }

    #[test]
    fn test_count_without_shape_rejected() {
        assert!(parse("3").is_err());
        assert!(parse("3 4C").is_err());
    }

    #[test]
    fn test_config_only_cell() {
        let cell = parse("{bg=#eee}").expect("Should parse");
        assert_eq!(cell.config.len(), 1);
        assert!(cell.groups.is_empty());
    }

    #[test]
    fn test_trailing_semicolons() {
        let cell = parse("R{80;23%;};C;").expect("Should parse");
        assert_eq!(cell.groups.len(), 2);
        assert_eq!(cell.groups[0].properties.len(), 2);
    }
}
