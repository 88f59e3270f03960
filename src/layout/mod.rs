//! Layout engine: where each shape instance sits inside its cell
//!
//! A cell picks one [`Layout`]; [`place`] turns it into one
//! [`PlacementSlot`] per expanded shape instance. Coordinates are normalized
//! to the cell, so the same slots work for any cell size.

pub mod engine;
pub mod types;

pub use engine::place;
pub use types::*;

use std::fmt;

use crate::values::{Direction, ValueParseError};

/// How the instances of a cell are arranged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Everything centered on top of each other
    #[default]
    Stack,
    /// Evenly spread from `start` to `end`. A missing start comes from the
    /// orientation hint; a missing end mirrors the start.
    Line {
        start: Option<Direction>,
        end: Option<Direction>,
    },
}

impl Layout {
    /// Parse `stack`, `line`, `line[P1]`, `line[P1,P2]` or one of the line
    /// aliases (`horizontal`, `rhorizontal`, `vertical`, `rvertical`)
    pub fn parse(token: &str) -> Result<Self, ValueParseError> {
        let (name, args) = match token.split_once('[') {
            Some((name, rest)) => {
                let inner = rest.strip_suffix(']').ok_or_else(|| {
                    ValueParseError::InvalidLayoutArguments {
                        token: token.to_string(),
                        reason: "missing closing ']'".to_string(),
                    }
                })?;
                (name, Some(inner))
            }
            None => (token, None),
        };

        let implicit = match name.to_ascii_lowercase().as_str() {
            "stack" | "stacked" => {
                if args.is_some() {
                    return Err(ValueParseError::InvalidLayoutArguments {
                        token: token.to_string(),
                        reason: "stack takes no arguments".to_string(),
                    });
                }
                return Ok(Layout::Stack);
            }
            "line" => (None, None),
            "horizontal" => (Some(Direction::Left), Some(Direction::Right)),
            "rhorizontal" => (Some(Direction::Right), Some(Direction::Left)),
            "vertical" => (Some(Direction::Top), Some(Direction::Bottom)),
            "rvertical" => (Some(Direction::Bottom), Some(Direction::Top)),
            _ => return Err(ValueParseError::UnknownLayout(name.to_string())),
        };

        let Some(args) = args else {
            return Ok(Layout::Line {
                start: implicit.0,
                end: implicit.1,
            });
        };

        let endpoints = args
            .split(',')
            .map(|arg| {
                let arg = arg.trim();
                Direction::parse(arg).ok_or_else(|| ValueParseError::InvalidLayoutArguments {
                    token: token.to_string(),
                    reason: format!("'{}' is not a direction", arg),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match endpoints.as_slice() {
            [start] => Ok(Layout::Line {
                start: Some(*start),
                end: None,
            }),
            [start, end] => Ok(Layout::Line {
                start: Some(*start),
                end: Some(*end),
            }),
            _ => Err(ValueParseError::InvalidLayoutArguments {
                token: token.to_string(),
                reason: format!("expected 1 or 2 endpoints, got {}", endpoints.len()),
            }),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Stack => f.write_str("stack"),
            Layout::Line { start: None, .. } => f.write_str("line"),
            Layout::Line {
                start: Some(start),
                end: None,
            } => write!(f, "line[{}]", start.shortcut()),
            Layout::Line {
                start: Some(start),
                end: Some(end),
            } => write!(f, "line[{},{}]", start.shortcut(), end.shortcut()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(start: Option<Direction>, end: Option<Direction>) -> Layout {
        Layout::Line { start, end }
    }

    #[test]
    fn test_stack_names() {
        assert_eq!(Layout::parse("stack"), Ok(Layout::Stack));
        assert_eq!(Layout::parse("Stacked"), Ok(Layout::Stack));
        assert!(matches!(
            Layout::parse("stack[L]"),
            Err(ValueParseError::InvalidLayoutArguments { .. })
        ));
    }

    #[test]
    fn test_line_aliases() {
        use Direction::*;
        assert_eq!(Layout::parse("horizontal"), Ok(line(Some(Left), Some(Right))));
        assert_eq!(Layout::parse("rhorizontal"), Ok(line(Some(Right), Some(Left))));
        assert_eq!(Layout::parse("vertical"), Ok(line(Some(Top), Some(Bottom))));
        assert_eq!(Layout::parse("rvertical"), Ok(line(Some(Bottom), Some(Top))));
        assert_eq!(Layout::parse("line"), Ok(line(None, None)));
    }

    #[test]
    fn test_explicit_endpoints_override_alias() {
        use Direction::*;
        assert_eq!(Layout::parse("line[L,R]"), Layout::parse("horizontal"));
        assert_eq!(Layout::parse("vertical[Q,C]"), Ok(line(Some(TopLeft), Some(BottomRight))));
        assert_eq!(Layout::parse("line[top]"), Ok(line(Some(Top), None)));
    }

    #[test]
    fn test_bad_layouts() {
        assert_eq!(
            Layout::parse("grid"),
            Err(ValueParseError::UnknownLayout("grid".into()))
        );
        assert_eq!(
            Layout::parse("spiral[L,R]"),
            Err(ValueParseError::UnknownLayout("spiral".into()))
        );
        for bad in ["line[L,R,T]", "line[up]", "line[]", "line[L"] {
            assert!(
                matches!(
                    Layout::parse(bad),
                    Err(ValueParseError::InvalidLayoutArguments { .. })
                ),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_display_round_trips() {
        for text in ["stack", "line", "line[W]", "line[A,D]"] {
            let layout = Layout::parse(text).unwrap();
            assert_eq!(layout.to_string(), text);
        }
    }
}
