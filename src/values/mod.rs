//! Value parsers: stateless conversions from raw property tokens to typed values

mod angle;
mod color;
mod size;

pub use self::angle::{Angle, Direction, DIRECTIONS};
pub use self::color::Color;
pub use self::size::{Size, SizePair};

use thiserror::Error;

/// Failure to interpret a raw token as a typed value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueParseError {
    #[error("'{0}' is not a color (expected #RGB, #RRGGBB or a color name)")]
    InvalidColor(String),

    #[error("'{0}' is not a size (expected <number>, <number>% or <number>px)")]
    InvalidSize(String),

    #[error("size '{0}' is negative")]
    NegativeSize(String),

    #[error("'{0}' is neither an angle (<number>d) nor a direction")]
    InvalidAngle(String),

    #[error("'{0}' names the center, which has no angle")]
    NotAnAngle(String),

    #[error("'{0}' is not an unsigned integer")]
    InvalidInteger(String),

    #[error("unknown layout '{0}'")]
    UnknownLayout(String),

    #[error("invalid layout arguments in '{token}': {reason}")]
    InvalidLayoutArguments { token: String, reason: String },

    #[error("unknown arrow head '{0}' (expected triangle, diamond or indent)")]
    UnknownArrowHead(String),
}

/// Parse a plain digit sequence (no sign, no decimal point)
pub fn parse_integer(token: &str) -> Result<u32, ValueParseError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValueParseError::InvalidInteger(token.to_string()));
    }
    token
        .parse()
        .map_err(|_| ValueParseError::InvalidInteger(token.to_string()))
}

/// Parse an unsigned decimal number such as `12`, `12.5` or `.5`
pub(crate) fn parse_unsigned_number(text: &str) -> Option<f64> {
    let mut seen_digit = false;
    let mut seen_dot = false;
    for c in text.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return None,
        }
    }
    if !seen_digit {
        return None;
    }
    text.parse().ok()
}

/// Parse a decimal number with an optional leading sign
pub(crate) fn parse_signed_number(text: &str) -> Option<f64> {
    match text.strip_prefix('-') {
        Some(rest) => parse_unsigned_number(rest).map(|n| -n),
        None => parse_unsigned_number(text.strip_prefix('+').unwrap_or(text)),
    }
}
