use std::fmt;

use super::{parse_signed_number, ValueParseError};

/// A length that is either absolute (pixels) or a percentage of a reference
/// dimension only known once the shape has been placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Size {
    Fixed(f64),
    /// Percentage, e.g. `45.0` for `45%`
    Relative(f64),
}

impl Size {
    /// Parse `<number>`, `<number>%` or `<number>px`
    pub fn parse(token: &str) -> Result<Self, ValueParseError> {
        let (number, relative) = if let Some(n) = token.strip_suffix('%') {
            (n, true)
        } else if let Some(n) = token.strip_suffix("px") {
            (n, false)
        } else {
            (token, false)
        };

        let value = parse_signed_number(number)
            .ok_or_else(|| ValueParseError::InvalidSize(token.to_string()))?;
        if value < 0.0 {
            return Err(ValueParseError::NegativeSize(token.to_string()));
        }

        Ok(if relative {
            Size::Relative(value)
        } else {
            Size::Fixed(value)
        })
    }

    /// Multiply the magnitude, keeping the unit
    pub fn scale(self, factor: f64) -> Self {
        match self {
            Size::Fixed(v) => Size::Fixed(v * factor),
            Size::Relative(p) => Size::Relative(p * factor),
        }
    }

    /// Absolute value against a reference dimension
    pub fn resolve(self, reference: f64) -> f64 {
        match self {
            Size::Fixed(v) => v,
            Size::Relative(p) => reference * p / 100.0,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Size::Fixed(v) => write!(f, "{}px", v),
            Size::Relative(p) => write!(f, "{}%", p),
        }
    }
}

/// Two-axis size declaration: `WxH`, `Wx` or `xH`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizePair {
    pub width: Option<Size>,
    pub height: Option<Size>,
}

impl SizePair {
    /// Byte index of the axis separator, skipping the `x` of a `px` unit
    fn separator(token: &str) -> Option<usize> {
        let bytes = token.as_bytes();
        let mut found = None;
        for (i, b) in bytes.iter().enumerate() {
            if *b == b'x' && (i == 0 || bytes[i - 1] != b'p') {
                if found.is_some() {
                    return None;
                }
                found = Some(i);
            }
        }
        found
    }

    /// Whether the token uses the two-axis form
    pub fn is_pair_form(token: &str) -> bool {
        Self::separator(token).is_some()
    }

    /// Parse the two-axis form; omitted sides stay `None`
    pub fn parse(token: &str) -> Result<Self, ValueParseError> {
        let sep = Self::separator(token)
            .ok_or_else(|| ValueParseError::InvalidSize(token.to_string()))?;
        let (w, h) = (&token[..sep], &token[sep + 1..]);
        if w.is_empty() && h.is_empty() {
            return Err(ValueParseError::InvalidSize(token.to_string()));
        }
        let side = |s: &str| -> Result<Option<Size>, ValueParseError> {
            if s.is_empty() {
                Ok(None)
            } else {
                Size::parse(s).map(Some)
            }
        };
        Ok(SizePair {
            width: side(w)?,
            height: side(h)?,
        })
    }
}
