use std::fmt;
use std::str::FromStr;

use ::color::{DynamicColor, Srgb};

use super::ValueParseError;

/// A syntactically valid color
///
/// Hex forms are expanded to their components; names are kept lowercase and
/// handed to the renderer as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Color {
    Rgb { r: u8, g: u8, b: u8 },
    Named(String),
}

impl Color {
    /// Parse `#RGB`, `#RRGGBB` or a CSS color keyword
    ///
    /// Only these two spellings are accepted; the CSS parser itself would
    /// also take `rgb(...)` and friends.
    pub fn parse(token: &str) -> Result<Self, ValueParseError> {
        let invalid = || ValueParseError::InvalidColor(token.to_string());

        if let Some(hex) = token.strip_prefix('#') {
            if !matches!(hex.len(), 3 | 6) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let rgba = DynamicColor::from_str(token)
                .map_err(|_| invalid())?
                .to_alpha_color::<Srgb>()
                .to_rgba8();
            return Ok(Color::rgb(rgba.r, rgba.g, rgba.b));
        }

        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        let name = token.to_ascii_lowercase();
        DynamicColor::from_str(&name).map_err(|_| invalid())?;
        Ok(Color::Named(name))
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Rgb { r, g, b } => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
            Color::Named(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hex() {
        assert_eq!(Color::parse("#f80"), Ok(Color::rgb(0xff, 0x88, 0x00)));
    }

    #[test]
    fn test_long_hex() {
        assert_eq!(Color::parse("#1A2b3C"), Ok(Color::rgb(0x1a, 0x2b, 0x3c)));
        assert_eq!(Color::rgb(0x1a, 0x2b, 0x3c).to_string(), "#1a2b3c");
    }

    #[test]
    fn test_named_case_insensitive() {
        assert_eq!(Color::parse("SteelBlue"), Ok(Color::Named("steelblue".into())));
        assert_eq!(Color::parse("rebeccapurple"), Ok(Color::Named("rebeccapurple".into())));
    }

    #[test]
    fn test_rejections() {
        for bad in ["#ff", "#ffff", "#fffffff", "#ggg", "#", "blurple", "", "top"] {
            assert!(Color::parse(bad).is_err(), "{bad} should not be a color");
        }
    }

    #[test]
    fn test_other_css_forms_rejected() {
        for bad in ["rgb(255,0,0)", "hsl(0,100%,50%)", "#ff000080", "#f008", "light-blue"] {
            assert!(Color::parse(bad).is_err(), "{bad} should not be a color");
        }
    }
}
