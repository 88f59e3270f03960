use std::fmt;

use super::{parse_signed_number, ValueParseError};

/// One of the nine named cell positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
    Top,
    TopRight,
    Center,
}

/// Row of the direction table
#[derive(Debug, Clone, Copy)]
pub struct DirectionEntry {
    pub direction: Direction,
    pub mnemonic: &'static str,
    pub shortcut: &'static str,
    /// Additional single-letter spellings
    pub aliases: &'static [&'static str],
    /// Screen-space degrees: 0 points right, 90 points down. `None` for the center.
    pub degrees: Option<f64>,
    /// Normalized cell position, origin at the top-left corner
    pub position: (f64, f64),
}

/// The direction table. Angles follow the unit circle with the y axis
/// pointing down, so `bottom_left` sits at 135°.
pub const DIRECTIONS: [DirectionEntry; 9] = [
    DirectionEntry {
        direction: Direction::Right,
        mnemonic: "right",
        shortcut: "D",
        aliases: &["R"],
        degrees: Some(0.0),
        position: (1.0, 0.5),
    },
    DirectionEntry {
        direction: Direction::BottomRight,
        mnemonic: "bottom_right",
        shortcut: "C",
        aliases: &[],
        degrees: Some(45.0),
        position: (1.0, 1.0),
    },
    DirectionEntry {
        direction: Direction::Bottom,
        mnemonic: "bottom",
        shortcut: "X",
        aliases: &["B"],
        degrees: Some(90.0),
        position: (0.5, 1.0),
    },
    DirectionEntry {
        direction: Direction::BottomLeft,
        mnemonic: "bottom_left",
        shortcut: "Z",
        aliases: &[],
        degrees: Some(135.0),
        position: (0.0, 1.0),
    },
    DirectionEntry {
        direction: Direction::Left,
        mnemonic: "left",
        shortcut: "A",
        aliases: &["L"],
        degrees: Some(180.0),
        position: (0.0, 0.5),
    },
    DirectionEntry {
        direction: Direction::TopLeft,
        mnemonic: "top_left",
        shortcut: "Q",
        aliases: &[],
        degrees: Some(225.0),
        position: (0.0, 0.0),
    },
    DirectionEntry {
        direction: Direction::Top,
        mnemonic: "top",
        shortcut: "W",
        aliases: &["T"],
        degrees: Some(270.0),
        position: (0.5, 0.0),
    },
    DirectionEntry {
        direction: Direction::TopRight,
        mnemonic: "top_right",
        shortcut: "E",
        aliases: &[],
        degrees: Some(315.0),
        position: (1.0, 0.0),
    },
    DirectionEntry {
        direction: Direction::Center,
        mnemonic: "center",
        shortcut: "S",
        aliases: &["M"],
        degrees: None,
        position: (0.5, 0.5),
    },
];

impl Direction {
    fn entry(self) -> &'static DirectionEntry {
        // The table holds exactly one row per variant, in declaration order.
        &DIRECTIONS[self as usize]
    }

    /// Look up a mnemonic (case-insensitive, `-` or `_`), shortcut or alias
    pub fn parse(token: &str) -> Option<Self> {
        let mnemonic = token.to_ascii_lowercase().replace('-', "_");
        DIRECTIONS
            .iter()
            .find(|e| {
                e.mnemonic == mnemonic || e.shortcut == token || e.aliases.contains(&token)
            })
            .map(|e| e.direction)
    }

    pub fn mnemonic(self) -> &'static str {
        self.entry().mnemonic
    }

    pub fn shortcut(self) -> &'static str {
        self.entry().shortcut
    }

    pub fn degrees(self) -> Option<f64> {
        self.entry().degrees
    }

    pub fn position(self) -> (f64, f64) {
        self.entry().position
    }

    /// The direction mirrored through the cell center
    pub fn opposite(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::BottomRight => Direction::TopLeft,
            Direction::Bottom => Direction::Top,
            Direction::BottomLeft => Direction::TopRight,
            Direction::Left => Direction::Right,
            Direction::TopLeft => Direction::BottomRight,
            Direction::Top => Direction::Bottom,
            Direction::TopRight => Direction::BottomLeft,
            Direction::Center => Direction::Center,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// An orientation: explicit degrees or a named direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Angle {
    Degrees(f64),
    Direction(Direction),
}

impl Angle {
    /// Parse `<number>d` (any sign) or a direction
    pub fn parse(token: &str) -> Result<Self, ValueParseError> {
        if let Some(number) = token.strip_suffix('d') {
            if let Some(degrees) = parse_signed_number(number) {
                return Ok(Angle::Degrees(degrees));
            }
        }
        Direction::parse(token)
            .map(Angle::Direction)
            .ok_or_else(|| ValueParseError::InvalidAngle(token.to_string()))
    }

    /// Degrees as written; `None` for the center
    pub fn degrees(&self) -> Option<f64> {
        match self {
            Angle::Degrees(d) => Some(*d),
            Angle::Direction(dir) => dir.degrees(),
        }
    }

    pub fn is_center(&self) -> bool {
        matches!(self, Angle::Direction(Direction::Center))
    }

    /// Reject the center where a real angle is required
    pub fn require_angle(self) -> Result<Self, ValueParseError> {
        if self.is_center() {
            Err(ValueParseError::NotAnAngle(self.to_string()))
        } else {
            Ok(self)
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Angle::Degrees(d) => write!(f, "{}d", d),
            Angle::Direction(dir) => write!(f, "{}", dir),
        }
    }
}
