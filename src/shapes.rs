//! Shape kinds and the per-kind geometry rules applied after property resolution

use std::fmt;

use crate::error::{CompileError, CompileErrorKind};
use crate::parser::PropertyList;
use crate::properties::{self, schema, DefaultContext, ResolvedProperties};
use crate::values::{Angle, Color, Size, ValueParseError};

/// The closed set of drawable shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Arrow,
    Circle,
    Diamond,
    Ellipse,
    Hexagon,
    Rectangle,
    Square,
    Star,
    Triangle,
}

const SHAPE_TOKENS: [(ShapeKind, &str, &str); 9] = [
    (ShapeKind::Arrow, "A", "arrow"),
    (ShapeKind::Circle, "C", "circle"),
    (ShapeKind::Diamond, "D", "diamond"),
    (ShapeKind::Ellipse, "E", "ellipse"),
    (ShapeKind::Hexagon, "H", "hexagon"),
    (ShapeKind::Rectangle, "R", "rectangle"),
    (ShapeKind::Square, "Sq", "square"),
    (ShapeKind::Star, "St", "star"),
    (ShapeKind::Triangle, "T", "triangle"),
];

impl ShapeKind {
    /// Match an exact shortcut or a case-insensitive full name
    pub fn from_token(token: &str) -> Option<Self> {
        SHAPE_TOKENS
            .iter()
            .find(|(_, shortcut, name)| *shortcut == token || name.eq_ignore_ascii_case(token))
            .map(|(kind, _, _)| *kind)
    }

    pub fn name(self) -> &'static str {
        SHAPE_TOKENS[self as usize].2
    }

    pub fn shortcut(self) -> &'static str {
        SHAPE_TOKENS[self as usize].1
    }

    /// Property schema for this kind
    pub fn schema(self) -> &'static [schema::PropertySpec] {
        match self {
            ShapeKind::Arrow => schema::ARROW,
            ShapeKind::Rectangle | ShapeKind::Square => schema::RECTANGLE,
            ShapeKind::Star => schema::STAR,
            _ => schema::SHAPE,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Arrow head style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArrowHead {
    #[default]
    Triangle,
    Diamond,
    Indent,
}

impl ArrowHead {
    pub fn parse(token: &str) -> Result<Self, ValueParseError> {
        match token.to_ascii_lowercase().as_str() {
            "triangle" => Ok(ArrowHead::Triangle),
            "diamond" => Ok(ArrowHead::Diamond),
            "indent" => Ok(ArrowHead::Indent),
            _ => Err(ValueParseError::UnknownArrowHead(token.to_string())),
        }
    }
}

impl fmt::Display for ArrowHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArrowHead::Triangle => "triangle",
            ArrowHead::Diamond => "diamond",
            ArrowHead::Indent => "indent",
        };
        f.write_str(name)
    }
}

/// Kind-specific geometry, one variant per shape kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeGeometry {
    Arrow {
        head: ArrowHead,
        /// Relative sizes resolve against the stroke width
        head_size: Size,
        stroke_width: Size,
    },
    Circle,
    Diamond,
    Ellipse,
    Hexagon,
    Rectangle {
        border_radius: Size,
    },
    Square {
        border_radius: Size,
    },
    Star {
        sides: u32,
    },
    Triangle,
}

impl ShapeGeometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeGeometry::Arrow { .. } => ShapeKind::Arrow,
            ShapeGeometry::Circle => ShapeKind::Circle,
            ShapeGeometry::Diamond => ShapeKind::Diamond,
            ShapeGeometry::Ellipse => ShapeKind::Ellipse,
            ShapeGeometry::Hexagon => ShapeKind::Hexagon,
            ShapeGeometry::Rectangle { .. } => ShapeKind::Rectangle,
            ShapeGeometry::Square { .. } => ShapeKind::Square,
            ShapeGeometry::Star { .. } => ShapeKind::Star,
            ShapeGeometry::Triangle => ShapeKind::Triangle,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub color: Color,
    pub width: u32,
}

/// Final, renderer-ready description of one shape
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedShapeAttributes {
    pub fill: Color,
    pub border: Option<Border>,
    pub width: Size,
    pub height: Size,
    /// Always `None` for circles
    pub orientation: Option<Angle>,
    pub geometry: ShapeGeometry,
}

impl ResolvedShapeAttributes {
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }
}

/// Resolve a group's property list and apply the kind's geometry rules
pub fn resolve_shape(
    kind: ShapeKind,
    list: &PropertyList,
    ctx: &DefaultContext,
) -> Result<ResolvedShapeAttributes, CompileError> {
    let props = properties::resolve(kind.schema(), list, ctx)?;
    finalize(kind, &props, ctx)
}

fn finalize(
    kind: ShapeKind,
    props: &ResolvedProperties,
    ctx: &DefaultContext,
) -> Result<ResolvedShapeAttributes, CompileError> {
    let base = ctx.base_width.unwrap_or(Size::Relative(100.0));
    let mut width = props.size("width").unwrap_or(base);
    let mut height = props.size("height").unwrap_or(width);

    match kind {
        // Documented with a single radius: width wins
        ShapeKind::Circle | ShapeKind::Square | ShapeKind::Hexagon => height = width,
        // These are drawn twice as wide as tall, so a single given axis
        // derives the other at 2:1 instead of mirroring it (DESIGN.md,
        // decision 2). Both axes given are taken as-is.
        ShapeKind::Diamond | ShapeKind::Ellipse | ShapeKind::Star => {
            match (props.is_explicit("width"), props.is_explicit("height")) {
                (true, true) => {}
                (false, true) => width = height.scale(2.0),
                (true, false) | (false, false) => height = width.scale(0.5),
            }
        }
        _ => {}
    }

    let orientation = match kind {
        ShapeKind::Circle => None,
        _ => props.required_angle("orientation")?,
    };

    let border_width = match props.integer("border_width") {
        Some(w) if props.is_explicit("border_width") => w,
        // A colour alone asks for a visible border
        _ if props.is_explicit("border_color") => ctx.border_width.max(1),
        Some(w) => w,
        None => ctx.border_width,
    };
    let border = (border_width > 0).then(|| Border {
        color: props
            .color("border_color")
            .cloned()
            .unwrap_or_else(|| ctx.border_color.clone()),
        width: border_width,
    });

    let geometry = match kind {
        ShapeKind::Arrow => ShapeGeometry::Arrow {
            head: props.arrow_head("head").unwrap_or_default(),
            head_size: props.size("head_size").unwrap_or(Size::Relative(200.0)),
            stroke_width: props.size("stroke_width").unwrap_or(Size::Relative(12.5)),
        },
        ShapeKind::Circle => ShapeGeometry::Circle,
        ShapeKind::Diamond => ShapeGeometry::Diamond,
        ShapeKind::Ellipse => ShapeGeometry::Ellipse,
        ShapeKind::Hexagon => ShapeGeometry::Hexagon,
        ShapeKind::Rectangle => ShapeGeometry::Rectangle {
            border_radius: props.size("border_radius").unwrap_or(Size::Fixed(0.0)),
        },
        ShapeKind::Square => ShapeGeometry::Square {
            border_radius: props.size("border_radius").unwrap_or(Size::Fixed(0.0)),
        },
        ShapeKind::Star => {
            let sides = props.integer("sides").unwrap_or(5);
            if sides < 3 {
                return Err(CompileError::new(
                    CompileErrorKind::InvalidShapeParameter {
                        shape: kind.name().to_string(),
                        parameter: "sides".to_string(),
                        reason: format!("a star needs at least 3 sides, got {}", sides),
                    },
                    props.span_of("sides"),
                ));
            }
            ShapeGeometry::Star { sides }
        }
        ShapeKind::Triangle => ShapeGeometry::Triangle,
    };

    Ok(ResolvedShapeAttributes {
        fill: props
            .color("fill")
            .cloned()
            .unwrap_or_else(|| ctx.fill.clone()),
        border,
        width,
        height,
        orientation,
        geometry,
    })
}
