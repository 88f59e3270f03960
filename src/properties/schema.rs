//! Static property schemas for cells and shapes

use crate::layout::Layout;
use crate::shapes::ArrowHead;
use crate::values::{
    parse_integer, Angle, Color, Size, ValueParseError,
};

use super::Value;

/// How a property may be given without its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Native {
    /// Positional slot, filled in ascending order
    Numbered(u8),
    /// Positional slot taken after all numbered ones
    Flagged,
    /// Only by name
    NotNative,
}

/// Value type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    Color,
    Size,
    Angle,
    Integer,
    Layout,
    ArrowHead,
}

impl PropertyType {
    pub fn parse(self, token: &str) -> Result<Value, ValueParseError> {
        match self {
            PropertyType::Color => Color::parse(token).map(Value::Color),
            PropertyType::Size => Size::parse(token).map(Value::Size),
            PropertyType::Angle => Angle::parse(token).map(Value::Angle),
            PropertyType::Integer => parse_integer(token).map(Value::Integer),
            PropertyType::Layout => Layout::parse(token).map(Value::Layout),
            PropertyType::ArrowHead => ArrowHead::parse(token).map(Value::ArrowHead),
        }
    }
}

/// Which dimension a size property controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    pub fn sibling(self) -> &'static str {
        match self {
            Dimension::Width => "height",
            Dimension::Height => "width",
        }
    }
}

/// Default known when the schema is written
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StaticDefault {
    Size(Size),
    Integer(u32),
    Layout(Layout),
    ArrowHead(ArrowHead),
}

impl StaticDefault {
    pub fn value(self) -> Value {
        match self {
            StaticDefault::Size(size) => Value::Size(size),
            StaticDefault::Integer(n) => Value::Integer(n),
            StaticDefault::Layout(layout) => Value::Layout(layout),
            StaticDefault::ArrowHead(head) => Value::ArrowHead(head),
        }
    }
}

/// Default taken from the configuration or the owning cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextDefault {
    Fill,
    BorderColor,
    BorderWidth,
    Orientation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    /// Stays unset
    Absent,
    Static(StaticDefault),
    Context(ContextDefault),
    /// Width or height: depends on which of the pair was given explicitly
    Axis(Dimension),
}

/// One row of a schema
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub native: Native,
    pub ty: PropertyType,
    pub default: DefaultValue,
}

impl PropertySpec {
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

/// Name accepted by every schema that has width and height, setting both
pub const SIZE_PSEUDO_PROPERTY: &str = "size";

/// Lowercase and treat `-` like `_`
pub fn normalize_name(name: &str) -> String {
    name.to_ascii_lowercase().replace('-', "_")
}

const fn spec(
    name: &'static str,
    aliases: &'static [&'static str],
    native: Native,
    ty: PropertyType,
    default: DefaultValue,
) -> PropertySpec {
    PropertySpec {
        name,
        aliases,
        native,
        ty,
        default,
    }
}

const WIDTH: PropertySpec = spec(
    "width",
    &[],
    Native::Numbered(1),
    PropertyType::Size,
    DefaultValue::Axis(Dimension::Width),
);
const HEIGHT: PropertySpec = spec(
    "height",
    &[],
    Native::Numbered(2),
    PropertyType::Size,
    DefaultValue::Axis(Dimension::Height),
);
const FILL: PropertySpec = spec(
    "fill",
    &["color", "colour"],
    Native::Numbered(3),
    PropertyType::Color,
    DefaultValue::Context(ContextDefault::Fill),
);
const BORDER_COLOR: PropertySpec = spec(
    "border_color",
    &["border_colour", "stroke"],
    Native::Numbered(4),
    PropertyType::Color,
    DefaultValue::Context(ContextDefault::BorderColor),
);
const ORIENTATION: PropertySpec = spec(
    "orientation",
    &[],
    Native::Flagged,
    PropertyType::Angle,
    DefaultValue::Context(ContextDefault::Orientation),
);
const BORDER_WIDTH: PropertySpec = spec(
    "border_width",
    &[],
    Native::NotNative,
    PropertyType::Integer,
    DefaultValue::Context(ContextDefault::BorderWidth),
);
const BORDER_RADIUS: PropertySpec = spec(
    "border_radius",
    &["radius"],
    Native::NotNative,
    PropertyType::Size,
    DefaultValue::Static(StaticDefault::Size(Size::Fixed(0.0))),
);
const SIDES: PropertySpec = spec(
    "sides",
    &[],
    Native::NotNative,
    PropertyType::Integer,
    DefaultValue::Static(StaticDefault::Integer(5)),
);
const HEAD: PropertySpec = spec(
    "head",
    &["style"],
    Native::NotNative,
    PropertyType::ArrowHead,
    DefaultValue::Static(StaticDefault::ArrowHead(ArrowHead::Triangle)),
);
const HEAD_SIZE: PropertySpec = spec(
    "head_size",
    &[],
    Native::NotNative,
    PropertyType::Size,
    DefaultValue::Static(StaticDefault::Size(Size::Relative(200.0))),
);
const STROKE_WIDTH: PropertySpec = spec(
    "stroke_width",
    &[],
    Native::NotNative,
    PropertyType::Size,
    DefaultValue::Static(StaticDefault::Size(Size::Relative(12.5))),
);

/// Circle, diamond, ellipse, hexagon and triangle
pub static SHAPE: &[PropertySpec] = &[WIDTH, HEIGHT, FILL, BORDER_COLOR, ORIENTATION, BORDER_WIDTH];

pub static RECTANGLE: &[PropertySpec] = &[
    WIDTH,
    HEIGHT,
    FILL,
    BORDER_COLOR,
    ORIENTATION,
    BORDER_WIDTH,
    BORDER_RADIUS,
];

pub static STAR: &[PropertySpec] = &[
    WIDTH,
    HEIGHT,
    FILL,
    BORDER_COLOR,
    ORIENTATION,
    BORDER_WIDTH,
    SIDES,
];

pub static ARROW: &[PropertySpec] = &[
    WIDTH,
    HEIGHT,
    FILL,
    BORDER_COLOR,
    ORIENTATION,
    BORDER_WIDTH,
    HEAD,
    HEAD_SIZE,
    STROKE_WIDTH,
];

/// Cell configuration block
pub static CELL: &[PropertySpec] = &[
    spec(
        "layout",
        &[],
        Native::Numbered(1),
        PropertyType::Layout,
        DefaultValue::Static(StaticDefault::Layout(Layout::Stack)),
    ),
    spec(
        "background",
        &["bg", "bg_color", "background_color"],
        Native::Numbered(2),
        PropertyType::Color,
        DefaultValue::Absent,
    ),
    spec(
        "width",
        &[],
        Native::Numbered(3),
        PropertyType::Size,
        DefaultValue::Axis(Dimension::Width),
    ),
    spec(
        "height",
        &[],
        Native::Numbered(4),
        PropertyType::Size,
        DefaultValue::Axis(Dimension::Height),
    ),
    spec(
        "orientation",
        &[],
        Native::Flagged,
        PropertyType::Angle,
        DefaultValue::Absent,
    ),
];

/// Positional slots in assignment order: numbered ascending, then flagged
pub fn native_order(schema: &[PropertySpec]) -> Vec<usize> {
    let mut numbered: Vec<(u8, usize)> = schema
        .iter()
        .enumerate()
        .filter_map(|(i, s)| match s.native {
            Native::Numbered(n) => Some((n, i)),
            _ => None,
        })
        .collect();
    numbered.sort_by_key(|(n, _)| *n);

    numbered
        .into_iter()
        .map(|(_, i)| i)
        .chain(
            schema
                .iter()
                .enumerate()
                .filter(|(_, s)| s.native == Native::Flagged)
                .map(|(i, _)| i),
        )
        .collect()
}

/// Index of the property called `name` (already normalized)
pub fn lookup(schema: &[PropertySpec], name: &str) -> Option<usize> {
    schema.iter().position(|s| s.matches(name))
}
