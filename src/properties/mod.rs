//! Property resolution: raw `{...}` entries to typed values
//!
//! Resolution runs against a static [`schema`] in four passes:
//!
//! 1. positional entries fill the native slots, each going to the first open
//!    slot whose type accepts it;
//! 2. named entries are applied, later ones overriding earlier ones;
//! 3. unset properties take their static or contextual default;
//! 4. width and height follow the cardinality rule: with neither given both
//!    take the base size, with one given the other mirrors it.

pub mod schema;

use log::trace;

use crate::error::{CompileError, CompileErrorKind};
use crate::layout::Layout;
use crate::parser::{PropertyList, Span, Spanned};
use crate::shapes::ArrowHead;
use crate::values::{Angle, Color, Size, SizePair, ValueParseError};

use schema::{
    ContextDefault, DefaultValue, Dimension, PropertySpec, PropertyType, SIZE_PSEUDO_PROPERTY,
};

/// A typed property value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Color(Color),
    Size(Size),
    Angle(Angle),
    Integer(u32),
    Layout(Layout),
    ArrowHead(ArrowHead),
}

/// Defaults that depend on configuration or on the owning cell
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultContext {
    pub fill: Color,
    pub border_color: Color,
    pub border_width: u32,
    /// Inherited orientation
    pub orientation: Option<Angle>,
    /// Size used when neither width nor height is given
    pub base_width: Option<Size>,
    pub base_height: Option<Size>,
}

impl Default for DefaultContext {
    fn default() -> Self {
        Self {
            fill: Color::rgb(255, 0, 0),
            border_color: Color::rgb(255, 0, 0),
            border_width: 0,
            orientation: None,
            base_width: None,
            base_height: None,
        }
    }
}

/// Resolved values of one property list, with the spans of explicit ones
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProperties {
    schema: &'static [PropertySpec],
    values: Vec<Option<Value>>,
    spans: Vec<Option<Span>>,
}

impl ResolvedProperties {
    fn empty(schema: &'static [PropertySpec]) -> Self {
        Self {
            schema,
            values: vec![None; schema.len()],
            spans: vec![None; schema.len()],
        }
    }

    fn set(&mut self, index: usize, value: Value, span: Span) {
        self.values[index] = Some(value);
        self.spans[index] = Some(span);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        schema::lookup(self.schema, name).and_then(|i| self.values[i].as_ref())
    }

    pub fn color(&self, name: &str) -> Option<&Color> {
        match self.get(name) {
            Some(Value::Color(color)) => Some(color),
            _ => None,
        }
    }

    pub fn size(&self, name: &str) -> Option<Size> {
        match self.get(name) {
            Some(Value::Size(size)) => Some(*size),
            _ => None,
        }
    }

    pub fn angle(&self, name: &str) -> Option<Angle> {
        match self.get(name) {
            Some(Value::Angle(angle)) => Some(*angle),
            _ => None,
        }
    }

    /// Like [`angle`](Self::angle), but the center is a type error
    pub fn required_angle(&self, name: &str) -> Result<Option<Angle>, CompileError> {
        self.angle(name)
            .map(|angle| {
                angle.require_angle().map_err(|source| {
                    CompileError::property_type(name, angle.to_string(), source, self.span_of(name))
                })
            })
            .transpose()
    }

    pub fn integer(&self, name: &str) -> Option<u32> {
        match self.get(name) {
            Some(Value::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn layout(&self, name: &str) -> Option<Layout> {
        match self.get(name) {
            Some(Value::Layout(layout)) => Some(*layout),
            _ => None,
        }
    }

    pub fn arrow_head(&self, name: &str) -> Option<ArrowHead> {
        match self.get(name) {
            Some(Value::ArrowHead(head)) => Some(*head),
            _ => None,
        }
    }

    /// Whether the property was written in the source, by name or position
    pub fn is_explicit(&self, name: &str) -> bool {
        self.span_of(name).is_some()
    }

    /// Span of the value that set the property, if it was explicit
    pub fn span_of(&self, name: &str) -> Option<Span> {
        schema::lookup(self.schema, name).and_then(|i| self.spans[i].clone())
    }
}

/// Resolve `list` against `schema`
pub fn resolve(
    schema: &'static [PropertySpec],
    list: &PropertyList,
    ctx: &DefaultContext,
) -> Result<ResolvedProperties, CompileError> {
    let mut props = ResolvedProperties::empty(schema);
    assign_positional(&mut props, list)?;
    apply_named(&mut props, list)?;
    apply_defaults(&mut props, ctx);
    Ok(props)
}

/// What a positional token turned into for one slot
enum SlotValue {
    Single(Value),
    Pair(SizePair),
}

fn try_slot(spec: &PropertySpec, token: &str) -> Result<SlotValue, ValueParseError> {
    if spec.ty == PropertyType::Size && SizePair::is_pair_form(token) {
        SizePair::parse(token).map(SlotValue::Pair)
    } else {
        spec.ty.parse(token).map(SlotValue::Single)
    }
}

fn assign_positional(props: &mut ResolvedProperties, list: &PropertyList) -> Result<(), CompileError> {
    let schema = props.schema;
    let order = schema::native_order(schema);
    let mut taken = vec![false; order.len()];
    let count = list.positional().count();

    for value in list.positional() {
        let token = value.node.as_str();
        let open: Vec<usize> = (0..order.len()).filter(|&k| !taken[k]).collect();

        let Some(&first) = open.first() else {
            return Err(CompileError::new(
                CompileErrorKind::TooManyPositionalProperties {
                    count,
                    slots: order.len(),
                },
                Some(value.span.clone()),
            ));
        };

        let (slot, parsed) = match try_slot(&schema[order[first]], token) {
            Ok(parsed) => (first, parsed),
            Err(first_error) => open[1..]
                .iter()
                .find_map(|&k| try_slot(&schema[order[k]], token).ok().map(|p| (k, p)))
                .ok_or_else(|| type_error(&schema[order[first]], value, first_error))?,
        };

        taken[slot] = true;
        trace!(property = schema[order[slot]].name, token; "Assigned positional value");

        match parsed {
            SlotValue::Single(v) => props.set(order[slot], v, value.span.clone()),
            SlotValue::Pair(pair) => {
                if let Some(width) = pair.width {
                    props.set(order[slot], Value::Size(width), value.span.clone());
                }
                let second = open
                    .iter()
                    .copied()
                    .find(|&k| k > slot && schema[order[k]].ty == PropertyType::Size);
                match (second, pair.height) {
                    (Some(k), height) => {
                        taken[k] = true;
                        if let Some(height) = height {
                            props.set(order[k], Value::Size(height), value.span.clone());
                        }
                    }
                    (None, Some(_)) => {
                        return Err(CompileError::new(
                            CompileErrorKind::TooManyPositionalProperties {
                                count: count + 1,
                                slots: order.len(),
                            },
                            Some(value.span.clone()),
                        ))
                    }
                    (None, None) => {}
                }
            }
        }
    }
    Ok(())
}

fn apply_named(props: &mut ResolvedProperties, list: &PropertyList) -> Result<(), CompileError> {
    let schema = props.schema;

    for (name, value) in list.named() {
        let normalized = schema::normalize_name(&name.node);

        if normalized == SIZE_PSEUDO_PROPERTY {
            if let (Some(w), Some(h)) = (
                schema::lookup(schema, "width"),
                schema::lookup(schema, "height"),
            ) {
                let pair = if SizePair::is_pair_form(&value.node) {
                    SizePair::parse(&value.node)
                } else {
                    Size::parse(&value.node).map(|size| SizePair {
                        width: Some(size),
                        height: Some(size),
                    })
                }
                .map_err(|e| {
                    CompileError::property_type(
                        SIZE_PSEUDO_PROPERTY,
                        value.node.clone(),
                        e,
                        Some(value.span.clone()),
                    )
                })?;
                if let Some(width) = pair.width {
                    props.set(w, Value::Size(width), value.span.clone());
                }
                if let Some(height) = pair.height {
                    props.set(h, Value::Size(height), value.span.clone());
                }
                continue;
            }
        }

        let index = schema::lookup(schema, &normalized).ok_or_else(|| {
            CompileError::new(
                CompileErrorKind::UnknownProperty {
                    name: name.node.clone(),
                },
                Some(name.span.clone()),
            )
        })?;
        let spec = &schema[index];
        let parsed = spec
            .ty
            .parse(&value.node)
            .map_err(|e| type_error(spec, value, e))?;
        props.set(index, parsed, value.span.clone());
    }
    Ok(())
}

fn apply_defaults(props: &mut ResolvedProperties, ctx: &DefaultContext) {
    let schema = props.schema;

    for (index, spec) in schema.iter().enumerate() {
        if props.values[index].is_some() {
            continue;
        }
        let value = match spec.default {
            DefaultValue::Absent => None,
            DefaultValue::Static(default) => Some(default.value()),
            DefaultValue::Context(ContextDefault::Fill) => Some(Value::Color(ctx.fill.clone())),
            DefaultValue::Context(ContextDefault::BorderColor) => {
                Some(Value::Color(ctx.border_color.clone()))
            }
            DefaultValue::Context(ContextDefault::BorderWidth) => {
                Some(Value::Integer(ctx.border_width))
            }
            DefaultValue::Context(ContextDefault::Orientation) => ctx.orientation.map(Value::Angle),
            DefaultValue::Axis(dimension) => {
                let sibling = schema::lookup(schema, dimension.sibling())
                    .filter(|&i| props.spans[i].is_some());
                match sibling {
                    // Mirror the axis that was given
                    Some(i) => props.values[i].clone(),
                    None => match dimension {
                        Dimension::Width => ctx.base_width.map(Value::Size),
                        Dimension::Height => ctx.base_height.map(Value::Size),
                    },
                }
            }
        };
        props.values[index] = value;
    }
}

fn type_error(spec: &PropertySpec, value: &Spanned<String>, error: ValueParseError) -> CompileError {
    match error {
        ValueParseError::UnknownLayout(name) => CompileError::new(
            CompileErrorKind::UnknownLayout { name },
            Some(value.span.clone()),
        ),
        source => CompileError::property_type(
            spec.name,
            value.node.clone(),
            source,
            Some(value.span.clone()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PropertyEntry;
    use crate::values::Direction;
    use super::schema::{Native, CELL, RECTANGLE, SHAPE, STAR};

    /// Build a list from `;`-free entry texts laid out as in `{a;b;c}`
    fn list(entries: &[&str]) -> PropertyList {
        let mut offset = 1;
        let entries = entries
            .iter()
            .map(|text| {
                let span = offset..offset + text.len();
                offset = span.end + 1;
                let entry = match text.split_once('=') {
                    Some((name, value)) => PropertyEntry::Named {
                        name: Spanned::new(name.to_string(), span.start..span.start + name.len()),
                        value: Spanned::new(value.to_string(), span.start + name.len() + 1..span.end),
                    },
                    None => PropertyEntry::Positional(Spanned::new(text.to_string(), span.clone())),
                };
                Spanned::new(entry, span)
            })
            .collect();
        PropertyList::new(entries)
    }

    fn resolve_shape(entries: &[&str]) -> Result<ResolvedProperties, CompileError> {
        resolve(SHAPE, &list(entries), &DefaultContext::default())
    }

    #[test]
    fn test_positional_by_type() {
        let props = resolve_shape(&["45%", "blue"]).unwrap();
        assert_eq!(props.size("width"), Some(Size::Relative(45.0)));
        assert_eq!(props.color("fill"), Some(&Color::Named("blue".into())));
        assert!(props.is_explicit("width"));
        assert!(!props.is_explicit("height"));
    }

    #[test]
    fn test_positional_in_native_order() {
        let props = resolve(RECTANGLE, &list(&["80", "23%"]), &DefaultContext::default()).unwrap();
        assert_eq!(props.size("width"), Some(Size::Fixed(80.0)));
        assert_eq!(props.size("height"), Some(Size::Relative(23.0)));
    }

    #[test]
    fn test_flagged_slot_takes_directions() {
        let props = resolve_shape(&["top"]).unwrap();
        assert_eq!(props.angle("orientation"), Some(Angle::Direction(Direction::Top)));
        assert_eq!(props.size("width"), None);
    }

    #[test]
    fn test_two_colors_fill_then_border() {
        let props = resolve_shape(&["red", "#00f"]).unwrap();
        assert_eq!(props.color("fill"), Some(&Color::Named("red".into())));
        assert_eq!(props.color("border_color"), Some(&Color::rgb(0, 0, 255)));
    }

    #[test]
    fn test_pair_form_consumes_both_slots() {
        let props = resolve_shape(&["45%x", "blue", "30%"]).unwrap_err();
        // Width and height are both taken, and `30%` fits nothing else
        assert!(matches!(props.kind, CompileErrorKind::PropertyType { .. }));

        let props = resolve_shape(&["x20", "green"]).unwrap();
        assert_eq!(props.size("height"), Some(Size::Fixed(20.0)));
        assert_eq!(props.size("width"), Some(Size::Fixed(20.0)));
        assert!(!props.is_explicit("width"));
    }

    #[test]
    fn test_too_many_positional() {
        let err = resolve_shape(&["1", "2", "red", "blue", "top", "green"]).unwrap_err();
        assert_eq!(
            err.kind,
            CompileErrorKind::TooManyPositionalProperties { count: 6, slots: 5 }
        );
        assert_eq!(err.span, Some(18..23));
    }

    #[test]
    fn test_unknown_property() {
        let err = resolve_shape(&["foo=1"]).unwrap_err();
        assert_eq!(
            err.kind,
            CompileErrorKind::UnknownProperty {
                name: "foo".to_string()
            }
        );
        assert_eq!(err.span, Some(1..4));
    }

    #[test]
    fn test_named_type_error_names_property() {
        let err = resolve_shape(&["fill=45%"]).unwrap_err();
        match err.kind {
            CompileErrorKind::PropertyType {
                property, token, ..
            } => {
                assert_eq!(property, "fill");
                assert_eq!(token, "45%");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_named_aliases_and_case() {
        let props = resolve_shape(&["Border-Color=red", "COLOR=blue"]).unwrap();
        assert_eq!(props.color("border_color"), Some(&Color::Named("red".into())));
        assert_eq!(props.color("fill"), Some(&Color::Named("blue".into())));
    }

    #[test]
    fn test_last_write_wins() {
        let props = resolve_shape(&["red", "fill=blue", "fill=green"]).unwrap();
        assert_eq!(props.color("fill"), Some(&Color::Named("green".into())));
    }

    #[test]
    fn test_size_pseudo_property() {
        let props = resolve_shape(&["size=30%x10"]).unwrap();
        assert_eq!(props.size("width"), Some(Size::Relative(30.0)));
        assert_eq!(props.size("height"), Some(Size::Fixed(10.0)));

        let props = resolve_shape(&["size=5"]).unwrap();
        assert!(props.is_explicit("width") && props.is_explicit("height"));
    }

    #[test]
    fn test_cardinality_tiers() {
        let ctx = DefaultContext {
            base_width: Some(Size::Relative(80.0)),
            base_height: Some(Size::Relative(60.0)),
            ..DefaultContext::default()
        };

        // Neither: base size
        let props = resolve(SHAPE, &list(&[]), &ctx).unwrap();
        assert_eq!(props.size("width"), Some(Size::Relative(80.0)));
        assert_eq!(props.size("height"), Some(Size::Relative(60.0)));

        // One: the other mirrors it
        let props = resolve(SHAPE, &list(&["width=45%"]), &ctx).unwrap();
        assert_eq!(props.size("height"), Some(Size::Relative(45.0)));
        let props = resolve(SHAPE, &list(&["height=7"]), &ctx).unwrap();
        assert_eq!(props.size("width"), Some(Size::Fixed(7.0)));
    }

    #[test]
    fn test_context_defaults() {
        let ctx = DefaultContext {
            fill: Color::Named("navy".into()),
            orientation: Some(Angle::Degrees(30.0)),
            border_width: 2,
            ..DefaultContext::default()
        };
        let props = resolve(STAR, &list(&[]), &ctx).unwrap();
        assert_eq!(props.color("fill"), Some(&Color::Named("navy".into())));
        assert_eq!(props.angle("orientation"), Some(Angle::Degrees(30.0)));
        assert_eq!(props.integer("border_width"), Some(2));
        assert_eq!(props.integer("sides"), Some(5));
        assert!(!props.is_explicit("fill"));
        assert!(!props.is_explicit("orientation"));
    }

    #[test]
    fn test_cell_schema() {
        let props = resolve(CELL, &list(&["horizontal", "#eee", "Z"]), &DefaultContext::default()).unwrap();
        assert_eq!(
            props.layout("layout"),
            Some(Layout::Line {
                start: Some(Direction::Left),
                end: Some(Direction::Right)
            })
        );
        assert_eq!(props.color("background"), Some(&Color::rgb(0xee, 0xee, 0xee)));
        assert_eq!(
            props.angle("orientation"),
            Some(Angle::Direction(Direction::BottomLeft))
        );
        assert_eq!(props.size("width"), None);
    }

    #[test]
    fn test_unknown_layout_in_first_slot() {
        let err = resolve(CELL, &list(&["spiral"]), &DefaultContext::default()).unwrap_err();
        assert_eq!(
            err.kind,
            CompileErrorKind::UnknownLayout {
                name: "spiral".to_string()
            }
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let entries = list(&["45%", "blue", "orientation=30d", "border-width=2"]);
        let ctx = DefaultContext::default();
        assert_eq!(resolve(SHAPE, &entries, &ctx), resolve(SHAPE, &entries, &ctx));
    }

    #[test]
    fn test_required_angle_rejects_center() {
        let props = resolve_shape(&["orientation=S"]).unwrap();
        let err = props.required_angle("orientation").unwrap_err();
        assert!(matches!(
            err.kind,
            CompileErrorKind::PropertyType {
                source: ValueParseError::NotAnAngle(_),
                ..
            }
        ));
        assert_eq!(err.span, Some(13..14));

        let props = resolve_shape(&["Q"]).unwrap();
        assert_eq!(
            props.required_angle("orientation"),
            Ok(Some(Angle::Direction(Direction::TopLeft)))
        );
        assert_eq!(resolve_shape(&[]).unwrap().required_angle("orientation"), Ok(None));
    }

    /// Numbered slots declared out of order, two flagged ones in between
    static SHUFFLED: &[PropertySpec] = &[
        PropertySpec {
            name: "fill",
            aliases: &[],
            native: Native::Numbered(2),
            ty: PropertyType::Color,
            default: DefaultValue::Absent,
        },
        PropertySpec {
            name: "stroke",
            aliases: &[],
            native: Native::Flagged,
            ty: PropertyType::Color,
            default: DefaultValue::Absent,
        },
        PropertySpec {
            name: "width",
            aliases: &[],
            native: Native::Numbered(1),
            ty: PropertyType::Size,
            default: DefaultValue::Absent,
        },
        PropertySpec {
            name: "shadow",
            aliases: &[],
            native: Native::Flagged,
            ty: PropertyType::Color,
            default: DefaultValue::Absent,
        },
    ];

    #[test]
    fn test_positional_follows_native_index() {
        assert_eq!(schema::native_order(SHUFFLED), vec![2, 0, 1, 3]);

        let props = resolve(
            SHUFFLED,
            &list(&["40%", "red", "blue", "green"]),
            &DefaultContext::default(),
        )
        .unwrap();
        assert_eq!(props.size("width"), Some(Size::Relative(40.0)));
        assert_eq!(props.color("fill"), Some(&Color::Named("red".into())));
        assert_eq!(props.color("stroke"), Some(&Color::Named("blue".into())));
        assert_eq!(props.color("shadow"), Some(&Color::Named("green".into())));

        // Colors skip the size slot and still fill flagged slots in declaration order
        let props = resolve(SHUFFLED, &list(&["red", "blue"]), &DefaultContext::default()).unwrap();
        assert_eq!(props.size("width"), None);
        assert_eq!(props.color("fill"), Some(&Color::Named("red".into())));
        assert_eq!(props.color("stroke"), Some(&Color::Named("blue".into())));
        assert_eq!(props.color("shadow"), None);
    }
}
