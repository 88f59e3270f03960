//! Abstract syntax tree for a single cell

use crate::shapes::ShapeKind;

/// Byte range in the original line
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// One entry of a property block, before resolution
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyEntry {
    /// `45%`: assigned to the next native slot of the schema
    Positional(Spanned<String>),
    /// `fill=blue`
    Named {
        name: Spanned<String>,
        value: Spanned<String>,
    },
}

impl PropertyEntry {
    pub fn value(&self) -> &Spanned<String> {
        match self {
            PropertyEntry::Positional(value) => value,
            PropertyEntry::Named { value, .. } => value,
        }
    }
}

/// Ordered raw property entries of a `{...}` block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyList {
    pub entries: Vec<Spanned<PropertyEntry>>,
}

impl PropertyList {
    pub fn new(entries: Vec<Spanned<PropertyEntry>>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Positional entries, in textual order
    pub fn positional(&self) -> impl Iterator<Item = &Spanned<String>> {
        self.entries.iter().filter_map(|e| match &e.node {
            PropertyEntry::Positional(value) => Some(value),
            PropertyEntry::Named { .. } => None,
        })
    }

    /// Named entries as `(name, value)`, in textual order
    pub fn named(&self) -> impl Iterator<Item = (&Spanned<String>, &Spanned<String>)> {
        self.entries.iter().filter_map(|e| match &e.node {
            PropertyEntry::Named { name, value } => Some((name, value)),
            PropertyEntry::Positional(_) => None,
        })
    }
}

/// `[count] shape ['{' properties '}']`
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGroup {
    /// Number of instances, at least 1
    pub count: u32,
    pub kind: Spanned<ShapeKind>,
    pub properties: PropertyList,
    pub span: Span,
}

/// Parsed cell: optional configuration block plus layered shape groups
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellAst {
    pub config: PropertyList,
    pub groups: Vec<ShapeGroup>,
}

impl CellAst {
    pub fn is_empty(&self) -> bool {
        self.config.is_empty() && self.groups.is_empty()
    }

    /// Total number of shape instances once groups are expanded
    pub fn instance_count(&self) -> usize {
        self.groups.iter().map(|g| g.count as usize).sum()
    }
}
