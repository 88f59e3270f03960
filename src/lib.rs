//! Grid Generator - compiles a compact grid-cell notation into a resolved scene
//!
//! Each line of the input is a row, each `|`-separated cell holds layered
//! shapes with optional styling. The compiler parses cells, resolves their
//! properties, places every shape instance and hands back a renderer-agnostic
//! [`Document`].
//!
//! # Example
//!
//! ```rust
//! use grid_generator::{compile, ShapeKind};
//!
//! let doc = compile("{horizontal}3Arrow{top}|Sq{40%;blue}").unwrap();
//! assert_eq!(doc.dimensions(), (1, 2));
//! assert_eq!(doc.cell(0, 0).unwrap().shapes.len(), 3);
//! assert_eq!(doc.cell(0, 1).unwrap().shapes[0].kind(), ShapeKind::Square);
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod layout;
pub mod parser;
pub mod properties;
pub mod scene;
pub mod shapes;
pub mod source;
pub mod values;

pub use compiler::{compile_batch, compile_cell, compile_document, compile_source};
pub use config::{CompileConfig, ConfigError, ErrorMode, ShapeDefaults};
pub use error::{CellError, CompileError, CompileErrorKind, DocumentError};
pub use layout::{Layout, PlacementSlot, Point};
pub use scene::{CellConfig, Document, GridSettings, PlacedShape, ResolvedCell};
pub use shapes::{ArrowHead, Border, ResolvedShapeAttributes, ShapeGeometry, ShapeKind};
pub use source::{split_document, split_line, RawCell};
pub use values::{Angle, Color, Direction, Size, ValueParseError};

/// Compile document text with the default configuration
///
/// This is the main entry point for the library.
pub fn compile(source: &str) -> Result<Document, DocumentError> {
    compile_source(source, &CompileConfig::default())
}
