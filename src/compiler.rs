//! The compile pipeline: raw cells to a resolved [`Document`]

use log::{debug, info, trace};

use crate::config::{CompileConfig, ErrorMode};
use crate::error::{CellError, CompileError, DocumentError};
use crate::layout;
use crate::parser::parse_cell;
use crate::properties::{self, schema, DefaultContext};
use crate::scene::{CellConfig, Document, PlacedShape, ResolvedCell};
use crate::shapes::resolve_shape;
use crate::source::{split_document, RawCell};

/// Compile a single cell
pub fn compile_cell(cell: &RawCell, config: &CompileConfig) -> Result<ResolvedCell, CompileError> {
    let ast = parse_cell(&cell.text, cell.offset)?;
    trace!(ast:?; "Parsed cell");

    let cell_config = resolve_cell_config(&ast.config, config)?;

    let ctx = DefaultContext {
        orientation: cell_config.orientation,
        base_width: cell_config.width,
        base_height: cell_config.height.or(cell_config.width),
        ..config.default_context()
    };

    let attributes = ast
        .groups
        .iter()
        .map(|group| resolve_shape(group.kind.node, &group.properties, &ctx))
        .collect::<Result<Vec<_>, _>>()?;

    // A line without a start follows the cell's orientation, then the first
    // group's own
    let hint = cell_config
        .orientation
        .or_else(|| attributes.first().and_then(|a| a.orientation));
    let slots = layout::place(&cell_config.layout, hint, ast.instance_count());

    let shapes = ast
        .groups
        .iter()
        .zip(attributes)
        .enumerate()
        .flat_map(|(index, (group, attrs))| {
            (0..group.count as usize).map(move |instance| (index, instance, attrs.clone()))
        })
        .zip(slots)
        .map(|((group, instance, attributes), slot)| PlacedShape {
            group,
            instance,
            attributes,
            slot,
        })
        .collect();

    Ok(ResolvedCell {
        config: cell_config,
        shapes,
    })
}

fn resolve_cell_config(
    list: &crate::parser::PropertyList,
    config: &CompileConfig,
) -> Result<CellConfig, CompileError> {
    let props = properties::resolve(schema::CELL, list, &config.default_context())?;

    Ok(CellConfig {
        layout: props.layout("layout").unwrap_or_default(),
        background: props.color("background").cloned(),
        orientation: props.required_angle("orientation")?,
        width: props.size("width"),
        height: props.size("height"),
    })
}

/// Compile a whole document
///
/// Ragged rows are padded with empty cells. Depending on
/// [`CompileConfig::error_mode`] the first failing cell aborts, or every
/// failure is collected; either way no partial document is returned.
pub fn compile_document(
    rows: &[Vec<RawCell>],
    config: &CompileConfig,
) -> Result<Document, DocumentError> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut resolved = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();

    for (row_index, row) in rows.iter().enumerate() {
        let mut cells = Vec::with_capacity(columns);
        for (column_index, cell) in row.iter().enumerate() {
            match compile_cell(cell, config) {
                Ok(compiled) => {
                    trace!(row = row_index, column = column_index, shapes = compiled.shapes.len(); "Compiled cell");
                    cells.push(compiled);
                }
                Err(err) => {
                    debug!(row = row_index, column = column_index, error:% = err; "Cell failed");
                    errors.push(CellError::new(row_index, column_index, cell, err));
                    if config.error_mode == ErrorMode::FirstError {
                        return Err(DocumentError::new(errors));
                    }
                }
            }
        }
        cells.resize_with(columns, ResolvedCell::default);
        resolved.push(cells);
    }

    if !errors.is_empty() {
        return Err(DocumentError::new(errors));
    }

    let document = Document {
        rows: resolved,
        columns,
        grid: config.grid.clone(),
    };
    info!(rows = document.rows.len(), columns, shapes = document.shape_count(); "Compiled document");
    Ok(document)
}

/// Split and compile document text
pub fn compile_source(source: &str, config: &CompileConfig) -> Result<Document, DocumentError> {
    compile_document(&split_document(source), config)
}

/// Compile several documents; one failing document does not affect the others
pub fn compile_batch(
    documents: &[Vec<Vec<RawCell>>],
    config: &CompileConfig,
) -> Vec<Result<Document, DocumentError>> {
    documents
        .iter()
        .enumerate()
        .map(|(index, rows)| {
            let result = compile_document(rows, config);
            if let Err(err) = &result {
                debug!(index, errors = err.errors.len(); "Document failed");
            }
            result
        })
        .collect()
}
