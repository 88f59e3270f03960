//! The resolved scene handed to renderers

use crate::layout::{Axis, Layout, PlacementSlot, Point};
use crate::shapes::{ResolvedShapeAttributes, ShapeKind};
use crate::values::{Angle, Color, Size};

/// Resolved cell configuration block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellConfig {
    pub layout: Layout,
    pub background: Option<Color>,
    /// Orientation inherited by the cell's shapes
    pub orientation: Option<Angle>,
    /// Base size for shapes that give neither width nor height
    pub width: Option<Size>,
    pub height: Option<Size>,
}

/// One shape instance with its attributes and placement
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedShape {
    /// Index of the shape group within the cell
    pub group: usize,
    /// Index of the instance within its group
    pub instance: usize,
    pub attributes: ResolvedShapeAttributes,
    pub slot: PlacementSlot,
}

impl PlacedShape {
    pub fn kind(&self) -> ShapeKind {
        self.attributes.kind()
    }

    pub fn layer(&self) -> usize {
        self.slot.layer
    }

    /// Absolute `(width, height)` for cells of `cell_size` units
    pub fn absolute_size(&self, cell_size: f64) -> (f64, f64) {
        (
            self.slot
                .resolve(self.attributes.width, Axis::Horizontal, cell_size),
            self.slot
                .resolve(self.attributes.height, Axis::Vertical, cell_size),
        )
    }

    /// Absolute center for cells of `cell_size` units
    pub fn absolute_anchor(&self, cell_size: f64) -> Point {
        self.slot.absolute_anchor(cell_size)
    }
}

/// A compiled cell; shapes are in layer order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedCell {
    pub config: CellConfig,
    pub shapes: Vec<PlacedShape>,
}

impl ResolvedCell {
    pub fn background(&self) -> Option<&Color> {
        self.config.background.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Grid-wide drawing settings carried with the scene
#[derive(Debug, Clone, PartialEq)]
pub struct GridSettings {
    pub background: Color,
    /// Color of the grid lines
    pub line_color: Color,
    /// Grid line width in pixels; 0 hides the grid
    pub line_width: u32,
    /// Pixels per cell edge
    pub cell_size: f64,
    /// Whether grid lines are drawn over the shapes rather than under them
    pub over_shapes: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            background: Color::rgb(0xff, 0xff, 0xff),
            line_color: Color::rgb(0, 0, 0),
            line_width: 1,
            cell_size: 16.0,
            over_shapes: true,
        }
    }
}

/// A compiled document; every row has `columns` cells
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub rows: Vec<Vec<ResolvedCell>>,
    pub columns: usize,
    pub grid: GridSettings,
}

impl Document {
    pub fn cell(&self, row: usize, column: usize) -> Option<&ResolvedCell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// `(rows, columns)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.columns)
    }

    /// Pixel `(width, height)` of the whole grid, outer lines included
    pub fn canvas_size(&self) -> (f64, f64) {
        let edge = |cells: usize| cells as f64 * self.grid.cell_size + self.grid.line_width as f64;
        (edge(self.columns), edge(self.rows.len()))
    }

    pub fn shape_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .map(|cell| cell.shapes.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Extent;
    use crate::shapes::ShapeGeometry;

    fn placed(width: Size, height: Size, available: Extent) -> PlacedShape {
        PlacedShape {
            group: 0,
            instance: 0,
            attributes: ResolvedShapeAttributes {
                fill: Color::rgb(0, 0, 0),
                border: None,
                width,
                height,
                orientation: None,
                geometry: ShapeGeometry::Triangle,
            },
            slot: PlacementSlot::new(0, Point::new(0.5, 0.0), available),
        }
    }

    #[test]
    fn test_absolute_size() {
        let shape = placed(
            Size::Relative(50.0),
            Size::Fixed(3.0),
            Extent::new(0.5, 1.0),
        );
        assert_eq!(shape.absolute_size(16.0), (4.0, 3.0));
        assert_eq!(shape.absolute_anchor(16.0), Point::new(8.0, 0.0));
        assert_eq!(shape.kind(), ShapeKind::Triangle);
    }

    #[test]
    fn test_document_lookup() {
        let doc = Document {
            rows: vec![vec![ResolvedCell::default(), ResolvedCell::default()]],
            columns: 2,
            ..Document::default()
        };
        assert_eq!(doc.dimensions(), (1, 2));
        assert!(doc.cell(0, 1).is_some());
        assert!(doc.cell(1, 0).is_none());
        assert_eq!(doc.shape_count(), 0);
        assert_eq!(doc.cell(0, 0).and_then(|c| c.background()), None);
    }

    #[test]
    fn test_canvas_size_includes_outer_line() {
        let doc = Document {
            rows: vec![vec![ResolvedCell::default(); 3]; 2],
            columns: 3,
            grid: GridSettings {
                cell_size: 10.0,
                line_width: 2,
                ..GridSettings::default()
            },
        };
        assert_eq!(doc.canvas_size(), (32.0, 22.0));
        assert_eq!(Document::default().canvas_size(), (1.0, 1.0));
    }
}
