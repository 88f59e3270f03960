//! Core types for the layout engine

use crate::values::Size;

/// A point in normalized cell coordinates: (0, 0) is the top-left corner,
/// (1, 1) the bottom-right one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Cell center
    pub fn center() -> Self {
        Self::new(0.5, 0.5)
    }

    /// Mirror through the cell center
    pub fn mirrored(self) -> Self {
        Self::new(1.0 - self.x, 1.0 - self.y)
    }

    /// Linear interpolation towards `other`
    pub fn lerp(self, other: Point, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Width and height as fractions of the cell size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The whole cell
    pub fn full() -> Self {
        Self::new(1.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Where one shape instance goes inside its cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementSlot {
    /// Paint order; higher layers are drawn on top
    pub layer: usize,
    /// Center of the shape
    pub anchor: Point,
    /// Space the shape may use; relative sizes resolve against it
    pub available: Extent,
}

impl PlacementSlot {
    pub fn new(layer: usize, anchor: Point, available: Extent) -> Self {
        Self {
            layer,
            anchor,
            available,
        }
    }

    /// Turn a size into absolute units along `axis`, for cells of
    /// `cell_size` units per edge
    pub fn resolve(&self, size: Size, axis: Axis, cell_size: f64) -> f64 {
        let available = match axis {
            Axis::Horizontal => self.available.width,
            Axis::Vertical => self.available.height,
        };
        size.resolve(available * cell_size)
    }

    /// Anchor in absolute units
    pub fn absolute_anchor(&self, cell_size: f64) -> Point {
        Point::new(self.anchor.x * cell_size, self.anchor.y * cell_size)
    }
}
