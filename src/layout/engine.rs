//! Placement computation
//!
//! Stacks share the whole cell. Lines spread instances evenly between two
//! endpoints and split the cell along every axis the line travels.

use log::trace;

use crate::values::{Angle, Direction};

use super::types::*;
use super::Layout;

/// Endpoints closer than this on an axis do not travel along it
const EPSILON: f64 = 1e-9;

/// Compute one slot per instance, in instance order
///
/// `hint` is the orientation used when a line has no explicit start.
pub fn place(layout: &Layout, hint: Option<Angle>, count: usize) -> Vec<PlacementSlot> {
    match layout {
        Layout::Stack => (0..count)
            .map(|layer| PlacementSlot::new(layer, Point::center(), Extent::full()))
            .collect(),
        Layout::Line { start, end } => {
            let start = start
                .map(|d| Point::from(d.position()))
                .or_else(|| hint.and_then(hint_point))
                .unwrap_or_else(|| Point::from(Direction::Left.position()));
            let end = end
                .map(|d| Point::from(d.position()))
                .unwrap_or_else(|| start.mirrored());
            trace!(start:?, end:?, count; "Placing line");
            place_line(start, end, count)
        }
    }
}

/// Where a line starts when it follows an orientation
fn hint_point(angle: Angle) -> Option<Point> {
    match angle {
        Angle::Direction(Direction::Center) => None,
        Angle::Direction(direction) => Some(Point::from(direction.position())),
        Angle::Degrees(degrees) => {
            let theta = degrees.to_radians();
            Some(Point::new(0.5 + 0.5 * theta.cos(), 0.5 + 0.5 * theta.sin()))
        }
    }
}

fn place_line(start: Point, end: Point, count: usize) -> Vec<PlacementSlot> {
    if count == 0 {
        return Vec::new();
    }

    let share = 1.0 / count as f64;
    let available = Extent::new(
        if (end.x - start.x).abs() > EPSILON { share } else { 1.0 },
        if (end.y - start.y).abs() > EPSILON { share } else { 1.0 },
    );

    (0..count)
        .map(|i| {
            let t = if count > 1 {
                i as f64 / (count - 1) as f64
            } else {
                0.0
            };
            PlacementSlot::new(i, start.lerp(end, t), available)
        })
        .collect()
}
