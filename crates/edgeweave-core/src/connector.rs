//! Straight connectors between chart boxes.
//!
//! Parent and child charts are joined by a thin rotated box running from the
//! middle of the parent's right edge to the middle of the child's left edge.

use serde::{Deserialize, Serialize};

use crate::Point;

/// Connector thickness in canvas units.
const THICKNESS: f64 = 1.0;

/// An axis-aligned box on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Length of the diagonal, the scale reference for segmentation.
    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }

    fn right_middle(&self) -> Point {
        Point::new(self.left + self.width, self.top + self.height / 2.0)
    }

    fn left_middle(&self) -> Point {
        Point::new(self.left, self.top + self.height / 2.0)
    }
}

/// Placement of a connector box.
///
/// The box is `length` wide, positioned at (`cx`, `cy`) and rotated by
/// `angle` degrees around its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub cx: f64,
    pub cy: f64,
    pub length: f64,
    pub angle: f64,
}

impl Connector {
    /// Connect `from`'s right edge to `to`'s left edge.
    pub fn between(from: &Rect, to: &Rect) -> Self {
        let p1 = from.right_middle();
        let p2 = to.left_middle();

        let length = p1.distance(&p2);
        let angle = (p1.y - p2.y).atan2(p1.x - p2.x).to_degrees();

        Self {
            cx: (p1.x + p2.x) / 2.0 - length / 2.0,
            cy: (p1.y + p2.y) / 2.0 - THICKNESS / 2.0,
            length,
            angle,
        }
    }
}
