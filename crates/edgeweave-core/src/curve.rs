//! Bundle spline sampling into SVG path data.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::Point;

/// A single drawing command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Cubic Bézier with two control points and an end point.
    CurveTo(Point, Point, Point),
    ClosePath,
}

/// An ordered list of drawing commands.
///
/// Displays (and serializes) as an SVG path string such as
/// `M0,0L10,0C20,0,30,5,40,5`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    /// First point drawn.
    pub fn start(&self) -> Option<Point> {
        match self.commands.first()? {
            PathCommand::MoveTo(p) => Some(*p),
            _ => None,
        }
    }

    /// Last point drawn.
    pub fn end(&self) -> Option<Point> {
        self.commands.iter().rev().find_map(|c| match c {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(*p),
            PathCommand::CurveTo(_, _, p) => Some(*p),
            PathCommand::ClosePath => None,
        })
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in &self.commands {
            match command {
                PathCommand::MoveTo(p) => write!(f, "M{},{}", p.x, p.y)?,
                PathCommand::LineTo(p) => write!(f, "L{},{}", p.x, p.y)?,
                PathCommand::CurveTo(c1, c2, p) => write!(
                    f,
                    "C{},{},{},{},{},{}",
                    c1.x, c1.y, c2.x, c2.y, p.x, p.y
                )?,
                PathCommand::ClosePath => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

impl Serialize for PathData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Sample `points` through a bundle spline with tension `beta`.
///
/// Every point is first pulled towards the straight chord between the first
/// and last point by `1 - beta`, then the result is drawn as a uniform cubic
/// B-spline. `beta == 1` gives the plain B-spline, `beta == 0` the chord.
pub fn bundle_curve(points: &[Point], beta: f64) -> PathData {
    let mut path = PathData::new();
    let Some(&first) = points.first() else {
        return path;
    };

    let j = points.len() - 1;
    if j == 0 {
        path.push(PathCommand::MoveTo(first));
        return path;
    }

    let last = points[j];
    let dx = last.x - first.x;
    let dy = last.y - first.y;

    let mut basis = Basis::new(&mut path);
    for (i, p) in points.iter().enumerate() {
        let t = i as f64 / j as f64;
        basis.point(Point::new(
            beta * p.x + (1.0 - beta) * (first.x + t * dx),
            beta * p.y + (1.0 - beta) * (first.y + t * dy),
        ));
    }
    basis.end();

    path
}

/// Uniform cubic B-spline writer.
struct Basis<'a> {
    out: &'a mut PathData,
    seen: u8,
    p0: Point,
    p1: Point,
}

impl<'a> Basis<'a> {
    fn new(out: &'a mut PathData) -> Self {
        Self {
            out,
            seen: 0,
            p0: Point::new(f64::NAN, f64::NAN),
            p1: Point::new(f64::NAN, f64::NAN),
        }
    }

    fn point(&mut self, p: Point) {
        match self.seen {
            0 => {
                self.seen = 1;
                self.out.push(PathCommand::MoveTo(p));
            }
            1 => self.seen = 2,
            2 => {
                self.seen = 3;
                self.out.push(PathCommand::LineTo(Point::new(
                    (5.0 * self.p0.x + self.p1.x) / 6.0,
                    (5.0 * self.p0.y + self.p1.y) / 6.0,
                )));
                self.segment(p);
            }
            _ => self.segment(p),
        }
        self.p0 = self.p1;
        self.p1 = p;
    }

    fn end(&mut self) {
        match self.seen {
            3 => {
                self.segment(self.p1);
                self.out.push(PathCommand::LineTo(self.p1));
            }
            2 => self.out.push(PathCommand::LineTo(self.p1)),
            _ => {}
        }
    }

    fn segment(&mut self, p: Point) {
        let (p0, p1) = (self.p0, self.p1);
        self.out.push(PathCommand::CurveTo(
            Point::new((2.0 * p0.x + p1.x) / 3.0, (2.0 * p0.y + p1.y) / 3.0),
            Point::new((p0.x + 2.0 * p1.x) / 3.0, (p0.y + 2.0 * p1.y) / 3.0),
            Point::new(
                (p0.x + 4.0 * p1.x + p.x) / 6.0,
                (p0.y + 4.0 * p1.y + p.y) / 6.0,
            ),
        ));
    }
}
