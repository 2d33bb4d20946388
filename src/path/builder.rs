use std::fmt;

use crate::math::Point2;

use super::{PathOp, PathOperation};

/// Receiver of path operations, implemented by path builders.
///
/// `points` always starts with the segment's start point.
pub trait PathSink {
    /// Appends one operation.
    fn append_op(&mut self, op: PathOperation, points: &[Point2], weight: f64);
}

/// A recording path builder.
///
/// Segments whose start point differs from the current point get an
/// implicit move in front of them.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    ops: Vec<PathOp>,
    current: Option<Point2>,
    contour_start: Option<Point2>,
}

impl PathBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new contour at `p`.
    pub fn move_to(&mut self, p: Point2) {
        self.ops.push(PathOp::new(PathOperation::Move, vec![p], 1.0));
        self.current = Some(p);
        self.contour_start = Some(p);
    }

    /// Adds a line to `p`.
    pub fn line_to(&mut self, p: Point2) {
        self.push_segment(PathOperation::Line, &[p], 1.0);
    }

    /// Adds a quadratic Bézier through control point `c` to `p`.
    pub fn quad_to(&mut self, c: Point2, p: Point2) {
        self.push_segment(PathOperation::Quad, &[c, p], 1.0);
    }

    /// Adds a cubic Bézier to `p`.
    pub fn cubic_to(&mut self, c1: Point2, c2: Point2, p: Point2) {
        self.push_segment(PathOperation::Cubic, &[c1, c2, p], 1.0);
    }

    /// Adds a conic with control point `c` and `weight` to `p`.
    pub fn conic_to(&mut self, c: Point2, p: Point2, weight: f64) {
        self.push_segment(PathOperation::Conic, &[c, p], weight);
    }

    /// Closes the current contour.
    pub fn close(&mut self) {
        if let (Some(current), Some(start)) = (self.current, self.contour_start) {
            self.ops
                .push(PathOp::new(PathOperation::Close, vec![current, start], 1.0));
            self.current = Some(start);
        }
    }

    /// Recorded operations.
    #[must_use]
    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    /// Consumes the builder, returning the recorded operations.
    #[must_use]
    pub fn into_ops(self) -> Vec<PathOp> {
        self.ops
    }

    fn push_segment(&mut self, op: PathOperation, rest: &[Point2], weight: f64) {
        let start = match self.current {
            Some(p) => p,
            None => {
                let origin = Point2::origin();
                self.move_to(origin);
                origin
            }
        };
        let mut points = Vec::with_capacity(rest.len() + 1);
        points.push(start);
        points.extend_from_slice(rest);
        self.current = rest.last().copied();
        self.ops.push(PathOp::new(op, points, weight));
    }
}

impl PathSink for PathBuilder {
    fn append_op(&mut self, op: PathOperation, points: &[Point2], weight: f64) {
        match op {
            PathOperation::Move => {
                if let Some(p) = points.first() {
                    self.move_to(*p);
                }
            }
            PathOperation::Close => self.close(),
            _ => {
                let Some((start, rest)) = points.split_first() else {
                    return;
                };
                if self.current != Some(*start) {
                    self.move_to(*start);
                }
                self.push_segment(op, rest, weight);
            }
        }
    }
}

impl fmt::Display for PathBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}
