//! Path-level vocabulary shared with path builders: operation tags, the
//! operation record handed to sinks, decomposition flags and path-data text.

mod builder;
mod parse;

pub use builder::{PathBuilder, PathSink};
pub use parse::parse_path;
pub(crate) use parse::parse_segment;

use std::fmt;

use bitflags::bitflags;

use crate::math::Point2;

/// Kind of a path operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathOperation {
    /// Starts a new contour.
    Move,
    /// Closes the current contour with a straight line.
    Close,
    /// Straight line.
    Line,
    /// Quadratic Bézier.
    Quad,
    /// Cubic Bézier.
    Cubic,
    /// Rational quadratic Bézier with a weight.
    Conic,
}

impl PathOperation {
    /// Number of points, including the start point, that describe a segment
    /// of this kind. `Move` takes its single target point.
    #[must_use]
    pub fn point_count(self) -> usize {
        match self {
            Self::Move => 1,
            Self::Close | Self::Line => 2,
            Self::Quad | Self::Conic => 3,
            Self::Cubic => 4,
        }
    }

    /// Path-data command letter.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Move => 'M',
            Self::Close => 'Z',
            Self::Line => 'L',
            Self::Quad => 'Q',
            Self::Cubic => 'C',
            Self::Conic => 'O',
        }
    }
}

bitflags! {
    /// Curve kinds a consumer accepts when curves are decomposed.
    ///
    /// Lines are always accepted. The empty set asks for lines only.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ForeachFlags: u32 {
        const ALLOW_QUAD  = 1 << 0;
        const ALLOW_CUBIC = 1 << 1;
        const ALLOW_CONIC = 1 << 2;
    }
}

/// A single path operation: tag, points (start point first) and weight.
///
/// The weight is only meaningful for [`PathOperation::Conic`].
#[derive(Debug, Clone, PartialEq)]
pub struct PathOp {
    pub op: PathOperation,
    pub points: Vec<Point2>,
    pub weight: f64,
}

impl PathOp {
    /// Creates a new operation record.
    #[must_use]
    pub fn new(op: PathOperation, points: Vec<Point2>, weight: f64) -> Self {
        Self { op, points, weight }
    }
}

impl fmt::Display for PathOp {
    /// Writes the operation without its start point, as it appears inside
    /// path data. `Move` writes its target.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op.letter())?;
        let skip = usize::from(self.op != PathOperation::Move);
        if self.op != PathOperation::Close {
            for p in self.points.iter().skip(skip) {
                write!(f, " {} {}", fmt_coord(p.x), fmt_coord(p.y))?;
            }
        }
        if self.op == PathOperation::Conic {
            write!(f, " {}", fmt_coord(self.weight))?;
        }
        Ok(())
    }
}

/// Formats a coordinate compactly: integers without a fraction, other values
/// with the shortest representation that round-trips.
pub(crate) fn fmt_coord(v: f64) -> String {
    if v == 0.0 {
        // Also folds negative zero.
        "0".to_owned()
    } else {
        format!("{v}")
    }
}
