//! The curve kernel: a closed set of path segment kinds behind one value type.

mod closest;
mod conic;
mod cubic;
mod curvature;
mod decompose;
mod intersect;
mod line;
mod offset;
mod print;
mod quad;

pub use closest::ClosestPoint;
pub use conic::ConicCurve;
pub use cubic::CubicCurve;
pub use curvature::Curvature;
pub use decompose::{DecomposedLine, LineReason};
pub use intersect::{intersect, Intersection, IntersectionKind};
pub use line::LineCurve;
pub use quad::QuadCurve;

use arrayvec::ArrayVec;

use crate::error::{CurveError, Result};
use crate::math::{
    lerp, perpendicular, try_normalize, Affine2, BoundingBox, Point2, Vector2, TOLERANCE,
};
use crate::path::{PathOp, PathOperation, PathSink};

/// A single path segment.
///
/// Curves are immutable values: splitting, segmenting, reversing, raising
/// and offsetting all return new curves. Progress `t` runs from 0 at the
/// start point to 1 at the end point, and both ends are reproduced exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Line(LineCurve),
    Quad(QuadCurve),
    Cubic(CubicCurve),
    Conic(ConicCurve),
}

impl Curve {
    /// Creates a line segment.
    #[must_use]
    pub fn line(start: Point2, end: Point2) -> Self {
        Self::Line(LineCurve::new(start, end))
    }

    /// Creates a quadratic Bézier segment.
    #[must_use]
    pub fn quad(start: Point2, control: Point2, end: Point2) -> Self {
        Self::Quad(QuadCurve::new(start, control, end))
    }

    /// Creates a cubic Bézier segment.
    #[must_use]
    pub fn cubic(start: Point2, control1: Point2, control2: Point2, end: Point2) -> Self {
        Self::Cubic(CubicCurve::new(start, control1, control2, end))
    }

    /// Creates a conic segment.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidWeight`] unless `weight` is finite and positive.
    pub fn conic(start: Point2, control: Point2, end: Point2, weight: f64) -> Result<Self> {
        ConicCurve::new(start, control, end, weight).map(Self::Conic)
    }

    /// Creates a curve from an operation tag, its points (start point first)
    /// and a weight. The weight is ignored unless `op` is
    /// [`PathOperation::Conic`].
    ///
    /// # Errors
    ///
    /// Returns an error if `op` is not a segment kind, if the number of points
    /// does not match the operation, if a coordinate is not finite, or if a
    /// conic weight is invalid.
    pub fn from_points(op: PathOperation, points: &[Point2], weight: f64) -> Result<Self> {
        let expected = op.point_count();
        if matches!(op, PathOperation::Move) {
            return Err(CurveError::UnsupportedOperation(op));
        }
        if points.len() != expected {
            return Err(CurveError::PointCount {
                op,
                expected,
                found: points.len(),
            });
        }
        if points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(CurveError::NonFinite);
        }
        Ok(match op {
            PathOperation::Line | PathOperation::Close => Self::line(points[0], points[1]),
            PathOperation::Quad => Self::quad(points[0], points[1], points[2]),
            PathOperation::Cubic => Self::cubic(points[0], points[1], points[2], points[3]),
            PathOperation::Conic => Self::conic(points[0], points[1], points[2], weight)?,
            PathOperation::Move => return Err(CurveError::UnsupportedOperation(op)),
        })
    }

    /// Creates a curve from a recorded path operation.
    ///
    /// # Errors
    ///
    /// See [`Curve::from_points`].
    pub fn from_path_op(op: &PathOp) -> Result<Self> {
        Self::from_points(op.op, &op.points, op.weight)
    }

    /// Operation tag of this curve.
    #[must_use]
    pub fn op(&self) -> PathOperation {
        match self {
            Self::Line(_) => PathOperation::Line,
            Self::Quad(_) => PathOperation::Quad,
            Self::Cubic(_) => PathOperation::Cubic,
            Self::Conic(_) => PathOperation::Conic,
        }
    }

    /// Control points, start point first.
    #[must_use]
    pub fn control_points(&self) -> ArrayVec<Point2, 4> {
        match self {
            Self::Line(c) => c.points().iter().copied().collect(),
            Self::Quad(c) => c.points().iter().copied().collect(),
            Self::Cubic(c) => c.points().iter().copied().collect(),
            Self::Conic(c) => c.points().iter().copied().collect(),
        }
    }

    /// Conic weight, `None` for polynomial curves.
    #[must_use]
    pub fn weight(&self) -> Option<f64> {
        match self {
            Self::Conic(c) => Some(c.weight()),
            _ => None,
        }
    }

    /// Position at progress `t`.
    #[must_use]
    pub fn point(&self, t: f64) -> Point2 {
        match self {
            Self::Line(c) => c.point(t),
            Self::Quad(c) => c.point(t),
            Self::Cubic(c) => c.point(t),
            Self::Conic(c) => c.point(t),
        }
    }

    /// First derivative with respect to progress.
    #[must_use]
    pub fn derivative(&self, t: f64) -> Vector2 {
        match self {
            Self::Line(c) => c.derivative(),
            Self::Quad(c) => c.derivative(t),
            Self::Cubic(c) => c.derivative(t),
            Self::Conic(c) => c.derivative(t),
        }
    }

    /// Second derivative with respect to progress.
    #[must_use]
    pub fn second_derivative(&self, t: f64) -> Vector2 {
        match self {
            Self::Line(_) => Vector2::zeros(),
            Self::Quad(c) => c.second_derivative(),
            Self::Cubic(c) => c.second_derivative(t),
            Self::Conic(c) => c.second_derivative(t),
        }
    }

    /// Unit tangent at progress `t`.
    ///
    /// Where the derivative vanishes (cusps, coincident control points) the
    /// direction of the second derivative is used, then the chord, then the
    /// start tangent. The result is always a unit vector.
    #[must_use]
    pub fn tangent(&self, t: f64) -> Vector2 {
        if let Some(dir) = try_normalize(&self.derivative(t)) {
            return dir;
        }
        // Near a vanishing derivative B'(t+h) ≈ h·B''(t); at the end h < 0.
        let sign = if t >= 1.0 { -1.0 } else { 1.0 };
        try_normalize(&(self.second_derivative(t) * sign))
            .or_else(|| try_normalize(&(self.end_point() - self.start_point())))
            .unwrap_or_else(|| self.start_tangent())
    }

    /// Unit normal at progress `t`: the tangent rotated by +90°.
    #[must_use]
    pub fn normal(&self, t: f64) -> Vector2 {
        perpendicular(&self.tangent(t))
    }

    /// Start point.
    #[must_use]
    pub fn start_point(&self) -> Point2 {
        match self {
            Self::Line(c) => c.points()[0],
            Self::Quad(c) => c.points()[0],
            Self::Cubic(c) => c.points()[0],
            Self::Conic(c) => c.points()[0],
        }
    }

    /// End point.
    #[must_use]
    pub fn end_point(&self) -> Point2 {
        match self {
            Self::Line(c) => c.points()[1],
            Self::Quad(c) => c.points()[2],
            Self::Cubic(c) => c.points()[3],
            Self::Conic(c) => c.points()[2],
        }
    }

    /// Unit tangent at the start, towards the first control point that does
    /// not coincide with the start point. Falls back to `+x`.
    #[must_use]
    pub fn start_tangent(&self) -> Vector2 {
        let points = self.control_points();
        let start = points[0];
        points[1..]
            .iter()
            .find_map(|p| try_normalize(&(p - start)))
            .unwrap_or_else(Vector2::x)
    }

    /// Unit tangent at the end, from the last control point that does not
    /// coincide with the end point. Falls back to `+x`.
    #[must_use]
    pub fn end_tangent(&self) -> Vector2 {
        let points = self.control_points();
        let (end, rest) = match points.split_last() {
            Some((end, rest)) => (*end, rest),
            None => return Vector2::x(),
        };
        rest.iter()
            .rev()
            .find_map(|p| try_normalize(&(end - p)))
            .unwrap_or_else(Vector2::x)
    }

    /// Splits the curve at progress `t` into the parts before and after it.
    #[must_use]
    pub fn split(&self, t: f64) -> (Self, Self) {
        (self.segment(0.0, t), self.segment(t, 1.0))
    }

    /// The part of the curve between progress `start` and `end`,
    /// reparametrized to `[0, 1]` and of the same kind.
    ///
    /// Arguments are clamped to `[0, 1]`; reversed arguments are swapped.
    /// `start == end` yields a curve collapsed onto a single point.
    #[must_use]
    pub fn segment(&self, start: f64, end: f64) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let start = start.clamp(0.0, 1.0);
        let end = end.clamp(0.0, 1.0);
        match self {
            Self::Line(c) => Self::Line(c.segment(start, end)),
            Self::Quad(c) => Self::Quad(c.segment(start, end)),
            Self::Cubic(c) => Self::Cubic(c.segment(start, end)),
            Self::Conic(c) => Self::Conic(c.segment(start, end)),
        }
    }

    /// The same curve traversed from end to start.
    #[must_use]
    pub fn reverse(&self) -> Self {
        match self {
            Self::Line(c) => Self::Line(c.reverse()),
            Self::Quad(c) => Self::Quad(c.reverse()),
            Self::Cubic(c) => Self::Cubic(c.reverse()),
            Self::Conic(c) => Self::Conic(c.reverse()),
        }
    }

    /// Elevates the degree by one without changing the shape or the
    /// parametrization: lines become quadratics and quadratics become cubics.
    /// Cubics and conics are returned unchanged.
    #[must_use]
    pub fn raise(&self) -> Self {
        match self {
            Self::Line(c) => Self::Quad(c.raise()),
            Self::Quad(c) => Self::Cubic(c.raise()),
            Self::Cubic(_) | Self::Conic(_) => *self,
        }
    }

    /// Bounding box of the control points. Always contains the curve.
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        let points = self.control_points();
        let mut bounds = BoundingBox::from_point(points[0]);
        for p in &points[1..] {
            bounds.add_point(p);
        }
        bounds
    }

    /// Smallest axis-aligned box containing the curve.
    #[must_use]
    pub fn tight_bounds(&self) -> BoundingBox {
        match self {
            Self::Line(c) => c.bounds(),
            Self::Quad(c) => c.tight_bounds(),
            Self::Cubic(c) => c.tight_bounds(),
            Self::Conic(c) => c.tight_bounds(),
        }
    }

    /// Maps the control points through `transform`. Conic weights are kept,
    /// which is exact for affine maps.
    #[must_use]
    pub fn transform(&self, transform: &Affine2) -> Self {
        let mut points = self.control_points();
        for p in &mut points {
            *p = transform * *p;
        }
        self.with_points(&points)
    }

    /// Same kind (and weight) with new control points.
    pub(crate) fn with_points(&self, p: &[Point2]) -> Self {
        match self {
            Self::Line(_) => Self::line(p[0], p[1]),
            Self::Quad(_) => Self::quad(p[0], p[1], p[2]),
            Self::Cubic(_) => Self::cubic(p[0], p[1], p[2], p[3]),
            Self::Conic(c) => Self::Conic(ConicCurve::with_weight(p[0], p[1], p[2], c.weight())),
        }
    }

    /// The curve as a path operation, start point included.
    #[must_use]
    pub fn path_op(&self) -> PathOp {
        PathOp::new(
            self.op(),
            self.control_points().to_vec(),
            self.weight().unwrap_or(1.0),
        )
    }

    /// Appends the curve to `sink`.
    pub fn to_builder<S: PathSink + ?Sized>(&self, sink: &mut S) {
        let points = self.control_points();
        sink.append_op(self.op(), &points, self.weight().unwrap_or(1.0));
    }

    /// Returns whether all control points coincide within [`TOLERANCE`].
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let points = self.control_points();
        points[1..].iter().all(|p| (p - points[0]).norm() < TOLERANCE)
    }
}

/// Evaluates the blossom of a Bézier control polygon.
///
/// `params` holds one value per degree. Equal parameters give points on
/// the curve; mixed ones give the control points of sub-curves.
pub(crate) fn blossom(points: &[Point2], params: &[f64]) -> Point2 {
    let mut buf: ArrayVec<Point2, 4> = points.iter().copied().collect();
    for (level, u) in params.iter().enumerate() {
        for i in 0..buf.len() - 1 - level {
            buf[i] = lerp(&buf[i], &buf[i + 1], *u);
        }
    }
    buf[0]
}
