use arrayvec::ArrayVec;

use crate::math::roots::{interior_roots, solve_quadratic};
use crate::math::{BoundingBox, Point2, Vector2};

use super::blossom;
use super::cubic::CubicCurve;

/// A quadratic Bézier segment.
///
/// Power-basis coefficients `a·t² + b·t + c` are computed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadCurve {
    points: [Point2; 3],
    coeffs: [Vector2; 3],
}

impl QuadCurve {
    /// Creates a new quadratic from start, control and end points.
    #[must_use]
    pub fn new(p0: Point2, p1: Point2, p2: Point2) -> Self {
        let (v0, v1, v2) = (p0.coords, p1.coords, p2.coords);
        Self {
            points: [p0, p1, p2],
            coeffs: [v0 - v1 * 2.0 + v2, (v1 - v0) * 2.0, v0],
        }
    }

    /// Returns the start, control and end points.
    #[must_use]
    pub fn points(&self) -> &[Point2; 3] {
        &self.points
    }

    #[must_use]
    pub(crate) fn point(&self, t: f64) -> Point2 {
        if t == 0.0 {
            return self.points[0];
        }
        if t == 1.0 {
            return self.points[2];
        }
        let [a, b, c] = &self.coeffs;
        Point2::from((a * t + b) * t + c)
    }

    #[must_use]
    pub(crate) fn derivative(&self, t: f64) -> Vector2 {
        let [a, b, _] = &self.coeffs;
        a * (2.0 * t) + b
    }

    #[must_use]
    pub(crate) fn second_derivative(&self) -> Vector2 {
        self.coeffs[0] * 2.0
    }

    #[must_use]
    pub(crate) fn segment(&self, start: f64, end: f64) -> Self {
        let p = &self.points;
        Self::new(
            blossom(p, &[start, start]),
            blossom(p, &[start, end]),
            blossom(p, &[end, end]),
        )
    }

    #[must_use]
    pub(crate) fn reverse(&self) -> Self {
        let [p0, p1, p2] = self.points;
        Self::new(p2, p1, p0)
    }

    /// Exact degree elevation to a cubic.
    #[must_use]
    pub(crate) fn raise(&self) -> CubicCurve {
        let [p0, p1, p2] = self.points;
        CubicCurve::new(
            p0,
            p0 + (p1 - p0) * (2.0 / 3.0),
            p2 + (p1 - p2) * (2.0 / 3.0),
            p2,
        )
    }

    #[must_use]
    pub(crate) fn tight_bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::new(self.points[0], self.points[2]);
        for t in self.extrema() {
            bounds.add_point(&self.point(t));
        }
        bounds
    }

    /// Progress values in (0, 1) where either coordinate has a stationary point.
    fn extrema(&self) -> ArrayVec<f64, 2> {
        let [a, b, _] = &self.coeffs;
        let mut out = ArrayVec::new();
        for axis in 0..2 {
            for t in interior_roots(solve_quadratic(0.0, 2.0 * a[axis], b[axis]), 0.0) {
                out.push(t);
            }
        }
        out
    }

    /// Progress of maximum curvature, where the speed is minimal.
    #[must_use]
    pub(crate) fn vertex(&self) -> Option<f64> {
        let [a, b, _] = &self.coeffs;
        let aa = a.norm_squared();
        if aa < crate::math::TOLERANCE * crate::math::TOLERANCE {
            return None;
        }
        Some(-a.dot(b) / (2.0 * aa))
    }

    /// Power-basis coefficients of `B'(t)` per axis, highest degree first.
    #[must_use]
    pub(crate) fn derivative_coeffs(&self) -> [Vector2; 2] {
        let [a, b, _] = &self.coeffs;
        [a * 2.0, *b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arch() -> QuadCurve {
        QuadCurve::new(
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 10.0),
            Point2::new(10.0, 0.0),
        )
    }

    #[test]
    fn midpoint_of_arch() {
        let q = arch();
        let p = q.point(0.5);
        assert!((p.x - 5.0).abs() < 1e-12, "p={p}");
        assert!((p.y - 5.0).abs() < 1e-12, "p={p}");
    }

    #[test]
    fn tight_bounds_touch_apex() {
        let b = arch().tight_bounds();
        assert!((b.max.y - 5.0).abs() < 1e-12, "b={b:?}");
        assert!(b.min.y.abs() < 1e-12);
        assert!((b.max.x - 10.0).abs() < 1e-12);
    }

    #[test]
    fn vertex_is_apex() {
        let t = arch().vertex().unwrap_or(f64::NAN);
        assert!((t - 0.5).abs() < 1e-12, "t={t}");
    }

    #[test]
    fn raise_keeps_shape() {
        let q = arch();
        let c = q.raise();
        for i in 0..=10 {
            let t = f64::from(i) / 10.0;
            assert!((q.point(t) - c.point(t)).norm() < 1e-12, "t={t}");
        }
    }
}
