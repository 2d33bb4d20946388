use arrayvec::ArrayVec;

use crate::math::roots::{interior_roots, solve_quadratic};
use crate::math::{cross, BoundingBox, Point2, Vector2};

use super::blossom;
use super::quad::QuadCurve;

/// A cubic Bézier segment.
///
/// Power-basis coefficients `a·t³ + b·t² + c·t + d` are computed at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve {
    points: [Point2; 4],
    coeffs: [Vector2; 4],
}

impl CubicCurve {
    /// Creates a new cubic from start, two control points and end.
    #[must_use]
    pub fn new(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        let (v0, v1, v2, v3) = (p0.coords, p1.coords, p2.coords, p3.coords);
        Self {
            points: [p0, p1, p2, p3],
            coeffs: [
                v3 - v0 + (v1 - v2) * 3.0,
                (v0 - v1 * 2.0 + v2) * 3.0,
                (v1 - v0) * 3.0,
                v0,
            ],
        }
    }

    /// Returns the four control points.
    #[must_use]
    pub fn points(&self) -> &[Point2; 4] {
        &self.points
    }

    #[must_use]
    pub(crate) fn point(&self, t: f64) -> Point2 {
        if t == 0.0 {
            return self.points[0];
        }
        if t == 1.0 {
            return self.points[3];
        }
        let [a, b, c, d] = &self.coeffs;
        Point2::from(((a * t + b) * t + c) * t + d)
    }

    #[must_use]
    pub(crate) fn derivative(&self, t: f64) -> Vector2 {
        let [a, b, c, _] = &self.coeffs;
        (a * (3.0 * t) + b * 2.0) * t + c
    }

    #[must_use]
    pub(crate) fn second_derivative(&self, t: f64) -> Vector2 {
        let [a, b, _, _] = &self.coeffs;
        a * (6.0 * t) + b * 2.0
    }

    #[must_use]
    pub(crate) fn segment(&self, start: f64, end: f64) -> Self {
        let p = &self.points;
        Self::new(
            blossom(p, &[start, start, start]),
            blossom(p, &[start, start, end]),
            blossom(p, &[start, end, end]),
            blossom(p, &[end, end, end]),
        )
    }

    #[must_use]
    pub(crate) fn reverse(&self) -> Self {
        let [p0, p1, p2, p3] = self.points;
        Self::new(p3, p2, p1, p0)
    }

    #[must_use]
    pub(crate) fn tight_bounds(&self) -> BoundingBox {
        let [a, b, c, _] = &self.coeffs;
        let mut bounds = BoundingBox::new(self.points[0], self.points[3]);
        for axis in 0..2 {
            let roots = solve_quadratic(3.0 * a[axis], 2.0 * b[axis], c[axis]);
            for t in interior_roots(roots, 0.0) {
                bounds.add_point(&self.point(t));
            }
        }
        bounds
    }

    /// Inflection points: roots of `B'(t) × B''(t)` inside (0, 1).
    #[must_use]
    pub(crate) fn inflections(&self) -> ArrayVec<f64, 2> {
        let [a, b, c, _] = &self.coeffs;
        let roots = solve_quadratic(-6.0 * cross(a, b), 6.0 * cross(c, a), 2.0 * cross(c, b));
        interior_roots(roots, 1e-7)
    }

    /// Power-basis coefficients of `B'(t)`, highest degree first.
    #[must_use]
    pub(crate) fn derivative_coeffs(&self) -> [Vector2; 3] {
        let [a, b, c, _] = &self.coeffs;
        [a * 3.0, b * 2.0, *c]
    }

    /// Quadratic sharing this cubic's end points whose control point
    /// minimizes the parametric error, and a bound on that error.
    #[must_use]
    pub(crate) fn to_quad(&self) -> (QuadCurve, f64) {
        let [p0, p1, p2, p3] = self.points;
        let control = Point2::from(((p1.coords + p2.coords) * 3.0 - p0.coords - p3.coords) / 4.0);
        let error = (p3.coords - p0.coords + (p1.coords - p2.coords) * 3.0).norm() * 3.0_f64.sqrt()
            / 36.0;
        (QuadCurve::new(p0, control, p3), error)
    }
}
