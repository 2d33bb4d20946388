use crate::error::{CurveError, Result};
use crate::math::roots::{interior_roots, solve_quadratic};
use crate::math::{cross, BoundingBox, Point2, Vector2, Vector3};

use super::quad::QuadCurve;

/// A rational quadratic Bézier segment.
///
/// `P(t) = ((1-t)²·p0 + 2w·t(1-t)·p1 + t²·p2) / ((1-t)² + 2w·t(1-t) + t²)`.
/// The weight `w` pulls the curve towards the control point: `w < 1` gives
/// elliptic arcs, `w = 1` a parabola, `w > 1` hyperbolic arcs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicCurve {
    points: [Point2; 3],
    weight: f64,
    num: [Vector2; 3],
    denom: [f64; 3],
}

impl ConicCurve {
    /// Creates a new conic.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidWeight`] unless `weight` is finite and positive.
    pub fn new(p0: Point2, p1: Point2, p2: Point2, weight: f64) -> Result<Self> {
        if !(weight.is_finite() && weight > 0.0) {
            return Err(CurveError::InvalidWeight(weight));
        }
        Ok(Self::with_weight(p0, p1, p2, weight))
    }

    /// Builds a conic from a weight already known to be finite and positive.
    pub(crate) fn with_weight(p0: Point2, p1: Point2, p2: Point2, weight: f64) -> Self {
        let (v0, v1, v2) = (p0.coords, p1.coords, p2.coords);
        let wv1 = v1 * weight;
        Self {
            points: [p0, p1, p2],
            weight,
            num: [v0 - wv1 * 2.0 + v2, (wv1 - v0) * 2.0, v0],
            denom: [2.0 - 2.0 * weight, 2.0 * weight - 2.0, 1.0],
        }
    }

    /// Returns the start, control and end points.
    #[must_use]
    pub fn points(&self) -> &[Point2; 3] {
        &self.points
    }

    /// Returns the weight of the control point.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    fn numerator(&self, t: f64) -> Vector2 {
        let [a, b, c] = &self.num;
        (a * t + b) * t + c
    }

    fn numerator_derivative(&self, t: f64) -> Vector2 {
        let [a, b, _] = &self.num;
        a * (2.0 * t) + b
    }

    fn denominator(&self, t: f64) -> f64 {
        let [a, b, c] = self.denom;
        (a * t + b) * t + c
    }

    fn denominator_derivative(&self, t: f64) -> f64 {
        let [a, b, _] = self.denom;
        2.0 * a * t + b
    }

    #[must_use]
    pub(crate) fn point(&self, t: f64) -> Point2 {
        if t == 0.0 {
            return self.points[0];
        }
        if t == 1.0 {
            return self.points[2];
        }
        Point2::from(self.numerator(t) / self.denominator(t))
    }

    #[must_use]
    pub(crate) fn derivative(&self, t: f64) -> Vector2 {
        let d = self.denominator(t);
        (self.numerator_derivative(t) * d - self.numerator(t) * self.denominator_derivative(t))
            / (d * d)
    }

    #[must_use]
    pub(crate) fn second_derivative(&self, t: f64) -> Vector2 {
        // From N = B·D: N'' = B''·D + 2·B'·D' + B·D''.
        let d = self.denominator(t);
        let dd = self.denominator_derivative(t);
        let ddd = 2.0 * self.denom[0];
        let b = self.numerator(t) / d;
        let b1 = self.derivative(t);
        (self.num[0] * 2.0 - b1 * (2.0 * dd) - b * ddd) / d
    }

    /// Control points lifted to homogeneous coordinates `(w·x, w·y, w)`.
    fn homogeneous(&self) -> [Vector3; 3] {
        let [p0, p1, p2] = self.points;
        let w = self.weight;
        [
            Vector3::new(p0.x, p0.y, 1.0),
            Vector3::new(p1.x * w, p1.y * w, w),
            Vector3::new(p2.x, p2.y, 1.0),
        ]
    }

    /// Sub-conic over `[start, end]`, renormalized to unit end weights.
    #[must_use]
    pub(crate) fn segment(&self, start: f64, end: f64) -> Self {
        if start == 0.0 && end == 1.0 {
            return *self;
        }
        let h = self.homogeneous();
        let a = blossom_homogeneous(&h, start, start);
        let b = blossom_homogeneous(&h, start, end);
        let c = blossom_homogeneous(&h, end, end);

        let p0 = if start == 0.0 {
            self.points[0]
        } else {
            Point2::new(a.x / a.z, a.y / a.z)
        };
        let p2 = if end == 1.0 {
            self.points[2]
        } else {
            Point2::new(c.x / c.z, c.y / c.z)
        };
        let p1 = Point2::new(b.x / b.z, b.y / b.z);
        let weight = b.z / (a.z * c.z).sqrt();
        Self::with_weight(p0, p1, p2, weight)
    }

    #[must_use]
    pub(crate) fn reverse(&self) -> Self {
        let [p0, p1, p2] = self.points;
        Self::with_weight(p2, p1, p0, self.weight)
    }

    #[must_use]
    pub(crate) fn tight_bounds(&self) -> BoundingBox {
        let [n0, n1, n2] = &self.num;
        let [d0, d1, d2] = self.denom;
        let mut bounds = BoundingBox::new(self.points[0], self.points[2]);
        for axis in 0..2 {
            // Numerator of the derivative; the cubic terms cancel.
            let a = n0[axis] * d1 - n1[axis] * d0;
            let b = 2.0 * (n0[axis] * d2 - n2[axis] * d0);
            let c = n1[axis] * d2 - n2[axis] * d1;
            for t in interior_roots(solve_quadratic(a, b, c), 0.0) {
                bounds.add_point(&self.point(t));
            }
        }
        bounds
    }

    /// The parabola through the same control points, and its distance from
    /// this conic at the parametric midpoint.
    #[must_use]
    pub(crate) fn to_quad(&self) -> (QuadCurve, f64) {
        let [p0, p1, p2] = self.points;
        let quad = QuadCurve::new(p0, p1, p2);
        let error = (self.point(0.5) - quad.point(0.5)).norm();
        (quad, error)
    }

    /// Signed distances of the homogeneous numerator to the line through
    /// `origin` along `dir`, as power-basis coefficients.
    #[must_use]
    pub(crate) fn line_distance_coeffs(&self, origin: &Point2, dir: &Vector2) -> [f64; 3] {
        let w = self.weight;
        let [y0, y1, y2] = self.points.map(|p| cross(dir, &(p - origin)));
        [y0 - 2.0 * w * y1 + y2, 2.0 * (w * y1 - y0), y0]
    }
}

fn blossom_homogeneous(h: &[Vector3; 3], u: f64, v: f64) -> Vector3 {
    let lerp = |a: &Vector3, b: &Vector3, t: f64| a * (1.0 - t) + b * t;
    let q0 = lerp(&h[0], &h[1], u);
    let q1 = lerp(&h[1], &h[2], u);
    lerp(&q0, &q1, v)
}
