use arrayvec::ArrayVec;

use crate::math::distance_2d::polygon_length;
use crate::math::roots::{interior_roots, solve_quadratic};
use crate::math::{cross, perpendicular, Point2, Vector2, TOLERANCE};

use super::Curve;

/// Samples used to bracket curvature extrema of conics.
const CURVATURE_SAMPLES: u32 = 32;

/// Golden-section steps used to refine a bracketed extremum.
const GOLDEN_ITERATIONS: u32 = 60;

/// Relative change of `|κ|` between samples below which it counts as flat.
const CURVATURE_NOISE: f64 = 1e-9;

/// Curvature at a point of a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curvature {
    /// Signed curvature; positive when the curve turns towards its normal.
    pub curvature: f64,
    /// Centre of the osculating circle, `None` where the curvature is zero
    /// or undefined.
    pub center: Option<Point2>,
}

impl Curvature {
    const ZERO: Self = Self {
        curvature: 0.0,
        center: None,
    };
}

impl Curve {
    /// Signed curvature `(x'y'' - y'x'') / |B'|³` and osculating circle
    /// centre at progress `t`.
    ///
    /// Straight curves and points where the derivative vanishes report zero
    /// curvature and no centre. Both are judged relative to the size of the
    /// control polygon.
    #[must_use]
    pub fn curvature(&self, t: f64) -> Curvature {
        if matches!(self, Self::Line(_)) {
            return Curvature::ZERO;
        }
        let scale = polygon_length(&self.control_points());
        let d1 = self.derivative(t);
        let d2 = self.second_derivative(t);
        let speed = d1.norm();
        if speed <= TOLERANCE * scale {
            return Curvature::ZERO;
        }
        let k = cross(&d1, &d2) / (speed * speed * speed);
        if !k.is_finite() || k.abs() * scale < TOLERANCE {
            return Curvature::ZERO;
        }
        let normal = perpendicular(&(d1 / speed));
        Curvature {
            curvature: k,
            center: Some(self.point(t) + normal / k),
        }
    }

    /// Progress values strictly inside (0, 1) where the curvature has an
    /// inflection or an extremum, sorted ascending.
    ///
    /// Cubics report their inflection points, quadratics their vertex and
    /// conics their curvature extrema. Lines have none.
    #[must_use]
    pub fn curvature_points(&self) -> ArrayVec<f64, 3> {
        let mut out: ArrayVec<f64, 3> = match self {
            Self::Line(_) => ArrayVec::new(),
            Self::Quad(c) => c
                .vertex()
                .filter(|t| *t > 0.0 && *t < 1.0)
                .into_iter()
                .collect(),
            Self::Cubic(c) => c.inflections().into_iter().collect(),
            Self::Conic(_) => self.sampled_curvature_extrema(),
        };
        out.sort_by(f64::total_cmp);
        out
    }

    /// Progress values strictly inside (0, 1) where the derivative vanishes,
    /// so the tangent direction flips.
    #[must_use]
    pub fn cusps(&self) -> ArrayVec<f64, 2> {
        let scale = polygon_length(&self.control_points());
        if scale < TOLERANCE {
            return ArrayVec::new();
        }
        let candidates: ArrayVec<f64, 2> = match self {
            Self::Quad(c) => {
                let [a, b] = c.derivative_coeffs();
                derivative_zeros(&[Vector2::zeros(), a, b])
            }
            Self::Cubic(c) => derivative_zeros(&c.derivative_coeffs()),
            Self::Line(_) | Self::Conic(_) => ArrayVec::new(),
        };
        candidates
            .into_iter()
            .filter(|t| self.derivative(*t).norm() <= 1e-7 * scale)
            .collect()
    }

    /// Brackets local extrema of `|κ|` by sampling, then refines each with a
    /// golden-section search.
    ///
    /// Changes within rounding noise are ignored, so circular arcs have none.
    fn sampled_curvature_extrema(&self) -> ArrayVec<f64, 3> {
        let n = CURVATURE_SAMPLES;
        let k = |t: f64| self.curvature(t).curvature.abs();
        let samples: Vec<f64> = (0..=n).map(|i| k(f64::from(i) / f64::from(n))).collect();

        let mut out = ArrayVec::new();
        for i in 1..n as usize {
            let (prev, here, next) = (samples[i - 1], samples[i], samples[i + 1]);
            let noise = CURVATURE_NOISE * prev.max(here).max(next);
            // Rise on the left, no fall beyond noise on the right; a plateau
            // across two samples is bracketed once.
            let maximum = here - prev > noise && next - here <= noise;
            let minimum = prev - here > noise && here - next <= noise;
            if !(maximum || minimum) {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let (lo, hi) = ((i - 1) as f64 / f64::from(n), (i + 1) as f64 / f64::from(n));
            let sign = if maximum { -1.0 } else { 1.0 };
            let t = golden_section_min(|t| sign * k(t), lo, hi);
            if t > 0.0 && t < 1.0 && out.try_push(t).is_err() {
                break;
            }
        }
        out
    }
}

/// Interior zeros of a derivative given by power-basis coefficients per
/// axis (highest degree first, quadratic at most).
fn derivative_zeros(coeffs: &[Vector2; 3]) -> ArrayVec<f64, 2> {
    let [a, b, c] = coeffs;
    // Solve on the axis with the larger coefficients; the other axis is
    // checked by the caller.
    let x_scale = a.x.abs() + b.x.abs() + c.x.abs();
    let y_scale = a.y.abs() + b.y.abs() + c.y.abs();
    let axis = usize::from(y_scale > x_scale);
    let other = 1 - axis;
    let mut roots = interior_roots(solve_quadratic(a[axis], b[axis], c[axis]), 1e-9);
    if x_scale.min(y_scale) < TOLERANCE {
        // One coordinate is constant: its derivative is identically zero, so
        // only the solved axis matters.
        return roots;
    }
    roots.retain(|t| {
        let t = *t;
        let v = (a[other] * t + b[other]) * t + c[other];
        v.abs() <= 1e-6 * (a[other].abs() + b[other].abs() + c[other].abs())
    });
    roots
}

fn golden_section_min(f: impl Fn(f64) -> f64, mut lo: f64, mut hi: f64) -> f64 {
    let ratio = (5.0_f64.sqrt() - 1.0) / 2.0;
    let mut x1 = hi - ratio * (hi - lo);
    let mut x2 = lo + ratio * (hi - lo);
    let (mut f1, mut f2) = (f(x1), f(x2));
    for _ in 0..GOLDEN_ITERATIONS {
        if f1 < f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - ratio * (hi - lo);
            f1 = f(x1);
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + ratio * (hi - lo);
            f2 = f(x2);
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn circle() -> Curve {
        Curve::conic(
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            std::f64::consts::FRAC_1_SQRT_2,
        )
        .unwrap()
    }

    #[test]
    fn line_has_no_curvature() {
        let line = Curve::line(Point2::new(0.0, 0.0), Point2::new(3.0, 4.0));
        assert_eq!(line.curvature(0.5), Curvature::ZERO);
        assert!(line.curvature_points().is_empty());
        assert!(line.cusps().is_empty());
    }

    #[test]
    fn collinear_quad_is_straight() {
        let quad = Curve::quad(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        );
        let k = quad.curvature(0.3);
        assert_eq!(k.curvature, 0.0);
        assert!(k.center.is_none());
    }

    #[test]
    fn unit_circle_has_unit_curvature() {
        let c = circle();
        for t in [0.0, 0.25, 0.5, 0.9, 1.0] {
            let k = c.curvature(t);
            assert_relative_eq!(k.curvature, 1.0, epsilon = 1e-9);
            assert_relative_eq!(k.center.unwrap(), Point2::origin(), epsilon = 1e-9);
        }
        let reversed = c.reverse().curvature(0.5);
        assert_relative_eq!(reversed.curvature, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn quad_vertex_is_curvature_point() {
        let quad = Curve::quad(
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 10.0),
            Point2::new(10.0, 0.0),
        );
        let t = quad.curvature_points();
        assert_eq!(t.len(), 1);
        assert_relative_eq!(t[0], 0.5, epsilon = 1e-12);
        assert!(quad.curvature(0.5).curvature.abs() > quad.curvature(0.3).curvature.abs());
    }

    #[test]
    fn cubic_inflection_is_curvature_point() {
        let cubic = Curve::cubic(
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 10.0),
            Point2::new(5.0, -10.0),
            Point2::new(10.0, 0.0),
        );
        let t = cubic.curvature_points();
        assert_eq!(t.len(), 1);
        assert!(cubic.curvature(t[0]).curvature.abs() < 1e-9);
    }

    #[test]
    fn circular_arcs_have_no_curvature_points() {
        assert!(circle().curvature_points().is_empty());

        let large = Curve::conic(
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
            std::f64::consts::FRAC_1_SQRT_2,
        )
        .unwrap();
        assert!(large.curvature_points().is_empty());

        // 60 degree arc of the unit circle.
        let (s, c) = std::f64::consts::FRAC_PI_3.sin_cos();
        let sixty = Curve::conic(
            Point2::new(1.0, 0.0),
            Point2::new(1.0, (std::f64::consts::FRAC_PI_6).tan()),
            Point2::new(c, s),
            std::f64::consts::FRAC_PI_6.cos(),
        )
        .unwrap();
        assert!(sixty.curvature_points().is_empty());
    }

    #[test]
    fn huge_circle_keeps_its_curvature() {
        let r = 1e12;
        let c = Curve::conic(
            Point2::new(r, 0.0),
            Point2::new(r, r),
            Point2::new(0.0, r),
            std::f64::consts::FRAC_1_SQRT_2,
        )
        .unwrap();
        let k = c.curvature(0.5);
        assert_relative_eq!(k.curvature * r, 1.0, epsilon = 1e-9);
        assert!(k.center.unwrap().coords.norm() < 1e-6 * r);
    }

    #[test]
    fn hyperbolic_arc_has_vertex() {
        // Symmetric flat arc: the curvature peaks at its middle.
        let c = Curve::conic(
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 2.0),
            Point2::new(10.0, 0.0),
            3.0,
        )
        .unwrap();
        let t = c.curvature_points();
        assert_eq!(t.len(), 1, "t={t:?}");
        assert_relative_eq!(t[0], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn cubic_cusp() {
        // Control points crossed symmetrically produce a cusp at t = 0.5.
        let cubic = Curve::cubic(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
            Point2::new(10.0, 0.0),
        );
        let cusps = cubic.cusps();
        assert_eq!(cusps.len(), 1, "cusps={cusps:?}");
        assert_relative_eq!(cusps[0], 0.5, epsilon = 1e-9);
        let tangent = cubic.tangent(cusps[0]);
        assert_relative_eq!(tangent.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn smooth_cubic_has_no_cusp() {
        let cubic = Curve::cubic(
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 10.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 0.0),
        );
        assert!(cubic.cusps().is_empty());
    }

    #[test]
    fn folded_quad_has_cusp() {
        let quad = Curve::quad(
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(2.0, 0.0),
        );
        let cusps = quad.cusps();
        assert_eq!(cusps.len(), 1);
        assert_relative_eq!(cusps[0], 2.0 / 3.0, epsilon = 1e-9);
    }
}
