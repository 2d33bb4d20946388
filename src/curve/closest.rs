use crate::math::distance_2d::project_to_segment;
use crate::math::Point2;

use super::Curve;

/// Samples taken before Newton refinement.
const CLOSEST_SAMPLES: u32 = 32;

/// Newton refinement steps.
const CLOSEST_ITERATIONS: u32 = 8;

/// Result of a closest point query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    /// The closest point on the curve.
    pub point: Point2,
    /// Progress at the closest point.
    pub progress: f64,
    /// Distance from the query point to the closest point.
    pub distance: f64,
}

impl Curve {
    /// Finds the point on the curve closest to `point`.
    ///
    /// Returns `None` if the curve stays farther than `threshold` from it.
    /// Lines are solved exactly; curves are sampled and refined with Newton
    /// iterations on `(B(t) - p) · B'(t) = 0`.
    #[must_use]
    pub fn closest_point(&self, point: Point2, threshold: f64) -> Option<ClosestPoint> {
        let best = match self {
            Self::Line(line) => {
                let [a, b] = line.points();
                let (t, _) = project_to_segment(&point, a, b);
                self.closest_at(point, t)
            }
            _ => {
                let mut best = self.closest_at(point, 0.0);
                for i in 1..=CLOSEST_SAMPLES {
                    let t = f64::from(i) / f64::from(CLOSEST_SAMPLES);
                    let candidate = self.closest_at(point, t);
                    if candidate.distance < best.distance {
                        best = candidate;
                    }
                }
                self.refine(point, best)
            }
        };
        (best.distance <= threshold).then_some(best)
    }

    fn closest_at(&self, query: Point2, t: f64) -> ClosestPoint {
        let point = self.point(t);
        ClosestPoint {
            point,
            progress: t,
            distance: (point - query).norm(),
        }
    }

    fn refine(&self, query: Point2, mut best: ClosestPoint) -> ClosestPoint {
        let mut t = best.progress;
        for _ in 0..CLOSEST_ITERATIONS {
            let diff = self.point(t) - query;
            let d1 = self.derivative(t);
            let d2 = self.second_derivative(t);
            let f = diff.dot(&d1);
            let df = d1.dot(&d1) + diff.dot(&d2);
            if df.abs() < 1e-300 {
                break;
            }
            let next = (t - f / df).clamp(0.0, 1.0);
            if !next.is_finite() {
                break;
            }
            let candidate = self.closest_at(query, next);
            if candidate.distance < best.distance {
                best = candidate;
            }
            if (next - t).abs() < 1e-15 {
                break;
            }
            t = next;
        }
        best
    }
}
