use arrayvec::ArrayVec;
use tracing::trace;

use crate::math::intersect_2d::line_line_intersect_2d;
use crate::math::{lerp, perpendicular, try_normalize, Point2, Vector2};

use super::Curve;

/// Offset control points farther than this many distances from their
/// source point are replaced by a shift along the averaged normal.
const MITER_LIMIT: f64 = 10.0;

impl Curve {
    /// Approximates the curve shifted by `distance` along its normal.
    ///
    /// The result has the same kind (and weight). Each control polygon edge
    /// is moved along its own normal and neighbouring offset edges are
    /// intersected to place the interior control points, so lines and
    /// circular arcs are offset exactly and end tangents are kept.
    #[must_use]
    pub fn offset(&self, distance: f64) -> Self {
        if distance == 0.0 {
            return *self;
        }
        let points = self.control_points();
        let normals = edge_normals(&points, self.normal(0.0));
        let n = points.len();

        let mut out: ArrayVec<Point2, 4> = ArrayVec::new();
        out.push(points[0] + normals[0] * distance);
        for i in 1..n - 1 {
            out.push(offset_joint(&points, &normals, i, distance));
        }
        out.push(points[n - 1] + normals[n - 2] * distance);
        self.with_points(&out)
    }
}

/// Unit normal of every control polygon edge. Degenerate edges take the
/// normal of the nearest non-degenerate edge, or `fallback` if all are.
fn edge_normals(points: &[Point2], fallback: Vector2) -> ArrayVec<Vector2, 3> {
    let own: ArrayVec<Option<Vector2>, 3> = points
        .windows(2)
        .map(|w| try_normalize(&(w[1] - w[0])).map(|d| perpendicular(&d)))
        .collect();
    (0..own.len())
        .map(|i| {
            own[i]
                .or_else(|| own[i + 1..].iter().find_map(|n| *n))
                .or_else(|| own[..i].iter().rev().find_map(|n| *n))
                .unwrap_or(fallback)
        })
        .collect()
}

/// Offset position of interior control point `i`: where the offset edges
/// before and after it meet.
fn offset_joint(points: &[Point2], normals: &[Vector2], i: usize, distance: f64) -> Point2 {
    let (before, after) = (normals[i - 1] * distance, normals[i] * distance);
    let a0 = points[i - 1] + before;
    let a1 = points[i] + before;
    let b0 = points[i] + after;
    let b1 = points[i + 1] + after;

    if let Some((t, _)) = line_line_intersect_2d(&a0, &a1, &b0, &b1) {
        let joint = lerp(&a0, &a1, t);
        if (joint - points[i]).norm() <= MITER_LIMIT * distance.abs() {
            return joint;
        }
        trace!(i, "offset joint beyond miter limit");
    }
    let shift = try_normalize(&(normals[i - 1] + normals[i])).unwrap_or(normals[i - 1]);
    points[i] + shift * distance
}
