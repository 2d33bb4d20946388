use super::{cross, Point2, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * (q1 - p1)` and `p2 + u * (q2 - p2)`, returns `(t, u)`
/// if they are not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    q1: &Point2,
    p2: &Point2,
    q2: &Point2,
) -> Option<(f64, f64)> {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let denom = cross(&d1, &d2);
    let scale = d1.norm() * d2.norm();
    if denom.abs() <= TOLERANCE * scale.max(TOLERANCE) {
        return None;
    }
    let d = p2 - p1;
    let t = cross(&d, &d2) / denom;
    let u = cross(&d, &d1) / denom;
    Some((t, u))
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
/// `eps` widens the accepted parameter range so that endpoint hits survive
/// rounding.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
    eps: f64,
) -> Option<(Point2, f64, f64)> {
    let (t, u) = line_line_intersect_2d(a0, a1, b0, b1)?;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t = t.clamp(0.0, 1.0);
        let u = u.clamp(0.0, 1.0);
        Some((super::lerp(a0, a1, t), t, u))
    } else {
        None
    }
}
