use super::Point2;

/// Projects `p` onto the segment `a → b`.
///
/// Returns the clamped segment parameter in `[0, 1]` and the distance from
/// `p` to the projected point.
#[must_use]
pub fn project_to_segment(p: &Point2, a: &Point2, b: &Point2) -> (f64, f64) {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (0.0, (p - a).norm());
    }

    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    let closest = a + d * t;
    (t, (p - closest).norm())
}

/// Returns the minimum distance from `p` to the segment `a → b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    project_to_segment(p, a, b).1
}

/// Returns the largest distance from any of `points` to the segment `a → b`.
#[must_use]
pub fn max_segment_deviation(points: &[Point2], a: &Point2, b: &Point2) -> f64 {
    points
        .iter()
        .map(|p| point_to_segment_dist(p, a, b))
        .fold(0.0, f64::max)
}

/// Total length of the polygon through `points`.
#[must_use]
pub fn polygon_length(points: &[Point2]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn segment_dist_perpendicular_projection() {
        // Point (1, 1) to segment (0,0)→(2,0). Closest at (1,0), dist = 1.
        let (t, d) = project_to_segment(
            &Point2::new(1.0, 1.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
        );
        assert!((t - 0.5).abs() < TOL, "t={t}");
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_endpoint_closest() {
        let d = point_to_segment_dist(
            &Point2::new(-1.0, 0.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
        );
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_degenerate() {
        // Zero-length segment: distance is point-to-point.
        let d = point_to_segment_dist(
            &Point2::new(3.0, 4.0),
            &Point2::origin(),
            &Point2::origin(),
        );
        assert!((d - 5.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn deviation_and_length() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(4.0, 0.0);
        let pts = [a, Point2::new(1.0, 2.0), Point2::new(3.0, -1.0), b];
        assert!((max_segment_deviation(&pts, &a, &b) - 2.0).abs() < TOL);
        let len = polygon_length(&[a, Point2::new(3.0, 4.0), Point2::new(3.0, 0.0)]);
        assert!((len - 9.0).abs() < TOL, "len={len}");
    }
}
