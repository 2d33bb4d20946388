use crate::math::{lerp, BoundingBox, Point2, Vector2};

use super::quad::QuadCurve;

/// A straight segment from `start` to `end`.
///
/// The parametric form is: `P(t) = (1 - t) * start + t * end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineCurve {
    points: [Point2; 2],
}

impl LineCurve {
    /// Creates a new line segment.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self {
            points: [start, end],
        }
    }

    /// Returns the start and end points.
    #[must_use]
    pub fn points(&self) -> &[Point2; 2] {
        &self.points
    }

    #[must_use]
    pub(crate) fn point(&self, t: f64) -> Point2 {
        lerp(&self.points[0], &self.points[1], t)
    }

    #[must_use]
    pub(crate) fn derivative(&self) -> Vector2 {
        self.points[1] - self.points[0]
    }

    #[must_use]
    pub(crate) fn segment(&self, start: f64, end: f64) -> Self {
        Self::new(self.point(start), self.point(end))
    }

    #[must_use]
    pub(crate) fn reverse(&self) -> Self {
        Self::new(self.points[1], self.points[0])
    }

    /// Elevates the line to a quadratic with its control point at the midpoint.
    #[must_use]
    pub(crate) fn raise(&self) -> QuadCurve {
        QuadCurve::new(self.points[0], self.point(0.5), self.points[1])
    }

    #[must_use]
    pub(crate) fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.points[0], self.points[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_midpoint() {
        let line = LineCurve::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        assert_eq!(line.point(0.5), Point2::new(5.0, 0.0));
        assert_eq!(line.derivative(), Vector2::new(10.0, 0.0));
    }

    #[test]
    fn segment_keeps_direction() {
        let line = LineCurve::new(Point2::new(0.0, 0.0), Point2::new(4.0, 8.0));
        let seg = line.segment(0.25, 0.75);
        assert_eq!(seg.points()[0], Point2::new(1.0, 2.0));
        assert_eq!(seg.points()[1], Point2::new(3.0, 6.0));
    }

    #[test]
    fn raise_puts_control_at_midpoint() {
        let line = LineCurve::new(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0));
        let quad = line.raise();
        assert_eq!(quad.points()[1], Point2::new(1.0, 1.0));
    }
}
