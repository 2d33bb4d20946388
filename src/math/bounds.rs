use super::Point2;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner of the bounding box.
    pub min: Point2,
    /// Maximum corner of the bounding box.
    pub max: Point2,
}

impl BoundingBox {
    /// Creates a box spanning the two corners, in any order.
    #[must_use]
    pub fn new(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates an empty box containing only `p`.
    #[must_use]
    pub fn from_point(p: Point2) -> Self {
        Self { min: p, max: p }
    }

    /// Grows the box to contain `p`.
    pub fn add_point(&mut self, p: &Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Returns whether `p` lies inside the box (boundary included).
    #[must_use]
    pub fn contains_point(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Returns whether `other` lies inside the box.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    /// Returns whether the boxes overlap once each is grown by `epsilon`.
    #[must_use]
    pub fn intersects(&self, other: &Self, epsilon: f64) -> bool {
        self.min.x <= other.max.x + epsilon
            && other.min.x <= self.max.x + epsilon
            && self.min.y <= other.max.y + epsilon
            && other.min.y <= self.max.y + epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_intersect() {
        let a = BoundingBox::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        let b = BoundingBox::new(Point2::new(1.0, 0.5), Point2::new(2.0, 2.0));
        let c = BoundingBox::new(Point2::new(1.5, 0.5), Point2::new(2.0, 2.0));
        assert!(a.intersects(&b, 0.0));
        assert!(!a.intersects(&c, 0.0));
        assert!(a.intersects(&c, 0.6));
    }

    #[test]
    fn corners_are_ordered() {
        let b = BoundingBox::new(Point2::new(3.0, -1.0), Point2::new(2.0, 0.0));
        assert_eq!(b.min, Point2::new(2.0, -1.0));
        assert_eq!(b.max, Point2::new(3.0, 0.0));
    }

    #[test]
    fn grows_to_contain_points() {
        let mut b = BoundingBox::from_point(Point2::new(1.0, 1.0));
        b.add_point(&Point2::new(-1.0, 4.0));
        let inner = BoundingBox::new(Point2::new(0.0, 2.0), Point2::new(0.5, 3.0));
        assert!(b.contains(&inner));
        assert!(!inner.contains(&b));
        assert!(b.contains_point(&Point2::new(-1.0, 1.0)));
    }
}
