pub mod bounds;
pub mod distance_2d;
pub mod intersect_2d;
pub mod roots;

pub use bounds::BoundingBox;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type, used for homogeneous conic control points.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 2D affine transformation.
pub type Affine2 = nalgebra::Affine2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Distance under which two intersection points are considered the same.
pub const INTERSECTION_EPSILON: f64 = 1e-6;

/// Recursion limit for line decomposition.
pub const MAX_DECOMPOSE_DEPTH: u32 = 16;

/// Recursion limit for curve/curve intersection subdivision.
pub const MAX_INTERSECT_DEPTH: u32 = 40;

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Linear interpolation between two points.
///
/// Returns `a` exactly at `t = 0` and `b` exactly at `t = 1`.
#[must_use]
pub fn lerp(a: &Point2, b: &Point2, t: f64) -> Point2 {
    let s = 1.0 - t;
    Point2::new(a.x * s + b.x * t, a.y * s + b.y * t)
}

/// Normalizes `v`, returning `None` when it is too short to carry a direction.
#[must_use]
pub fn try_normalize(v: &Vector2) -> Option<Vector2> {
    let len = v.norm();
    if len < TOLERANCE || !len.is_finite() {
        None
    } else {
        Some(v / len)
    }
}

/// Rotates `v` by +90°.
#[must_use]
pub fn perpendicular(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}
