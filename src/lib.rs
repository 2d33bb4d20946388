pub mod curve;
pub mod error;
pub mod math;
pub mod path;

pub use curve::{intersect, Curve, Intersection, IntersectionKind};
pub use error::{CurveError, ParseError, Result};
pub use path::{ForeachFlags, PathBuilder, PathOp, PathOperation, PathSink};
