use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::error::CurveError;
use crate::path::{fmt_coord, parse_segment};

use super::Curve;

impl fmt::Display for Curve {
    /// Writes the curve as path data: a move to the start point followed by
    /// the segment command, e.g. `M 0 0 O 1 1 0 1 0.5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start_point();
        write!(
            f,
            "M {} {} {}",
            fmt_coord(start.x),
            fmt_coord(start.y),
            self.path_op()
        )
    }
}

impl Curve {
    /// Appends the path data text of the curve to `out`.
    pub fn print(&self, out: &mut String) {
        // Writing into a String cannot fail.
        let _ = write!(out, "{self}");
    }
}

impl FromStr for Curve {
    type Err = CurveError;

    /// Reads a single move followed by a single segment, as written by
    /// [`fmt::Display`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Curve::from_path_op(&parse_segment(s)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::math::Point2;
    use crate::path::PathOperation;

    #[test]
    fn prints_each_kind() {
        let line = Curve::line(Point2::new(0.0, 0.0), Point2::new(10.0, -0.0));
        assert_eq!(line.to_string(), "M 0 0 L 10 0");

        let quad = Curve::quad(
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 10.0),
            Point2::new(10.0, 0.0),
        );
        assert_eq!(quad.to_string(), "M 0 0 Q 5 10 10 0");

        let cubic = Curve::cubic(
            Point2::new(0.0, 0.0),
            Point2::new(1.5, 2.0),
            Point2::new(3.0, 4.0),
            Point2::new(5.0, 6.0),
        );
        assert_eq!(cubic.to_string(), "M 0 0 C 1.5 2 3 4 5 6");

        let conic = Curve::conic(
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            0.5,
        )
        .unwrap();
        assert_eq!(conic.to_string(), "M 1 0 O 1 1 0 1 0.5");
    }

    #[test]
    fn print_appends() {
        let line = Curve::line(Point2::new(1.0, 2.0), Point2::new(3.0, 4.0));
        let mut out = String::from("curve: ");
        line.print(&mut out);
        assert_eq!(out, "curve: M 1 2 L 3 4");
    }

    #[test]
    fn text_round_trips() {
        let curves = [
            Curve::line(Point2::new(0.1, -7.25), Point2::new(1e-3, 42.0)),
            Curve::cubic(
                Point2::new(0.1, 0.3),
                Point2::new(3.7, 9.1),
                Point2::new(6.2, -4.4),
                Point2::new(10.9, 0.7),
            ),
            Curve::conic(
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
                std::f64::consts::FRAC_1_SQRT_2,
            )
            .unwrap(),
        ];
        for curve in curves {
            let parsed: Curve = curve.to_string().parse().unwrap();
            assert_eq!(parsed, curve);
        }
    }

    #[test]
    fn close_parses_as_line() {
        let c: Curve = "M 0 0 Z".parse().unwrap();
        assert_eq!(c.op(), PathOperation::Line);
    }

    #[test]
    fn rejects_paths_that_are_not_one_segment() {
        let err = "M 0 0 L 1 1 L 2 2".parse::<Curve>().unwrap_err();
        assert!(matches!(err, CurveError::Parse(ParseError::NotASegment(_))));
        assert!("M 0 0".parse::<Curve>().is_err());
        assert!("M 0 0 O 1 1 2 0 -1".parse::<Curve>().is_err());
    }
}
