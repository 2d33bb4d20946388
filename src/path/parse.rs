use crate::error::{ParseError, Result};
use crate::math::Point2;

use super::{PathBuilder, PathOp, PathOperation};

/// Parses absolute path data made of `M`, `L`, `Q`, `C`, `O` and `Z`
/// commands.
///
/// Numbers are separated by whitespace or commas. A command letter may be
/// omitted for repeated segments of the same kind. Conic segments take the
/// control point, the end point and the weight: `O x1 y1 x2 y2 w`.
///
/// # Errors
///
/// Returns [`ParseError`] for unknown commands, malformed numbers, truncated
/// input or segments before the first move.
pub fn parse_path(text: &str) -> Result<Vec<PathOp>> {
    let mut scanner = Scanner::new(text);
    let mut builder = PathBuilder::new();
    let mut last: Option<char> = None;

    loop {
        scanner.skip_separators();
        let Some(c) = scanner.peek() else {
            break;
        };
        let command = if c.is_ascii_alphabetic() {
            scanner.bump();
            c
        } else {
            // Implicit repetition; a move repeats as a line.
            match last {
                Some('M') => 'L',
                Some(prev) if prev != 'Z' => prev,
                _ => return Err(ParseError::InvalidNumber(scanner.pos).into()),
            }
        };

        if last.is_none() && command != 'M' {
            return Err(ParseError::MissingMove(command).into());
        }

        match command {
            'M' => builder.move_to(scanner.point()?),
            'L' => builder.line_to(scanner.point()?),
            'Q' => {
                let c = scanner.point()?;
                builder.quad_to(c, scanner.point()?);
            }
            'C' => {
                let c1 = scanner.point()?;
                let c2 = scanner.point()?;
                builder.cubic_to(c1, c2, scanner.point()?);
            }
            'O' => {
                let c = scanner.point()?;
                let p = scanner.point()?;
                builder.conic_to(c, p, scanner.number()?);
            }
            'Z' => builder.close(),
            other => {
                return Err(ParseError::UnknownCommand {
                    command: other,
                    position: scanner.pos.saturating_sub(1),
                }
                .into())
            }
        }
        last = Some(command);
    }

    Ok(builder.into_ops())
}

/// Parses text that must hold exactly one move followed by one segment.
pub(crate) fn parse_segment(text: &str) -> Result<PathOp> {
    let ops = parse_path(text)?;
    match ops.as_slice() {
        [first, segment] if first.op == PathOperation::Move => Ok(segment.clone()),
        _ => Err(ParseError::NotASegment(text.to_owned()).into()),
    }
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_separators(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == ',' {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn point(&mut self) -> Result<Point2> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Point2::new(x, y))
    }

    fn number(&mut self) -> Result<f64> {
        self.skip_separators();
        let start = self.pos;
        if self.peek().is_none() {
            return Err(ParseError::UnexpectedEnd(start).into());
        }
        if matches!(self.peek(), Some('+' | '-')) {
            self.bump();
        }
        self.digits();
        if self.peek() == Some('.') {
            self.bump();
            self.digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            self.digits();
        }
        self.src[start..self.pos]
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidNumber(start).into())
    }

    fn digits(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CurveError;

    #[test]
    fn parses_all_commands() {
        let ops = parse_path("M 0 0 L 10 0 Q 10,10 0,10 C 1 2 3 4 5 6 O 1 1 0 1 0.5 Z").unwrap();
        let kinds: Vec<_> = ops.iter().map(|o| o.op).collect();
        assert_eq!(
            kinds,
            vec![
                PathOperation::Move,
                PathOperation::Line,
                PathOperation::Quad,
                PathOperation::Cubic,
                PathOperation::Conic,
                PathOperation::Close,
            ]
        );
        assert_eq!(ops[2].points[0], Point2::new(10.0, 0.0));
        assert!((ops[4].weight - 0.5).abs() < 1e-12);
    }

    #[test]
    fn implicit_repeat_after_move_is_line() {
        let ops = parse_path("M 0 0 1 1 2 0").unwrap();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[2].op, PathOperation::Line);
        assert_eq!(ops[2].points[1], Point2::new(2.0, 0.0));
    }

    #[test]
    fn exponent_numbers() {
        let ops = parse_path("M -1.5e1 2E-1 L .5 -0").unwrap();
        assert_eq!(ops[0].points[0], Point2::new(-15.0, 0.2));
        assert_eq!(ops[1].points[1], Point2::new(0.5, 0.0));
    }

    #[test]
    fn rejects_missing_move() {
        let err = parse_path("L 1 1").unwrap_err();
        assert_eq!(err, CurveError::Parse(ParseError::MissingMove('L')));
    }

    #[test]
    fn rejects_truncated_and_unknown() {
        assert!(matches!(
            parse_path("M 0 0 L 1"),
            Err(CurveError::Parse(ParseError::UnexpectedEnd(_)))
        ));
        assert!(matches!(
            parse_path("M 0 0 X 1 1"),
            Err(CurveError::Parse(ParseError::UnknownCommand { command: 'X', .. }))
        ));
        assert!(matches!(
            parse_path("M 0 0 L 1 ."),
            Err(CurveError::Parse(ParseError::InvalidNumber(_)))
        ));
    }

    #[test]
    fn single_segment() {
        let op = parse_segment("M 0 0 C 1 1 2 1 3 0").unwrap();
        assert_eq!(op.op, PathOperation::Cubic);
        assert_eq!(op.points.len(), 4);
        assert!(parse_segment("M 0 0 L 1 1 L 2 2").is_err());
    }
}
