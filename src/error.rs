use thiserror::Error;

use crate::path::PathOperation;

/// Top-level error type for the curve kernel.
#[derive(Debug, Error, PartialEq)]
pub enum CurveError {
    #[error("{op:?} takes {expected} points, got {found}")]
    PointCount {
        op: PathOperation,
        expected: usize,
        found: usize,
    },

    #[error("{0:?} does not describe a curve segment")]
    UnsupportedOperation(PathOperation),

    #[error("conic weight {0} must be finite and positive")]
    InvalidWeight(f64),

    #[error("non-finite coordinate")]
    NonFinite,

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors raised while reading path data.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEnd(usize),

    #[error("unknown command '{command}' at byte {position}")]
    UnknownCommand { command: char, position: usize },

    #[error("invalid number at byte {0}")]
    InvalidNumber(usize),

    #[error("path data must start with a move, found '{0}'")]
    MissingMove(char),

    #[error("expected a single curve segment: {0}")]
    NotASegment(String),
}

/// Convenience type alias for results using [`CurveError`].
pub type Result<T> = std::result::Result<T, CurveError>;
