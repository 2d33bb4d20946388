use std::ops::ControlFlow;

use tracing::{debug, trace};

use crate::math::distance_2d::{max_segment_deviation, polygon_length};
use crate::math::{Point2, MAX_DECOMPOSE_DEPTH};
use crate::path::ForeachFlags;

use super::Curve;

/// Why a piece of a curve was emitted as a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineReason {
    /// The piece is straight within the tolerance.
    Straight,
    /// The piece is too short to matter, or subdivision hit its depth limit.
    Short,
}

/// A line approximating the part of a curve between two progress values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecomposedLine {
    /// Start of the line, on the curve.
    pub from: Point2,
    /// End of the line, on the curve.
    pub to: Point2,
    /// Progress on the curve at `from`.
    pub from_progress: f64,
    /// Progress on the curve at `to`.
    pub to_progress: f64,
    pub reason: LineReason,
}

impl Curve {
    /// Approximates the curve by lines that stay within `tolerance` of it.
    ///
    /// Pieces are produced depth-first from start to end. `add_line` may
    /// return [`ControlFlow::Break`] to stop; the break is returned unchanged.
    pub fn decompose<F>(&self, tolerance: f64, mut add_line: F) -> ControlFlow<()>
    where
        F: FnMut(&DecomposedLine) -> ControlFlow<()>,
    {
        let flow = if let Self::Line(line) = self {
            let [from, to] = *line.points();
            add_line(&DecomposedLine {
                from,
                to,
                from_progress: 0.0,
                to_progress: 1.0,
                reason: LineReason::Straight,
            })
        } else {
            self.decompose_step(tolerance, 0.0, 1.0, 0, &mut add_line)
        };
        if flow.is_break() {
            debug!(op = ?self.op(), "line decomposition stopped by callback");
        }
        flow
    }

    fn decompose_step<F>(
        &self,
        tolerance: f64,
        from: f64,
        to: f64,
        depth: u32,
        add_line: &mut F,
    ) -> ControlFlow<()>
    where
        F: FnMut(&DecomposedLine) -> ControlFlow<()>,
    {
        // Pieces are always cut from the original curve so that progress maps
        // linearly, conics included.
        let piece = self.segment(from, to);
        let points = piece.control_points();
        let (start, end) = (points[0], points[points.len() - 1]);

        let reason = if max_segment_deviation(&points[1..points.len() - 1], &start, &end)
            <= tolerance
        {
            Some(LineReason::Straight)
        } else if polygon_length(&points) <= tolerance || depth >= MAX_DECOMPOSE_DEPTH {
            Some(LineReason::Short)
        } else {
            None
        };

        if let Some(reason) = reason {
            trace!(from, to, depth, ?reason, "emit line");
            return add_line(&DecomposedLine {
                from: start,
                to: end,
                from_progress: from,
                to_progress: to,
                reason,
            });
        }

        let mid = 0.5 * (from + to);
        self.decompose_step(tolerance, from, mid, depth + 1, add_line)?;
        self.decompose_step(tolerance, mid, to, depth + 1, add_line)
    }

    /// Collects the lines produced by [`Curve::decompose`].
    #[must_use]
    pub fn lines(&self, tolerance: f64) -> Vec<DecomposedLine> {
        let mut out = Vec::new();
        let _ = self.decompose(tolerance, |line| {
            out.push(*line);
            ControlFlow::Continue(())
        });
        out
    }

    /// Arc length, measured on the line decomposition at `tolerance`.
    #[must_use]
    pub fn length(&self, tolerance: f64) -> f64 {
        self.lines(tolerance)
            .iter()
            .map(|l| (l.to - l.from).norm())
            .sum()
    }

    /// Re-expresses the curve using only the curve kinds `flags` allows.
    ///
    /// Allowed kinds pass through unchanged. Otherwise quadratics are raised
    /// to cubics, cubics and conics are approximated by quadratics (raised to
    /// cubics when only cubics are allowed), and anything else falls back to
    /// lines. Approximations stay within `tolerance`.
    pub fn decompose_curve<F>(
        &self,
        flags: ForeachFlags,
        tolerance: f64,
        mut add_curve: F,
    ) -> ControlFlow<()>
    where
        F: FnMut(&Curve) -> ControlFlow<()>,
    {
        let allow_quad = flags.contains(ForeachFlags::ALLOW_QUAD);
        let allow_cubic = flags.contains(ForeachFlags::ALLOW_CUBIC);
        let allow_conic = flags.contains(ForeachFlags::ALLOW_CONIC);

        let flow = match self {
            Self::Line(_) => add_curve(self),
            Self::Quad(_) if allow_quad => add_curve(self),
            Self::Quad(_) if allow_cubic => add_curve(&self.raise()),
            Self::Cubic(_) if allow_cubic => add_curve(self),
            Self::Conic(_) if allow_conic => add_curve(self),
            Self::Cubic(_) | Self::Conic(_) if allow_quad || allow_cubic => {
                self.quad_step(tolerance, 0.0, 1.0, 0, &mut |quad: &Curve| {
                    if allow_quad {
                        add_curve(quad)
                    } else {
                        add_curve(&quad.raise())
                    }
                })
            }
            _ => self.decompose(tolerance, |line| add_curve(&Curve::line(line.from, line.to))),
        };
        if flow.is_break() {
            debug!(op = ?self.op(), ?flags, "curve decomposition stopped by callback");
        }
        flow
    }

    /// Approximates a cubic or conic by quadratics.
    fn quad_step<F>(
        &self,
        tolerance: f64,
        from: f64,
        to: f64,
        depth: u32,
        add_quad: &mut F,
    ) -> ControlFlow<()>
    where
        F: FnMut(&Curve) -> ControlFlow<()>,
    {
        let (quad, error) = match self.segment(from, to) {
            Self::Cubic(c) => c.to_quad(),
            Self::Conic(c) => c.to_quad(),
            other => {
                return add_quad(&other);
            }
        };
        if error <= tolerance || depth >= MAX_DECOMPOSE_DEPTH {
            trace!(from, to, depth, error, "emit quad");
            return add_quad(&Curve::Quad(quad));
        }
        let mid = 0.5 * (from + to);
        self.quad_step(tolerance, from, mid, depth + 1, add_quad)?;
        self.quad_step(tolerance, mid, to, depth + 1, add_quad)
    }
}
