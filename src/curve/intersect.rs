//! Intersections between two curves.
//!
//! Lines are handled in closed form, against lines and against curves.
//! Curve pairs fall back to recursive subdivision of both curves until the
//! pieces are flat, then intersect the chords. Both paths report tangential
//! contacts as a single hit.

use std::cmp::Ordering;

use arrayvec::ArrayVec;
use tracing::{debug, trace};

use crate::math::distance_2d::{max_segment_deviation, project_to_segment};
use crate::math::intersect_2d::{line_line_intersect_2d, segment_segment_intersect_2d};
use crate::math::roots::{solve_cubic, solve_quadratic, unit_interval_roots};
use crate::math::{cross, Point2, INTERSECTION_EPSILON, MAX_INTERSECT_DEPTH, TOLERANCE};

use super::Curve;

/// Control point deviation below which a piece counts as its chord.
const FLATNESS: f64 = 1e-8;

/// Upper bound on visited piece pairs during subdivision.
const MAX_VISITS: u32 = 4096;

/// Hits closer than this in both progress values are merged when the curves
/// also touch halfway between them.
const MERGE_PROGRESS: f64 = 1e-3;

/// Slack on parameter ranges so that hits at the ends survive rounding.
const PARAM_EPSILON: f64 = 1e-9;

/// Interior points checked before two curves are reported as overlapping.
const OVERLAP_SAMPLES: u32 = 5;

/// How a reported point relates the two curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntersectionKind {
    /// The curves meet at an isolated point.
    Crossing,
    /// First point of a stretch where the curves coincide.
    OverlapStart,
    /// Last point of a stretch where the curves coincide.
    OverlapEnd,
}

/// A point shared by two curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Progress on the first curve.
    pub t1: f64,
    /// Progress on the second curve.
    pub t2: f64,
    /// The shared point, as evaluated on the curve it was found on.
    pub point: Point2,
    pub kind: IntersectionKind,
}

#[derive(Debug, Clone, Copy)]
struct Hit {
    t1: f64,
    t2: f64,
    point: Point2,
}

impl Hit {
    fn swapped(self) -> Self {
        Self {
            t1: self.t2,
            t2: self.t1,
            point: self.point,
        }
    }

    fn with_kind(self, kind: IntersectionKind) -> Intersection {
        Intersection {
            t1: self.t1,
            t2: self.t2,
            point: self.point,
            kind,
        }
    }
}

enum Found {
    Crossings(Vec<Hit>),
    Overlap(Hit, Hit),
}

/// Computes the points where `a` and `b` meet, sorted by progress on `a`
/// and truncated to `max_results`.
///
/// Coinciding stretches are reported as an [`IntersectionKind::OverlapStart`]
/// and [`IntersectionKind::OverlapEnd`] pair. Swapping the arguments yields
/// the same points with `t1` and `t2` exchanged.
#[must_use]
pub fn intersect(a: &Curve, b: &Curve, max_results: usize) -> Vec<Intersection> {
    if max_results == 0 {
        return Vec::new();
    }
    let swapped = canonical_order(a, b) == Ordering::Greater;
    let (first, second) = if swapped { (b, a) } else { (a, b) };
    let orient = |hit: Hit| if swapped { hit.swapped() } else { hit };

    let mut out: Vec<Intersection> = match intersect_ordered(first, second) {
        Found::Overlap(start, end) => {
            let (start, end) = (orient(start), orient(end));
            let (start, end) = if start.t1 <= end.t1 {
                (start, end)
            } else {
                (end, start)
            };
            vec![
                start.with_kind(IntersectionKind::OverlapStart),
                end.with_kind(IntersectionKind::OverlapEnd),
            ]
        }
        Found::Crossings(hits) => hits
            .into_iter()
            .map(|hit| orient(hit).with_kind(IntersectionKind::Crossing))
            .collect(),
    };
    out.sort_by(|x, y| x.t1.total_cmp(&y.t1));
    out.truncate(max_results);
    if out.last().is_some_and(|hit| hit.kind == IntersectionKind::OverlapStart) {
        // An overlap is only reported with both of its ends.
        out.pop();
    }
    debug!(a = ?a.op(), b = ?b.op(), count = out.len(), "intersected curves");
    out
}

/// Orders curves by kind, then control points, then weight.
fn canonical_order(a: &Curve, b: &Curve) -> Ordering {
    let rank = |c: &Curve| match c {
        Curve::Line(_) => 0u8,
        Curve::Quad(_) => 1,
        Curve::Cubic(_) => 2,
        Curve::Conic(_) => 3,
    };
    rank(a)
        .cmp(&rank(b))
        .then_with(|| {
            a.control_points()
                .iter()
                .zip(b.control_points().iter())
                .map(|(p, q)| p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y)))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| {
            a.weight()
                .unwrap_or(1.0)
                .total_cmp(&b.weight().unwrap_or(1.0))
        })
}

fn intersect_ordered(a: &Curve, b: &Curve) -> Found {
    let candidates = endpoint_candidates(a, b);
    if let Some((start, end)) = overlap(a, b, &candidates) {
        trace!(start = start.t1, end = end.t1, "curves overlap");
        return Found::Overlap(start, end);
    }

    let mut hits = match (a, b) {
        (Curve::Line(_), Curve::Line(_)) => line_line(a, b),
        (Curve::Line(_), _) => line_curve(a, b),
        (Curve::Quad(_), Curve::Cubic(_)) => curve_curve(&a.raise(), b),
        _ => curve_curve(a, b),
    };
    hits.extend(candidates);
    Found::Crossings(merge(a, b, hits))
}

/// Endpoints of either curve that lie on the other one.
fn endpoint_candidates(a: &Curve, b: &Curve) -> Vec<Hit> {
    let mut found = Vec::new();
    for t1 in [0.0, 1.0] {
        let point = a.point(t1);
        if let Some(c) = b.closest_point(point, INTERSECTION_EPSILON) {
            found.push(Hit {
                t1,
                t2: c.progress,
                point,
            });
        }
    }
    for t2 in [0.0, 1.0] {
        let point = b.point(t2);
        if let Some(c) = a.closest_point(point, INTERSECTION_EPSILON) {
            found.push(Hit {
                t1: c.progress,
                t2,
                point,
            });
        }
    }

    let mut unique: Vec<Hit> = Vec::with_capacity(found.len());
    for hit in found {
        if !unique
            .iter()
            .any(|u| (u.point - hit.point).norm() <= INTERSECTION_EPSILON)
        {
            unique.push(hit);
        }
    }
    unique
}

/// Two distinct endpoint contacts with the stretch between them lying on
/// both curves.
fn overlap(a: &Curve, b: &Curve, candidates: &[Hit]) -> Option<(Hit, Hit)> {
    let lo = candidates.iter().min_by(|x, y| x.t1.total_cmp(&y.t1))?;
    let hi = candidates.iter().max_by(|x, y| x.t1.total_cmp(&y.t1))?;
    if hi.t1 - lo.t1 <= INTERSECTION_EPSILON || (hi.t2 - lo.t2).abs() <= INTERSECTION_EPSILON {
        return None;
    }
    let n = OVERLAP_SAMPLES + 1;
    let coincide = (1..n).all(|i| {
        let t1 = lo.t1 + f64::from(i) / f64::from(n) * (hi.t1 - lo.t1);
        b.closest_point(a.point(t1), INTERSECTION_EPSILON).is_some()
    });
    coincide.then_some((*lo, *hi))
}

fn line_line(a: &Curve, b: &Curve) -> Vec<Hit> {
    let (a0, a1) = (a.start_point(), a.end_point());
    let (b0, b1) = (b.start_point(), b.end_point());
    if line_line_intersect_2d(&a0, &a1, &b0, &b1).is_none() {
        // Parallel or degenerate: only shared endpoints can meet.
        return Vec::new();
    }
    segment_segment_intersect_2d(&a0, &a1, &b0, &b1, PARAM_EPSILON)
        .map(|(point, t1, t2)| Hit { t1, t2, point })
        .into_iter()
        .collect()
}

/// Roots of the curve's signed distance to the line, kept where they fall
/// within the line segment.
fn line_curve(line: &Curve, curve: &Curve) -> Vec<Hit> {
    let origin = line.start_point();
    let dir = line.end_point() - origin;
    let len_sq = dir.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return Vec::new();
    }

    let y: ArrayVec<f64, 4> = curve
        .control_points()
        .iter()
        .map(|p| cross(&dir, &(p - origin)))
        .collect();
    if y.iter().all(|v| v.abs() <= TOLERANCE * len_sq) {
        // Curve lies along the line.
        return Vec::new();
    }

    let roots: ArrayVec<f64, 3> = match curve {
        Curve::Quad(_) => {
            solve_quadratic(y[0] - 2.0 * y[1] + y[2], 2.0 * (y[1] - y[0]), y[0])
                .into_iter()
                .collect()
        }
        Curve::Cubic(_) => solve_cubic(
            -y[0] + 3.0 * y[1] - 3.0 * y[2] + y[3],
            3.0 * y[0] - 6.0 * y[1] + 3.0 * y[2],
            3.0 * (y[1] - y[0]),
            y[0],
        ),
        Curve::Conic(c) => {
            let [qa, qb, qc] = c.line_distance_coeffs(&origin, &dir);
            solve_quadratic(qa, qb, qc).into_iter().collect()
        }
        Curve::Line(_) => ArrayVec::new(),
    };

    unit_interval_roots(roots, PARAM_EPSILON)
        .into_iter()
        .filter_map(|t2| {
            let point = curve.point(t2);
            let t1 = (point - origin).dot(&dir) / len_sq;
            (t1 >= -PARAM_EPSILON && t1 <= 1.0 + PARAM_EPSILON).then_some(Hit {
                t1: t1.clamp(0.0, 1.0),
                t2,
                point,
            })
        })
        .collect()
}

fn curve_curve(a: &Curve, b: &Curve) -> Vec<Hit> {
    let mut search = Subdivision {
        a,
        b,
        visits: 0,
        hits: Vec::new(),
    };
    search.run((0.0, 1.0), (0.0, 1.0), 0);
    if search.visits >= MAX_VISITS {
        debug!(visits = search.visits, "intersection search exhausted its budget");
    }
    search.hits
}

struct Subdivision<'a> {
    a: &'a Curve,
    b: &'a Curve,
    visits: u32,
    hits: Vec<Hit>,
}

impl Subdivision<'_> {
    fn run(&mut self, ra: (f64, f64), rb: (f64, f64), depth: u32) {
        if self.visits >= MAX_VISITS {
            return;
        }
        self.visits += 1;

        let pa = self.a.segment(ra.0, ra.1);
        let pb = self.b.segment(rb.0, rb.1);
        if !pa.bounds().intersects(&pb.bounds(), INTERSECTION_EPSILON) {
            return;
        }

        let flat_a = is_flat(&pa);
        let flat_b = is_flat(&pb);
        if (flat_a && flat_b) || depth >= MAX_INTERSECT_DEPTH {
            self.leaf(&pa, &pb, ra, rb);
            return;
        }
        for sa in halves(ra, flat_a) {
            for sb in halves(rb, flat_b) {
                self.run(sa, sb, depth + 1);
            }
        }
    }

    fn leaf(&mut self, pa: &Curve, pb: &Curve, ra: (f64, f64), rb: (f64, f64)) {
        let (a0, a1) = (pa.start_point(), pa.end_point());
        let (b0, b1) = (pb.start_point(), pb.end_point());
        let local = segment_segment_intersect_2d(&a0, &a1, &b0, &b1, PARAM_EPSILON)
            .map(|(_, s, u)| (s, u))
            .or_else(|| near_miss(&a0, &a1, &b0, &b1));
        let Some((s, u)) = local else {
            return;
        };

        let t1 = ra.0 + s * (ra.1 - ra.0);
        let t2 = rb.0 + u * (rb.1 - rb.0);
        let (t1, t2) = refine(self.a, self.b, t1, t2);
        let point = self.a.point(t1);
        if (point - self.b.point(t2)).norm() <= INTERSECTION_EPSILON {
            self.hits.push(Hit { t1, t2, point });
        }
    }
}

fn halves(range: (f64, f64), flat: bool) -> ArrayVec<(f64, f64), 2> {
    let mut out = ArrayVec::new();
    if flat {
        out.push(range);
    } else {
        let mid = 0.5 * (range.0 + range.1);
        out.push((range.0, mid));
        out.push((mid, range.1));
    }
    out
}

fn is_flat(c: &Curve) -> bool {
    let p = c.control_points();
    let (first, last) = (p[0], p[p.len() - 1]);
    max_segment_deviation(&p[1..p.len() - 1], &first, &last) <= FLATNESS
}

/// Closest approach of two chords that do not cross, if within
/// [`INTERSECTION_EPSILON`]. Returns chord parameters on both.
fn near_miss(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> Option<(f64, f64)> {
    let (u0, d0) = project_to_segment(a0, b0, b1);
    let (u1, d1) = project_to_segment(a1, b0, b1);
    let (s0, d2) = project_to_segment(b0, a0, a1);
    let (s1, d3) = project_to_segment(b1, a0, a1);
    [(0.0, u0, d0), (1.0, u1, d1), (s0, 0.0, d2), (s1, 1.0, d3)]
        .into_iter()
        .filter(|(_, _, d)| *d <= INTERSECTION_EPSILON)
        .min_by(|x, y| x.2.total_cmp(&y.2))
        .map(|(s, u, _)| (s, u))
}

/// Newton iterations on `A(t1) - B(t2) = 0`. Stops at tangential contacts,
/// where the system is singular.
fn refine(a: &Curve, b: &Curve, mut t1: f64, mut t2: f64) -> (f64, f64) {
    let mut residual = (a.point(t1) - b.point(t2)).norm();
    for _ in 0..4 {
        if residual < TOLERANCE * TOLERANCE {
            break;
        }
        let diff = a.point(t1) - b.point(t2);
        let da = a.derivative(t1);
        let db = b.derivative(t2);
        let det = cross(&db, &da);
        if det.abs() <= 1e-12 * da.norm() * db.norm() {
            break;
        }
        let step1 = cross(&db, &diff) / det;
        let step2 = cross(&da, &diff) / det;
        let (n1, n2) = ((t1 - step1).clamp(0.0, 1.0), (t2 - step2).clamp(0.0, 1.0));
        let next = (a.point(n1) - b.point(n2)).norm();
        if next.is_nan() || next >= residual {
            break;
        }
        (t1, t2, residual) = (n1, n2, next);
    }
    (t1, t2)
}

/// Collapses hits describing the same contact, keeping the most accurate.
///
/// Hits are the same contact when their points coincide, or when they are
/// close in progress and the curves stay together between them, as along a
/// tangential contact. Separate crossings of a large curve can be close in
/// progress while the curves part in between.
fn merge(a: &Curve, b: &Curve, mut hits: Vec<Hit>) -> Vec<Hit> {
    hits.sort_by(|x, y| x.t1.total_cmp(&y.t1));
    let residual = |h: &Hit| (a.point(h.t1) - b.point(h.t2)).norm();
    let touching_between = |x: &Hit, y: &Hit| {
        let mid = Hit {
            t1: 0.5 * (x.t1 + y.t1),
            t2: 0.5 * (x.t2 + y.t2),
            point: x.point,
        };
        residual(&mid) <= INTERSECTION_EPSILON
    };
    let mut out: Vec<Hit> = Vec::with_capacity(hits.len());
    for hit in hits {
        let same = out.iter().position(|kept| {
            (kept.point - hit.point).norm() <= INTERSECTION_EPSILON
                || ((kept.t1 - hit.t1).abs() <= MERGE_PROGRESS
                    && (kept.t2 - hit.t2).abs() <= MERGE_PROGRESS
                    && touching_between(kept, &hit))
        });
        match same {
            Some(i) => {
                if residual(&hit) < residual(&out[i]) {
                    out[i] = hit;
                }
            }
            None => out.push(hit),
        }
    }
    out
}
