//! Closed-form polynomial root solvers.
//!
//! All solvers return real roots only, sorted ascending, with near-duplicate
//! roots merged so that a double root is reported once.

use std::f64::consts::PI;

use arrayvec::ArrayVec;

/// Roots closer than this are merged.
const ROOT_MERGE: f64 = 1e-9;

/// Solves `a·t² + b·t + c = 0`.
#[must_use]
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> ArrayVec<f64, 2> {
    let mut roots = ArrayVec::new();
    let scale = b.abs().max(c.abs());
    if a.abs() <= 1e-12 * scale || a == 0.0 {
        // Degenerate: linear equation.
        if b.abs() > 1e-300 {
            roots.push(-c / b);
        }
        return roots;
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        if disc > -1e-12 * b * b {
            roots.push(-b / (2.0 * a));
        }
        return roots;
    }

    let sq = disc.sqrt();
    let q = -0.5 * (b + b.signum() * sq);
    if q == 0.0 {
        // b and disc are both zero: double root at 0.
        roots.push(0.0);
        return roots;
    }
    let mut r0 = q / a;
    let mut r1 = c / q;
    if r0 > r1 {
        std::mem::swap(&mut r0, &mut r1);
    }
    roots.push(r0);
    if (r1 - r0).abs() > ROOT_MERGE {
        roots.push(r1);
    }
    roots
}

/// Solves `a·t³ + b·t² + c·t + d = 0`.
#[must_use]
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> ArrayVec<f64, 3> {
    let scale = b.abs().max(c.abs()).max(d.abs());
    if a.abs() <= 1e-12 * scale || a == 0.0 {
        return solve_quadratic(b, c, d).into_iter().collect();
    }

    let bn = b / a;
    let cn = c / a;
    let dn = d / a;

    // Depressed cubic x³ + p·x + q with t = x - bn/3.
    let shift = bn / 3.0;
    let p = cn - bn * shift;
    let q = 2.0 * shift * shift * shift - shift * cn + dn;
    let disc = (q * 0.5).powi(2) + (p / 3.0).powi(3);

    let mut candidates: ArrayVec<f64, 3> = ArrayVec::new();
    if p.abs() < 1e-14 && q.abs() < 1e-14 {
        candidates.push(-shift);
    } else if disc.abs() < 1e-14 * (p.abs().powi(3) + q * q).max(1e-300) {
        // One simple and one double root.
        candidates.push(3.0 * q / p - shift);
        candidates.push(-1.5 * q / p - shift);
    } else if disc > 0.0 {
        let sq = disc.sqrt();
        let u = (-q * 0.5 + sq).cbrt();
        let v = (-q * 0.5 - sq).cbrt();
        candidates.push(u + v - shift);
    } else {
        let r = (-p / 3.0).sqrt();
        let cos_phi = ((3.0 * q) / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
        let phi = cos_phi.acos();
        for k in 0..3 {
            let k = f64::from(k);
            candidates.push(2.0 * r * ((phi - 2.0 * PI * k) / 3.0).cos() - shift);
        }
    }

    let mut roots: ArrayVec<f64, 3> = candidates
        .into_iter()
        .map(|t| polish_cubic(a, b, c, d, t))
        .filter(|t| t.is_finite())
        .collect();
    roots.sort_by(f64::total_cmp);
    dedup_sorted(&mut roots);
    roots
}

/// Two bounded Newton steps on the original cubic.
fn polish_cubic(a: f64, b: f64, c: f64, d: f64, mut t: f64) -> f64 {
    for _ in 0..2 {
        let f = ((a * t + b) * t + c) * t + d;
        let df = (3.0 * a * t + 2.0 * b) * t + c;
        if df.abs() < 1e-300 {
            break;
        }
        let next = t - f / df;
        if !next.is_finite() {
            break;
        }
        t = next;
    }
    t
}

fn dedup_sorted<const N: usize>(roots: &mut ArrayVec<f64, N>) {
    let mut i = 1;
    while i < roots.len() {
        if (roots[i] - roots[i - 1]).abs() <= ROOT_MERGE {
            roots.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Keeps the roots that fall in `[0, 1]` (widened by `eps`), clamped into range.
#[must_use]
pub fn unit_interval_roots<const N: usize>(roots: ArrayVec<f64, N>, eps: f64) -> ArrayVec<f64, N> {
    let mut out: ArrayVec<f64, N> = roots
        .into_iter()
        .filter(|t| *t >= -eps && *t <= 1.0 + eps)
        .map(|t| t.clamp(0.0, 1.0))
        .collect();
    dedup_sorted(&mut out);
    out
}

/// Keeps the roots strictly inside `(0, 1)`, away from the ends by `margin`.
#[must_use]
pub fn interior_roots<const N: usize>(roots: ArrayVec<f64, N>, margin: f64) -> ArrayVec<f64, N> {
    roots
        .into_iter()
        .filter(|t| *t > margin && *t < 1.0 - margin)
        .collect()
}
