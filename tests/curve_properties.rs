#![allow(clippy::unwrap_used)]

use std::ops::ControlFlow;

use approx::assert_relative_eq;
use pathcurve::curve::LineReason;
use pathcurve::math::Point2;
use pathcurve::{intersect, Curve, ForeachFlags, PathBuilder, PathOperation};

fn init_tracing() {
    // Default: WARN for everything, INFO for pathcurve. Override with RUST_LOG.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("pathcurve=info".parse().unwrap_or_default());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

fn p(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}

fn all_kinds() -> Vec<Curve> {
    vec![
        Curve::line(p(0.0, 0.0), p(10.0, 0.0)),
        Curve::quad(p(0.0, 0.0), p(5.0, 10.0), p(10.0, 0.0)),
        Curve::cubic(p(0.0, 0.0), p(2.0, 8.0), p(9.0, -6.0), p(10.0, 3.0)),
        "M 1 0 O 1 1 0 1 0.7071067811865476".parse().unwrap(),
        "M -2 0 O 0 3 2 0 2.5".parse().unwrap(),
    ]
}

#[test]
fn endpoints_are_exact() {
    init_tracing();
    for c in all_kinds() {
        assert_eq!(c.point(0.0), c.start_point(), "{c}");
        assert_eq!(c.point(1.0), c.end_point(), "{c}");
        assert_eq!(c.segment(0.0, 1.0).control_points(), c.control_points());
        assert_eq!(c.reverse().reverse(), c);
    }
}

#[test]
fn split_preserves_kind_and_meets() {
    init_tracing();
    for c in all_kinds() {
        for t in [0.05, 0.5, 0.93] {
            let (a, b) = c.split(t);
            assert_eq!(a.op(), c.op());
            assert_eq!(b.op(), c.op());
            assert_eq!(a.point(1.0), b.point(0.0));
            assert_relative_eq!(a.point(1.0), c.point(t), epsilon = 1e-9);
            if let (Some(wa), Some(wb)) = (a.weight(), b.weight()) {
                assert!(wa.is_finite() && wa > 0.0);
                assert!(wb.is_finite() && wb > 0.0);
            }
        }
    }
}

#[test]
fn intersection_is_symmetric() {
    init_tracing();
    let curves = all_kinds();
    for a in &curves {
        for b in &curves {
            if a == b {
                continue;
            }
            let forward = intersect(a, b, 9);
            let backward = intersect(b, a, 9);
            assert_eq!(forward.len(), backward.len(), "{a} x {b}");
            for hit in &forward {
                assert!(
                    backward
                        .iter()
                        .any(|r| r.t1 == hit.t2 && r.t2 == hit.t1 && r.kind == hit.kind),
                    "{a} x {b}: {hit:?}"
                );
            }
        }
    }
}

#[test]
fn decomposition_stays_within_tolerance() {
    init_tracing();
    let tolerance = 0.01;
    for c in all_kinds() {
        let mut pieces = 0;
        let flow = c.decompose(tolerance, |line| {
            pieces += 1;
            for i in 1..4 {
                let f = f64::from(i) / 4.0;
                let t = line.from_progress + f * (line.to_progress - line.from_progress);
                let q = c.point(t);
                let dir = line.to - line.from;
                let len = dir.norm();
                let d = if len == 0.0 {
                    (q - line.from).norm()
                } else {
                    let s = ((q - line.from).dot(&dir) / (len * len)).clamp(0.0, 1.0);
                    (q - (line.from + dir * s)).norm()
                };
                assert!(d <= tolerance + 1e-12, "{c}: d={d}");
            }
            ControlFlow::Continue(())
        });
        assert!(flow.is_continue());
        assert!(pieces >= 1);
    }
}

#[test]
fn tiny_tolerance_terminates() {
    init_tracing();
    for c in all_kinds() {
        assert!(!c.lines(1e-14).is_empty());
    }
}

#[test]
fn line_scenario() {
    init_tracing();
    let c = Curve::line(p(0.0, 0.0), p(10.0, 0.0));
    assert_eq!(c.point(0.5), p(5.0, 0.0));
    assert_eq!(c.tangent(0.5), pathcurve::math::Vector2::new(1.0, 0.0));
    let lines = c.lines(0.1);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].reason, LineReason::Straight);
}

#[test]
fn quad_scenario() {
    init_tracing();
    let c = Curve::quad(p(0.0, 0.0), p(5.0, 10.0), p(10.0, 0.0));
    assert_relative_eq!(c.point(0.5), p(5.0, 5.0), epsilon = 1e-12);
    let b = c.bounds();
    assert!(b.min.x <= 0.0 && b.min.y <= 0.0 && b.max.x >= 10.0 && b.max.y >= 10.0);
}

#[test]
fn conic_scenario() {
    init_tracing();
    let c: Curve = "M 1 0 O 1 1 0 1 0.7071067811865476".parse().unwrap();
    assert_relative_eq!(c.point(0.5).coords.norm(), 1.0, epsilon = 1e-12);
}

#[test]
fn path_round_trip_through_builder() {
    init_tracing();
    let text = "M 0 0 L 10 0 Q 10 10 0 10 C 1 2 3 4 5 6 O 1 1 0 1 0.5 Z";
    let ops = pathcurve::path::parse_path(text).unwrap();
    let mut builder = PathBuilder::new();
    for op in &ops {
        if matches!(op.op, PathOperation::Move | PathOperation::Close) {
            continue;
        }
        Curve::from_path_op(op).unwrap().to_builder(&mut builder);
    }
    builder.close();
    assert_eq!(builder.to_string(), text);
}

#[test]
fn decompose_curve_honours_flags() {
    init_tracing();
    for c in all_kinds() {
        let mut kinds = Vec::new();
        let _ = c.decompose_curve(ForeachFlags::ALLOW_QUAD, 0.01, |piece| {
            kinds.push(piece.op());
            ControlFlow::Continue(())
        });
        assert!(kinds
            .iter()
            .all(|k| matches!(k, PathOperation::Line | PathOperation::Quad)));
    }
}
