// Curve generator: one anchor → a fan of quadratic curves.
//
// Gamma drives the fan-out. |gamma| sets the line count (1–7) and the base
// line length (15–50% of the canvas diagonal), and signed gamma rotates
// every line's direction by up to ±180°. Lines are bucketed into
// `cluster_count` direction clusters spread evenly over a half turn, with
// a seeded jitter inside each cluster of at most ±`cluster_spread`/2.
//
// Delta drives curvature. The control point starts at the segment midpoint
// and is pushed along the perpendicular by 5–30% of the line length
// (|delta|), scaled by the curvature option and a per-line profile. The
// push direction follows sign(delta), flipped on a seeded coin toss.
//
// Per-line length and curvature profiles are drawn from small discrete sets
// so a single keyword yields a mix of short/long and flat/bent strokes;
// shorter strokes get proportionally more bend.
//
// Every draw is `seeded_random()` over a key built from the global seed, a
// stage tag and the relevant indices, so the output is a pure function of
// (seed, keywords, canvas, options). Every point is clamped where computed.
//
// See also: `connection.rs` which encodes these curves, `engine.rs` which
// calls `generate_curves()` once per anchor.

use std::f64::consts::PI;

use sfcm_prng::{seeded_random, unit_to_index};
use tracing::trace;

use crate::geometry::{Canvas, Point, unit_vector};
use crate::options::EngineOptions;
use crate::types::{Anchor, AxisVector, Curve, DirectionClusterDebug};

pub const MIN_LINES: usize = 1;
pub const MAX_LINES: usize = 7;

/// Base line length as a fraction of the canvas diagonal at |gamma| = 0.
const LENGTH_MIN_FRAC: f64 = 0.15;
/// Base line length as a fraction of the canvas diagonal at |gamma| = 100.
const LENGTH_MAX_FRAC: f64 = 0.50;
/// Total width of the length jitter band (±5%).
const LENGTH_JITTER: f64 = 0.1;

/// Radius of the start-point dispersion disk, fraction of the diagonal.
const DISPERSION_FRAC: f64 = 0.02;

const CURVATURE_MIN_FRAC: f64 = 0.05;
const CURVATURE_MAX_FRAC: f64 = 0.30;
/// Total width of the curvature jitter band (±20%).
const CURVATURE_JITTER: f64 = 0.4;

/// Per-line length multipliers.
pub const LENGTH_PROFILES: [f64; 5] = [0.5, 0.8, 1.0, 1.3, 1.8];
/// Per-line curvature multipliers, before the short-line boost.
pub const CURVATURE_PROFILES: [f64; 5] = [0.4, 0.75, 1.0, 1.5, 2.0];

/// The curves for one anchor plus their telemetry.
#[derive(Clone, Debug, Default)]
pub struct CurveSet {
    pub curves: Vec<Curve>,
    pub debug: Vec<DirectionClusterDebug>,
}

/// Per-keyword inputs shared by every line of the fan.
struct LineContext<'a> {
    seed: &'a str,
    keyword_index: usize,
    keyword: &'a str,
    canvas: &'a Canvas,
}

/// Number of lines emitted from an anchor: `1 + round(min(1, |gamma|/100) · 6)`.
pub fn line_count(gamma: f64) -> usize {
    let t = gamma_strength(gamma);
    let n = MIN_LINES + (t * (MAX_LINES - MIN_LINES) as f64).round() as usize;
    n.clamp(MIN_LINES, MAX_LINES)
}

/// |gamma| / 100 capped at 1; 0 for non-finite input.
fn gamma_strength(gamma: f64) -> f64 {
    if gamma.is_finite() {
        (gamma.abs() / 100.0).min(1.0)
    } else {
        0.0
    }
}

/// Direction of one line and how it was derived.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineDirection {
    pub cluster_index: usize,
    pub cluster_angle: f64,
    pub gamma_rotation: f64,
    pub jitter: f64,
    /// Degrees in [0, 180].
    pub final_direction: f64,
}

impl LineDirection {
    pub fn final_cluster_angle(&self) -> f64 {
        self.cluster_angle + self.gamma_rotation
    }
}

/// Cluster assignment for line `line`. Keyed on the seed and line index
/// only, so line i of every keyword lands in the same cluster.
pub fn cluster_index(seed: &str, line: usize, cluster_count: u32) -> usize {
    unit_to_index(
        seeded_random(&format!("{seed}:cluster:{line}")),
        cluster_count.max(1) as usize,
    )
}

/// Direction for line `line` of keyword `keyword_index`.
pub fn line_direction(
    seed: &str,
    keyword_index: usize,
    line: usize,
    gamma: f64,
    cluster_count: u32,
    cluster_spread: f64,
) -> LineDirection {
    let clusters = cluster_count.max(1);
    let cluster_index = cluster_index(seed, line, clusters);
    let cluster_angle = cluster_index as f64 / clusters as f64 * 180.0;
    let gamma_rotation = if gamma.is_finite() {
        gamma / 100.0 * 180.0
    } else {
        0.0
    };
    let jitter_unit = seeded_random(&format!("{seed}:cluster:jitter:{keyword_index}:{line}"));
    let jitter = (jitter_unit - 0.5) * cluster_spread;

    let raw = cluster_angle + gamma_rotation + jitter;
    let final_direction = if raw.is_finite() {
        raw.rem_euclid(180.0).clamp(0.0, 180.0)
    } else {
        0.0
    };

    LineDirection {
        cluster_index,
        cluster_angle,
        gamma_rotation,
        jitter,
        final_direction,
    }
}

/// Start point for a line. Line 0 starts exactly at the anchor; later
/// lines start at a point sampled uniformly by area from a disk around it.
///
/// Degenerate inputs (non-finite anchor or radius) return the anchor
/// unchanged.
pub fn disperse_start(
    anchor: Point,
    seed: &str,
    keyword_index: usize,
    line: usize,
    canvas: &Canvas,
) -> Point {
    if line == 0 || !anchor.is_finite() {
        return anchor;
    }
    let radius_max = canvas.diagonal() * DISPERSION_FRAC;
    if !radius_max.is_finite() || radius_max <= 0.0 {
        return anchor;
    }

    let angle_key = format!("{seed}:dispersion:angle:{keyword_index}:{line}");
    let radius_key = format!("{seed}:dispersion:radius:{keyword_index}:{line}");
    let angle = seeded_random(&angle_key) * 2.0 * PI;
    let radius = radius_max * seeded_random(&radius_key).sqrt();

    let dispersed = canvas.clamp_xy(
        anchor.x + angle.cos() * radius,
        anchor.y + angle.sin() * radius,
    );
    if dispersed.is_finite() {
        dispersed
    } else {
        anchor
    }
}

/// Draw a length profile multiplier for a line.
pub fn length_profile(seed: &str, keyword: &str, line: usize, cluster: usize) -> f64 {
    let u = seeded_random(&format!("{seed}:profile:length:{keyword}:{line}:{cluster}"));
    LENGTH_PROFILES[unit_to_index(u, LENGTH_PROFILES.len())]
}

/// Draw a curvature profile multiplier for a line, already boosted for
/// short lines by `1 + (1 - length_profile) / 2`.
pub fn curvature_profile(
    seed: &str,
    keyword: &str,
    line: usize,
    cluster: usize,
    length_profile: f64,
) -> f64 {
    let u = seeded_random(&format!("{seed}:profile:curvature:{keyword}:{line}:{cluster}"));
    let base = CURVATURE_PROFILES[unit_to_index(u, CURVATURE_PROFILES.len())];
    base * (1.0 + (1.0 - length_profile) * 0.5)
}

/// Line length in pixels before the endpoint is clamped.
pub fn line_length(
    gamma: f64,
    canvas: &Canvas,
    seed: &str,
    keyword_index: usize,
    line: usize,
    length_scale: f64,
    length_profile: f64,
) -> f64 {
    let t = gamma_strength(gamma);
    let frac = LENGTH_MIN_FRAC + t * (LENGTH_MAX_FRAC - LENGTH_MIN_FRAC);
    let key = format!("{seed}:length:{keyword_index}:{line}");
    let variation = (seeded_random(&key) - 0.5) * LENGTH_JITTER;
    canvas.diagonal() * frac * (1.0 + variation) * length_scale * length_profile
}

/// Control point for the segment `start`–`end`, clamped to the canvas.
fn bend_control(
    ctx: &LineContext<'_>,
    line: usize,
    delta: f64,
    start: Point,
    end: Point,
    curvature_scale: f64,
    curvature_profile: f64,
) -> Point {
    let mid = start.midpoint(end);
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let len = dx.hypot(dy);
    let Some((ux, uy)) = unit_vector(dx, dy) else {
        return ctx.canvas.clamp(mid);
    };
    let (perp_x, perp_y) = (-uy, ux);

    let d = if delta.is_finite() {
        (delta.abs() / 100.0).min(1.0)
    } else {
        0.0
    };
    let base_frac = CURVATURE_MIN_FRAC + d * (CURVATURE_MAX_FRAC - CURVATURE_MIN_FRAC);
    let seed = ctx.seed;
    let k = ctx.keyword_index;
    let jitter = (seeded_random(&format!("{seed}:delta:curv:{k}:{line}")) - 0.5) * CURVATURE_JITTER;
    let curv_frac = base_frac * (1.0 + jitter);

    let magnitude = len * curv_frac * curvature_scale * curvature_profile;

    let delta_sign = if delta >= 0.0 { 1.0 } else { -1.0 };
    let sign = if seeded_random(&format!("{seed}:delta:dir:{k}:{line}")) < 0.5 {
        delta_sign
    } else {
        -delta_sign
    };

    let control = Point::new(
        mid.x + perp_x * magnitude * sign,
        mid.y + perp_y * magnitude * sign,
    );
    if control.is_finite() {
        ctx.canvas.clamp(control)
    } else {
        ctx.canvas.clamp(mid)
    }
}

/// Generate every curve for one anchor.
pub fn generate_curves(
    anchor: &Anchor,
    axes: &AxisVector,
    seed: &str,
    canvas: &Canvas,
    options: &EngineOptions,
) -> CurveSet {
    let ctx = LineContext {
        seed,
        keyword_index: anchor.keyword_index,
        keyword: &anchor.keyword,
        canvas,
    };
    let count = line_count(axes.gamma);
    let mut set = CurveSet {
        curves: Vec::with_capacity(count),
        debug: Vec::with_capacity(count),
    };

    for line in 0..count {
        let dir = line_direction(
            seed,
            ctx.keyword_index,
            line,
            axes.gamma,
            options.cluster_count,
            options.cluster_spread,
        );
        let start = disperse_start(anchor.point, seed, ctx.keyword_index, line, canvas);

        let len_profile = length_profile(seed, ctx.keyword, line, dir.cluster_index);
        let curv_profile =
            curvature_profile(seed, ctx.keyword, line, dir.cluster_index, len_profile);

        let length = line_length(
            axes.gamma,
            canvas,
            seed,
            ctx.keyword_index,
            line,
            options.length_scale,
            len_profile,
        );
        let angle = dir.final_direction.to_radians();
        let end = canvas.clamp_xy(
            start.x + angle.cos() * length,
            start.y + angle.sin() * length,
        );
        let end = if end.is_finite() { end } else { start };

        let control = bend_control(
            &ctx,
            line,
            axes.delta,
            start,
            end,
            options.curvature_scale,
            curv_profile,
        );

        trace!(
            keyword = ctx.keyword_index,
            line,
            cluster = dir.cluster_index,
            direction = dir.final_direction,
            length,
            "generated line"
        );

        set.curves.push(Curve {
            start,
            control,
            end,
            keyword_index: ctx.keyword_index,
            quadrant: anchor.quadrant,
        });
        set.debug.push(DirectionClusterDebug {
            keyword_index: ctx.keyword_index,
            line_index: line,
            cluster_index: dir.cluster_index,
            cluster_angle: dir.cluster_angle,
            gamma_rotation: dir.gamma_rotation,
            final_cluster_angle: dir.final_cluster_angle(),
            in_cluster_jitter: dir.jitter,
            final_direction: dir.final_direction,
            start_point: start,
            length_profile: len_profile,
            curvature_profile: curv_profile,
        });
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Quadrant;

    const CANVAS: Canvas = Canvas::new(1080.0, 1080.0);

    fn anchor_at(x: f64, y: f64) -> Anchor {
        Anchor {
            keyword_index: 0,
            keyword: "test".into(),
            point: Point::new(x, y),
            normalized: Point::new(x / CANVAS.width, y / CANVAS.height),
            quadrant: Quadrant::BottomRight,
        }
    }

    fn axes(gamma: f64, delta: f64) -> AxisVector {
        AxisVector {
            alfa: 0.0,
            beta: 0.0,
            gamma,
            delta,
        }
    }

    #[test]
    fn line_count_endpoints() {
        assert_eq!(line_count(0.0), 1);
        assert_eq!(line_count(100.0), 7);
        assert_eq!(line_count(-100.0), 7);
        assert_eq!(line_count(50.0), 4);
        assert_eq!(line_count(250.0), 7);
        assert_eq!(line_count(f64::NAN), 1);
    }

    #[test]
    fn line_count_monotonic_in_abs_gamma() {
        let mut prev = 0;
        for g in 0..=100 {
            let n = line_count(g as f64);
            assert!(n >= prev, "line_count decreased at gamma={g}");
            assert_eq!(n, line_count(-(g as f64)));
            prev = n;
        }
    }

    #[test]
    fn directions_stay_in_half_turn() {
        for line in 0..7 {
            for gamma in [-100.0, -37.0, 0.0, 64.0, 100.0] {
                let d = line_direction("42", 1, line, gamma, 5, 60.0);
                assert!((0.0..=180.0).contains(&d.final_direction), "{d:?}");
                assert!(d.cluster_index < 5);
                assert!(d.jitter.abs() <= 30.0);
            }
        }
    }

    #[test]
    fn cluster_angle_follows_index() {
        let d = line_direction("seed", 0, 2, 0.0, 4, 10.0);
        assert_eq!(d.cluster_angle, d.cluster_index as f64 * 45.0);
        assert_eq!(d.gamma_rotation, 0.0);
    }

    #[test]
    fn first_line_starts_at_anchor() {
        let p = Point::new(300.0, 400.0);
        assert_eq!(disperse_start(p, "42", 0, 0, &CANVAS), p);
    }

    #[test]
    fn dispersion_stays_within_radius() {
        let p = Point::new(540.0, 540.0);
        let radius = CANVAS.diagonal() * DISPERSION_FRAC;
        for line in 1..7 {
            let s = disperse_start(p, "42", 2, line, &CANVAS);
            assert!(s.distance(p) <= radius + 1e-9);
        }
    }

    #[test]
    fn dispersion_degrades_to_anchor() {
        let p = Point::new(10.0, 10.0);
        let bad = Canvas::new(f64::INFINITY, 100.0);
        assert_eq!(disperse_start(p, "42", 0, 3, &bad), p);
        let nan = Point::new(f64::NAN, 1.0);
        let s = disperse_start(nan, "42", 0, 3, &CANVAS);
        assert!(s.x.is_nan());
    }

    #[test]
    fn profiles_come_from_sets() {
        for line in 0..7 {
            let lp = length_profile("42", "caos", line, line % 3);
            assert!(LENGTH_PROFILES.contains(&lp));
            let cp = curvature_profile("42", "caos", line, line % 3, lp);
            let base = cp / (1.0 + (1.0 - lp) * 0.5);
            assert!(CURVATURE_PROFILES.iter().any(|v| (v - base).abs() < 1e-12));
        }
    }

    #[test]
    fn length_band() {
        let diag = CANVAS.diagonal();
        let short = line_length(0.0, &CANVAS, "42", 0, 0, 1.0, 1.0);
        assert!(short >= diag * 0.15 * 0.95 && short <= diag * 0.15 * 1.05);
        let long = line_length(100.0, &CANVAS, "42", 0, 0, 1.0, 1.0);
        assert!(long >= diag * 0.50 * 0.95 && long <= diag * 0.50 * 1.05);
        let scaled = line_length(100.0, &CANVAS, "42", 0, 0, 1.3, 1.8);
        assert!((scaled - long * 1.3 * 1.8).abs() < 1e-6);
    }

    #[test]
    fn generated_points_stay_on_canvas() {
        let opts = EngineOptions {
            length_scale: 1.3,
            curvature_scale: 1.7,
            ..Default::default()
        };
        for (x, y) in [(0.0, 0.0), (1080.0, 1080.0), (540.0, 10.0), (1075.0, 500.0)] {
            let set = generate_curves(&anchor_at(x, y), &axes(100.0, -100.0), "s", &CANVAS, &opts);
            assert_eq!(set.curves.len(), 7);
            for c in &set.curves {
                assert!(CANVAS.contains(c.start));
                assert!(CANVAS.contains(c.control));
                assert!(CANVAS.contains(c.end));
            }
        }
    }

    #[test]
    fn debug_matches_curves() {
        let set = generate_curves(
            &anchor_at(300.0, 300.0),
            &axes(-60.0, 20.0),
            "abc",
            &CANVAS,
            &EngineOptions::default(),
        );
        assert_eq!(set.curves.len(), line_count(-60.0));
        assert_eq!(set.debug.len(), set.curves.len());
        for (i, (c, d)) in set.curves.iter().zip(&set.debug).enumerate() {
            assert_eq!(d.line_index, i);
            assert_eq!(d.start_point, c.start);
        }
        assert_eq!(set.curves[0].start, Point::new(300.0, 300.0));
    }

    #[test]
    fn generation_is_deterministic() {
        let opts = EngineOptions::default();
        let anchor = anchor_at(200.0, 700.0);
        let a = generate_curves(&anchor, &axes(80.0, 55.0), "x", &CANVAS, &opts);
        let b = generate_curves(&anchor, &axes(80.0, 55.0), "x", &CANVAS, &opts);
        assert_eq!(a.curves, b.curves);
        assert_eq!(a.debug, b.debug);
    }
}
