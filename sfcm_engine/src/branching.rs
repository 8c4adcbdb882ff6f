// Branching stage: spawn short secondary segments where lines cross.
//
// 1. Every connection is flattened to a polyline: straight ones to their two
//    endpoints, curved ones to 12 segments of their quadratic.
// 2. All pairs of polylines are tested segment-by-segment. Hits are grouped
//    by their position rounded to whole pixels, and a group is kept only if
//    it touches at least two distinct connections. Groups keep first-seen
//    order.
// 3. The groups are shuffled with a seeded Fisher–Yates pass and the first
//    `MAX_PROCESSED_INTERSECTIONS` are processed.
// 4. Each processed intersection emits one or two branches heading roughly
//    along the average direction of the lines that cross there, with seeded
//    length, angular jitter, curvature and dash style.
//
// The detection pass is O(n² · 144) over the mirrored set; with at most 140
// connections that stays well under a millisecond.
//
// Branches are appended after the input connections and carry
// `generation_depth = BRANCH_DEPTH` and the index of the processed
// intersection they came from.

use rustc_hash::FxHashMap;
use sfcm_prng::{SeededRng, seeded_random};
use smallvec::SmallVec;
use tracing::debug;

use crate::connection::control_point;
use crate::geometry::{Canvas, Point, quadratic_point, unit_vector};
use crate::types::{BRANCH_DEPTH, Connection, Intersection, SemanticInfluence};

/// Segments per curved connection when flattening.
pub const CURVE_SAMPLES: usize = 12;
/// Upper bound on intersections that spawn branches.
pub const MAX_PROCESSED_INTERSECTIONS: usize = 30;

const BRANCH_LENGTH_MIN_FRAC: f64 = 0.06;
const BRANCH_LENGTH_RANGE_FRAC: f64 = 0.06;
/// Total width of the angular jitter band, radians (±60°).
const BRANCH_ANGLE_JITTER: f64 = 2.0 * std::f64::consts::PI / 3.0;
/// Total width of the curvature band (±0.35).
const BRANCH_CURVATURE_RANGE: f64 = 0.7;
/// |curvature| at or below this draws as a straight segment.
const BRANCH_CURVED_THRESHOLD: f64 = 0.08;
const BRANCH_DASHED_CHANCE: f64 = 0.35;

/// Parallel-segment cutoff for the intersection denominator.
const PARALLEL_EPSILON: f64 = 1e-10;

/// Flatten a connection into canvas-space points.
pub fn polyline(conn: &Connection, canvas: &Canvas) -> Vec<Point> {
    if !conn.curved {
        return vec![conn.from, conn.to];
    }
    let control = control_point(conn, canvas);
    (0..=CURVE_SAMPLES)
        .map(|i| {
            let t = i as f64 / CURVE_SAMPLES as f64;
            quadratic_point(t, conn.from, control, conn.to)
        })
        .collect()
}

/// Intersection of segments `p1`–`p2` and `p3`–`p4`, if any. Endpoints
/// count as touching.
pub fn segment_intersection(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<Point> {
    let denom = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = ((p1.x - p3.x) * (p3.y - p4.y) - (p1.y - p3.y) * (p3.x - p4.x)) / denom;
    let u = -((p1.x - p2.x) * (p1.y - p3.y) - (p1.y - p2.y) * (p1.x - p3.x)) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Point::new(p1.x + t * (p2.x - p1.x), p1.y + t * (p2.y - p1.y)))
    } else {
        None
    }
}

/// Find every pixel-rounded point where two or more connections cross.
pub fn detect_intersections(connections: &[Connection], canvas: &Canvas) -> Vec<Intersection> {
    let polylines: Vec<Vec<Point>> = connections.iter().map(|c| polyline(c, canvas)).collect();

    // Pixel key → slot in `groups`, so groups keep first-seen order.
    let mut slots: FxHashMap<(i64, i64), usize> = FxHashMap::default();
    let mut groups: Vec<((i64, i64), SmallVec<[usize; 4]>)> = Vec::new();

    for (i, a) in polylines.iter().enumerate() {
        for (j, b) in polylines.iter().enumerate().skip(i + 1) {
            for sa in a.windows(2) {
                for sb in b.windows(2) {
                    let Some(hit) = segment_intersection(sa[0], sa[1], sb[0], sb[1]) else {
                        continue;
                    };
                    if !hit.is_finite() {
                        continue;
                    }
                    let key = (hit.x.round() as i64, hit.y.round() as i64);
                    let slot = *slots.entry(key).or_insert_with(|| {
                        groups.push((key, SmallVec::new()));
                        groups.len() - 1
                    });
                    let members = &mut groups[slot].1;
                    for idx in [i, j] {
                        if !members.contains(&idx) {
                            members.push(idx);
                        }
                    }
                }
            }
        }
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|((x, y), mut members)| {
            members.sort_unstable();
            Intersection {
                point: Point::new(x as f64, y as f64),
                from_indices: members,
            }
        })
        .collect()
}

/// Unit vector of the summed unit directions of `indices`. Falls back to
/// +x when the sum cancels out or every connection is degenerate.
pub fn average_direction(connections: &[Connection], indices: &[usize]) -> (f64, f64) {
    let (sx, sy) = indices
        .iter()
        .filter_map(|&i| connections.get(i))
        .filter_map(|c| unit_vector(c.to.x - c.from.x, c.to.y - c.from.y))
        .fold((0.0, 0.0), |(sx, sy), (ux, uy)| (sx + ux, sy + uy));
    unit_vector(sx, sy).unwrap_or((1.0, 0.0))
}

/// Seeded in-place Fisher–Yates shuffle.
fn shuffle<T>(items: &mut [T], seed: &str) {
    for i in (1..items.len()).rev() {
        let mut rng = SeededRng::from_key(&format!("{seed}:branching:intersection:shuffle:{i}"));
        let j = rng.range_u64(0, i as u64 + 1) as usize;
        items.swap(i, j);
    }
}

/// Branches spawned at one processed intersection.
fn spawn_branches(
    connections: &[Connection],
    intersection: &Intersection,
    processed_index: usize,
    seed: &str,
    canvas: &Canvas,
) -> Vec<Connection> {
    let i = processed_index;
    let origin = canvas.clamp(intersection.point);
    let (dx, dy) = average_direction(connections, &intersection.from_indices);
    let base_angle = dy.atan2(dx);
    let diag = canvas.diagonal();

    let count = (seeded_random(&format!("{seed}:branching:count:{i}")) * 2.0)
        .round()
        .max(1.0) as usize;

    (0..count)
        .map(|b| {
            let length_unit = seeded_random(&format!("{seed}:branching:length:{i}:{b}"));
            let length = diag * (BRANCH_LENGTH_MIN_FRAC + length_unit * BRANCH_LENGTH_RANGE_FRAC);

            let jitter_unit = seeded_random(&format!("{seed}:branching:angle:{i}:{b}"));
            let angle = base_angle + (jitter_unit - 0.5) * BRANCH_ANGLE_JITTER;
            let to = canvas.clamp_xy(
                origin.x + angle.cos() * length,
                origin.y + angle.sin() * length,
            );

            let curvature_unit = seeded_random(&format!("{seed}:branching:curvature:{i}:{b}"));
            let curvature = (curvature_unit - 0.5) * BRANCH_CURVATURE_RANGE;
            let dashed = SeededRng::from_key(&format!("{seed}:branching:dashed:{i}:{b}"))
                .random_bool(BRANCH_DASHED_CHANCE);

            Connection {
                from: origin,
                to,
                curved: curvature.abs() > BRANCH_CURVED_THRESHOLD,
                curvature,
                dashed,
                semantic_influence: SemanticInfluence::default(),
                generation_depth: BRANCH_DEPTH,
                generated_from: Some(i),
            }
        })
        .collect()
}

/// Result of the branching stage.
#[derive(Clone, Debug, Default)]
pub struct BranchOutcome {
    /// Input connections followed by every spawned branch.
    pub connections: Vec<Connection>,
    /// Intersections found before the processing cap.
    pub intersections_detected: usize,
}

/// Detect intersections and append branches.
pub fn apply_branching(connections: Vec<Connection>, seed: &str, canvas: &Canvas) -> BranchOutcome {
    if connections.is_empty() {
        return BranchOutcome::default();
    }

    let mut intersections = detect_intersections(&connections, canvas);
    let detected = intersections.len();
    if detected == 0 {
        return BranchOutcome {
            connections,
            intersections_detected: 0,
        };
    }

    shuffle(&mut intersections, seed);
    let processed = detected.min(MAX_PROCESSED_INTERSECTIONS);

    let branches: Vec<Connection> = intersections[..processed]
        .iter()
        .enumerate()
        .flat_map(|(i, hit)| spawn_branches(&connections, hit, i, seed, canvas))
        .collect();
    debug!(detected, processed, branches = branches.len(), "branching");

    let mut out = connections;
    out.extend(branches);
    BranchOutcome {
        connections: out,
        intersections_detected: detected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PRIMARY_DEPTH;

    const CANVAS: Canvas = Canvas::new(1000.0, 1000.0);

    fn straight(from: (f64, f64), to: (f64, f64)) -> Connection {
        Connection {
            from: Point::new(from.0, from.1),
            to: Point::new(to.0, to.1),
            curved: false,
            curvature: 0.0,
            dashed: false,
            semantic_influence: SemanticInfluence::default(),
            generation_depth: PRIMARY_DEPTH,
            generated_from: None,
        }
    }

    #[test]
    fn crossing_segments_intersect() {
        let hit = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        )
        .unwrap();
        assert!((hit.x - 5.0).abs() < 1e-12 && (hit.y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn parallel_and_disjoint_segments_do_not() {
        let a = (Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let above = (Point::new(0.0, 5.0), Point::new(10.0, 5.0));
        let beyond = (Point::new(20.0, -5.0), Point::new(20.0, 5.0));
        assert!(segment_intersection(a.0, a.1, above.0, above.1).is_none());
        assert!(segment_intersection(a.0, a.1, beyond.0, beyond.1).is_none());
    }

    #[test]
    fn curved_polyline_has_thirteen_points() {
        let mut c = straight((100.0, 100.0), (500.0, 100.0));
        assert_eq!(polyline(&c, &CANVAS).len(), 2);
        c.curved = true;
        c.curvature = 0.3;
        let pts = polyline(&c, &CANVAS);
        assert_eq!(pts.len(), CURVE_SAMPLES + 1);
        assert_eq!(pts[0], c.from);
        assert_eq!(pts[CURVE_SAMPLES], c.to);
    }

    #[test]
    fn detects_single_cross() {
        let conns = vec![
            straight((100.0, 100.0), (900.0, 900.0)),
            straight((100.0, 900.0), (900.0, 100.0)),
            straight((100.0, 50.0), (900.0, 50.0)),
        ];
        let hits = detect_intersections(&conns, &CANVAS);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].point, Point::new(500.0, 500.0));
        assert_eq!(hits[0].from_indices.as_slice(), &[0, 1]);
    }

    #[test]
    fn three_lines_through_one_pixel_group() {
        let conns = vec![
            straight((0.0, 500.0), (1000.0, 500.0)),
            straight((500.0, 0.0), (500.0, 1000.0)),
            straight((0.0, 0.0), (1000.0, 1000.0)),
        ];
        let hits = detect_intersections(&conns, &CANVAS);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].from_indices.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn average_direction_fallback() {
        let conns = vec![
            straight((0.0, 0.0), (10.0, 0.0)),
            straight((10.0, 0.0), (0.0, 0.0)),
        ];
        assert_eq!(average_direction(&conns, &[0, 1]), (1.0, 0.0));
        let (x, y) = average_direction(&conns, &[0]);
        assert!((x - 1.0).abs() < 1e-12 && y.abs() < 1e-12);
    }

    #[test]
    fn no_intersections_is_identity() {
        let conns = vec![straight((0.0, 0.0), (10.0, 0.0))];
        let out = apply_branching(conns.clone(), "42", &CANVAS);
        assert_eq!(out.connections, conns);
        assert_eq!(out.intersections_detected, 0);
    }

    #[test]
    fn branches_follow_contract() {
        let conns = vec![
            straight((100.0, 100.0), (900.0, 900.0)),
            straight((100.0, 900.0), (900.0, 100.0)),
        ];
        let out = apply_branching(conns, "42", &CANVAS);
        assert_eq!(out.intersections_detected, 1);
        let branches: Vec<_> = out
            .connections
            .iter()
            .filter(|c| c.generation_depth == BRANCH_DEPTH)
            .collect();
        assert!((1..=2).contains(&branches.len()));
        let diag = CANVAS.diagonal();
        for b in branches {
            assert_eq!(b.from, Point::new(500.0, 500.0));
            assert_eq!(b.generated_from, Some(0));
            assert!(b.curvature.abs() <= 0.35);
            assert_eq!(b.curved, b.curvature.abs() > BRANCH_CURVED_THRESHOLD);
            assert!(CANVAS.contains(b.to));
            assert!(b.from.distance(b.to) <= diag * 0.12 + 1e-9);
        }
    }

    #[test]
    fn branch_cap_holds_on_a_grid() {
        // 12 horizontal × 12 vertical lines → 144 crossings.
        let mut conns = Vec::new();
        for k in 0..12 {
            let v = 50.0 + k as f64 * 80.0;
            conns.push(straight((0.0, v), (1000.0, v)));
            conns.push(straight((v, 0.0), (v, 1000.0)));
        }
        let out = apply_branching(conns, "grid", &CANVAS);
        assert_eq!(out.intersections_detected, 144);
        let branches = out
            .connections
            .iter()
            .filter(|c| c.generation_depth == BRANCH_DEPTH)
            .count();
        assert!(branches >= MAX_PROCESSED_INTERSECTIONS);
        assert!(branches <= 2 * MAX_PROCESSED_INTERSECTIONS);
    }

    #[test]
    fn shuffle_is_a_deterministic_permutation() {
        let mut a: Vec<usize> = (0..20).collect();
        let mut b = a.clone();
        shuffle(&mut a, "s");
        shuffle(&mut b, "s");
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }
}
