// Connection encoder: quadratic curve ↔ (from, to, curvature).
//
// A curved connection stores a single scalar instead of its control point.
// The control point is rebuilt as
//
//     cx = midX + Δy · curvature
//     cy = midY − Δx · curvature
//
// and `curvature_from_control()` is the exact inverse, solving whichever of
// the two equations has the larger denominator. Every stage that needs a
// control point (bounding box, mirroring, branching, rendering) goes through
// `control_point()`, which also clamps the result to the canvas.
//
// Near 45° both branches of the inverse are valid and may differ in the last
// few bits; callers comparing curvatures should use a tolerance.

use crate::geometry::{Canvas, Point};
use crate::types::{Connection, Curve, MAX_CURVATURE, PRIMARY_DEPTH, SemanticInfluence};

/// Control point of a connection, clamped to the canvas.
///
/// Defined for straight connections too (it is the point the curvature
/// would bend toward), but only curved connections use it.
pub fn control_point(conn: &Connection, canvas: &Canvas) -> Point {
    reconstruct_control(conn.from, conn.to, conn.curvature, canvas)
}

/// Rebuild a control point from endpoints and encoded curvature.
pub fn reconstruct_control(from: Point, to: Point, curvature: f64, canvas: &Canvas) -> Point {
    let mid = from.midpoint(to);
    canvas.clamp_xy(
        mid.x + (to.y - from.y) * curvature,
        mid.y - (to.x - from.x) * curvature,
    )
}

/// Encode a control point as a curvature in `[-MAX_CURVATURE, MAX_CURVATURE]`.
///
/// Returns 0 for a zero-length segment.
pub fn curvature_from_control(from: Point, to: Point, control: Point) -> f64 {
    let mid = from.midpoint(to);
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    let curvature = if dy.abs() > dx.abs() {
        (control.x - mid.x) / dy
    } else if dx.abs() > 0.0 {
        -(control.y - mid.y) / dx
    } else {
        0.0
    };

    if curvature.is_finite() {
        curvature.clamp(-MAX_CURVATURE, MAX_CURVATURE)
    } else {
        0.0
    }
}

/// Encode a primary curve as a connection.
pub fn encode_curve(curve: &Curve) -> Connection {
    Connection {
        from: curve.start,
        to: curve.end,
        curved: true,
        curvature: curvature_from_control(curve.start, curve.end, curve.control),
        dashed: false,
        semantic_influence: SemanticInfluence::default(),
        generation_depth: PRIMARY_DEPTH,
        generated_from: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Quadrant;

    const CANVAS: Canvas = Canvas::new(1000.0, 1000.0);

    fn curve(start: Point, control: Point, end: Point) -> Curve {
        Curve {
            start,
            control,
            end,
            keyword_index: 0,
            quadrant: Quadrant::TopLeft,
        }
    }

    #[test]
    fn inverse_of_reconstruction_horizontal() {
        let from = Point::new(100.0, 500.0);
        let to = Point::new(700.0, 520.0);
        let control = reconstruct_control(from, to, 0.3, &CANVAS);
        let c = curvature_from_control(from, to, control);
        assert!((c - 0.3).abs() < 1e-9, "got {c}");
    }

    #[test]
    fn inverse_of_reconstruction_vertical() {
        let from = Point::new(500.0, 100.0);
        let to = Point::new(480.0, 800.0);
        let control = reconstruct_control(from, to, -0.45, &CANVAS);
        let c = curvature_from_control(from, to, control);
        assert!((c + 0.45).abs() < 1e-9, "got {c}");
    }

    #[test]
    fn near_diagonal_tolerates_either_branch() {
        let from = Point::new(200.0, 200.0);
        let to = Point::new(500.0, 500.000_001);
        let control = reconstruct_control(from, to, 0.2, &CANVAS);
        assert!((curvature_from_control(from, to, control) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn curvature_is_clamped() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(100.0, 0.0);
        let c = curvature_from_control(from, to, Point::new(50.0, -900.0));
        assert_eq!(c, MAX_CURVATURE);
        let c = curvature_from_control(from, to, Point::new(50.0, 900.0));
        assert_eq!(c, -MAX_CURVATURE);
    }

    #[test]
    fn zero_length_segment_is_flat() {
        let p = Point::new(10.0, 10.0);
        assert_eq!(curvature_from_control(p, p, Point::new(40.0, 40.0)), 0.0);
    }

    #[test]
    fn reconstruction_stays_on_canvas() {
        let from = Point::new(0.0, 990.0);
        let to = Point::new(1000.0, 990.0);
        let control = reconstruct_control(from, to, -0.8, &CANVAS);
        assert!(CANVAS.contains(control));
        assert_eq!(control.y, 1000.0);
    }

    #[test]
    fn encoded_primary_curve_fields() {
        let conn = encode_curve(&curve(
            Point::new(100.0, 100.0),
            Point::new(300.0, 50.0),
            Point::new(500.0, 100.0),
        ));
        assert!(conn.curved);
        assert!(!conn.dashed);
        assert_eq!(conn.generation_depth, PRIMARY_DEPTH);
        assert_eq!(conn.generated_from, None);
        // cy = my - dx * c  →  50 = 100 - 400c  →  c = 0.125
        assert!((conn.curvature - 0.125).abs() < 1e-12);
    }
}
