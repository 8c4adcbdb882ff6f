// Orientation normalizer: optional 90° clockwise turn of the final drawing.
//
// Decided from the bounding box captured *before* mirroring: when the
// force-orientation toggle is on and that box is taller than wide, every
// endpoint is rotated about the canvas center with
// `(x, y) → (cx + (y − cy), cy − (x − cx))`. Curvature is unchanged: the
// control-point encoding is invariant under rotation.

use crate::geometry::{Canvas, Point};
use crate::types::{BoundingBox, Connection};

/// Whether the final drawing should be rotated.
pub fn should_rotate(force_orientation: bool, pre_mirror_bbox: Option<&BoundingBox>) -> bool {
    let Some(bbox) = pre_mirror_bbox.filter(|_| force_orientation) else {
        return false;
    };
    let width = bbox.width();
    let height = bbox.height();
    width > 0.0 && height > 0.0 && height > width
}

/// Rotate a point 90° clockwise about the canvas center, clamped to the
/// canvas (a non-square canvas swaps its extents under rotation).
pub fn rotate_clockwise(p: Point, canvas: &Canvas) -> Point {
    let c = canvas.center();
    canvas.clamp_xy(c.x + (p.y - c.y), c.y - (p.x - c.x))
}

/// Rotate every connection's endpoints.
pub fn rotate_connections(connections: Vec<Connection>, canvas: &Canvas) -> Vec<Connection> {
    connections
        .into_iter()
        .map(|conn| Connection {
            from: rotate_clockwise(conn.from, canvas),
            to: rotate_clockwise(conn.to, canvas),
            ..conn
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PRIMARY_DEPTH, SemanticInfluence};

    fn bbox(w: f64, h: f64) -> BoundingBox {
        BoundingBox {
            min_x: 0.0,
            min_y: 0.0,
            max_x: w,
            max_y: h,
        }
    }

    #[test]
    fn rotation_decision() {
        assert!(should_rotate(true, Some(&bbox(100.0, 300.0))));
        assert!(!should_rotate(false, Some(&bbox(100.0, 300.0))));
        assert!(!should_rotate(true, Some(&bbox(300.0, 100.0))));
        assert!(!should_rotate(true, Some(&bbox(0.0, 300.0))));
        assert!(!should_rotate(true, None));
    }

    #[test]
    fn rotates_about_center() {
        let canvas = Canvas::new(1000.0, 1000.0);
        let turned = |x, y| rotate_clockwise(Point::new(x, y), &canvas);
        assert_eq!(turned(500.0, 500.0), Point::new(500.0, 500.0));
        assert_eq!(turned(700.0, 500.0), Point::new(500.0, 300.0));
        assert_eq!(turned(500.0, 200.0), Point::new(200.0, 500.0));
    }

    #[test]
    fn four_turns_is_identity_on_square_canvas() {
        let canvas = Canvas::new(800.0, 800.0);
        let p = Point::new(123.0, 456.0);
        let mut q = p;
        for _ in 0..4 {
            q = rotate_clockwise(q, &canvas);
        }
        assert!(q.distance(p) < 1e-9);
    }

    #[test]
    fn rotated_connections_keep_other_fields() {
        let canvas = Canvas::new(1000.0, 1000.0);
        let conn = Connection {
            from: Point::new(100.0, 200.0),
            to: Point::new(300.0, 400.0),
            curved: true,
            curvature: 0.4,
            dashed: true,
            semantic_influence: SemanticInfluence::default(),
            generation_depth: PRIMARY_DEPTH,
            generated_from: Some(3),
        };
        let out = rotate_connections(vec![conn.clone()], &canvas);
        assert_eq!(out[0].from, Point::new(200.0, 900.0));
        assert_eq!(out[0].to, Point::new(400.0, 700.0));
        assert_eq!(out[0].curvature, conn.curvature);
        assert!(out[0].dashed);
        assert_eq!(out[0].generated_from, Some(3));
    }

    #[test]
    fn wide_canvas_rotation_is_clamped() {
        let canvas = Canvas::new(1920.0, 1080.0);
        let r = rotate_clockwise(Point::new(0.0, 0.0), &canvas);
        assert!(canvas.contains(r));
    }
}
