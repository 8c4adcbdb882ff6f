// Mirroring stage: reflect the whole drawing across a canvas-centered axis.
//
// The bounding box of the primary geometry only picks the axis *type*:
// a wide box mirrors across the vertical center line, a tall box across the
// horizontal one, and a box within 1% of square across the main diagonal.
// The axis always passes through the canvas center regardless of where the
// box sits.
//
// Each connection is reflected endpoint by endpoint. Curved connections
// also reflect their rebuilt control point and re-derive curvature from it
// through the encoder's inverse, because a reflection flips orientation and
// the diagonal swap changes which component the inverse solves.
//
// The output is the originals followed by their mirrors, in the same order,
// with no deduplication, so the count always doubles.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::connection::{control_point, curvature_from_control};
use crate::geometry::{Canvas, Point};
use crate::types::{AxisSegment, BoundingBox, Connection, MirrorAxis};

/// Relative tolerance under which a bounding box counts as square.
pub const SQUARE_TOLERANCE: f64 = 0.01;

/// The axis decision for a set of connections, exposed for debugging.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MirrorInfo {
    pub bounding_box: BoundingBox,
    pub axis: MirrorAxis,
    pub segment: AxisSegment,
}

/// Bounds of all endpoints and, for curved connections, their control
/// points, clamped to the canvas. `None` for an empty slice.
pub fn bounding_box(connections: &[Connection], canvas: &Canvas) -> Option<BoundingBox> {
    if connections.is_empty() {
        return None;
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut include = |p: Point| {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    };

    for conn in connections {
        include(conn.from);
        include(conn.to);
        if conn.curved {
            include(control_point(conn, canvas));
        }
    }

    let lo = canvas.clamp_xy(min_x, min_y);
    let hi = canvas.clamp_xy(max_x, max_y);
    Some(BoundingBox {
        min_x: lo.x,
        min_y: lo.y,
        max_x: hi.x,
        max_y: hi.y,
    })
}

/// Pick the mirror axis type from the bounding box shape.
pub fn classify_axis(bbox: &BoundingBox) -> MirrorAxis {
    let width = bbox.width();
    let height = bbox.height();
    if (width - height).abs() < SQUARE_TOLERANCE * width.max(height) {
        MirrorAxis::Diagonal
    } else if width > height {
        MirrorAxis::Vertical
    } else {
        MirrorAxis::Horizontal
    }
}

/// The axis drawn across the full canvas, for visualization.
///
/// The diagonal segment runs from (0, 0) to (width, height), while
/// `reflect` fixes the anti-diagonal line x + y = cx + cy. The drawn line
/// is a marker only and does not match the reflection line.
pub fn axis_segment(axis: MirrorAxis, canvas: &Canvas) -> AxisSegment {
    let c = canvas.center();
    match axis {
        MirrorAxis::Vertical => AxisSegment {
            x1: c.x,
            y1: 0.0,
            x2: c.x,
            y2: canvas.height,
        },
        MirrorAxis::Horizontal => AxisSegment {
            x1: 0.0,
            y1: c.y,
            x2: canvas.width,
            y2: c.y,
        },
        MirrorAxis::Diagonal => AxisSegment {
            x1: 0.0,
            y1: 0.0,
            x2: canvas.width,
            y2: canvas.height,
        },
    }
}

/// Reflect a point across `axis` through the canvas center, clamped to the
/// canvas (only a non-square canvas can push a diagonal reflection out).
pub fn reflect(p: Point, axis: MirrorAxis, canvas: &Canvas) -> Point {
    let c = canvas.center();
    match axis {
        MirrorAxis::Vertical => canvas.clamp_xy(2.0 * c.x - p.x, p.y),
        MirrorAxis::Horizontal => canvas.clamp_xy(p.x, 2.0 * c.y - p.y),
        MirrorAxis::Diagonal => canvas.clamp_xy(c.x + c.y - p.y, c.x + c.y - p.x),
    }
}

/// Mirror image of one connection.
pub fn mirror_connection(conn: &Connection, axis: MirrorAxis, canvas: &Canvas) -> Connection {
    let from = reflect(conn.from, axis, canvas);
    let to = reflect(conn.to, axis, canvas);
    let curvature = if conn.curved {
        let control = reflect(control_point(conn, canvas), axis, canvas);
        curvature_from_control(from, to, control)
    } else {
        conn.curvature
    };

    Connection {
        from,
        to,
        curvature,
        ..conn.clone()
    }
}

/// Bounding box, axis and axis segment for a set of connections.
pub fn mirror_info(connections: &[Connection], canvas: &Canvas) -> Option<MirrorInfo> {
    let bounding_box = bounding_box(connections, canvas)?;
    let axis = classify_axis(&bounding_box);
    Some(MirrorInfo {
        bounding_box,
        axis,
        segment: axis_segment(axis, canvas),
    })
}

/// Append the mirror image of every connection.
pub fn apply_mirroring(connections: Vec<Connection>, canvas: &Canvas) -> Vec<Connection> {
    let Some(info) = mirror_info(&connections, canvas) else {
        return connections;
    };
    debug!(axis = ?info.axis, count = connections.len(), "mirroring geometry");

    let mirrored: Vec<Connection> = connections
        .iter()
        .map(|c| mirror_connection(c, info.axis, canvas))
        .collect();
    let mut out = connections;
    out.extend(mirrored);
    out
}
