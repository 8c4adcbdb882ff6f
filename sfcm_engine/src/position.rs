// Position mapper: alfa/beta → normalized position → pixel anchor.
//
// `x = 0.5 + alfa / 200`, `y = 0.5 - beta / 200`, both clamped to [0, 1],
// so alfa = +100 is the right edge and beta = +100 is the top edge. The
// pixel anchor is the normalized point scaled by the canvas size.

use crate::geometry::{Canvas, Point};
use crate::types::{Anchor, AxisVector, KeywordVector, Quadrant};

fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Normalized canvas position of a keyword in [0, 1] × [0, 1].
pub fn normalized_position(axes: &AxisVector) -> Point {
    Point::new(
        clamp01(0.5 + axes.alfa / 200.0),
        clamp01(0.5 - axes.beta / 200.0),
    )
}

/// Scale a normalized position to pixels.
pub fn to_pixel(normalized: Point, canvas: &Canvas) -> Point {
    Point::new(
        clamp01(normalized.x) * canvas.width,
        clamp01(normalized.y) * canvas.height,
    )
}

/// Quadrant of a normalized point. Ties on the center lines go to the
/// right half (x ≥ 0.5) and the bottom half (y ≥ 0.5).
pub fn quadrant(normalized: Point) -> Quadrant {
    let x = clamp01(normalized.x);
    let y = clamp01(normalized.y);
    if x >= 0.5 && y < 0.5 {
        Quadrant::TopRight
    } else if x < 0.5 && y < 0.5 {
        Quadrant::TopLeft
    } else if x < 0.5 {
        Quadrant::BottomLeft
    } else {
        Quadrant::BottomRight
    }
}

/// Build the anchor for the keyword at `keyword_index`.
pub fn anchor_for(keyword_index: usize, kv: &KeywordVector, canvas: &Canvas) -> Anchor {
    let normalized = normalized_position(&kv.axes);
    Anchor {
        keyword_index,
        keyword: kv.keyword.clone(),
        point: to_pixel(normalized, canvas),
        normalized,
        quadrant: quadrant(normalized),
    }
}
