// Core data model shared by every pipeline stage.
//
// The flow is strictly forward: `KeywordVector` → `Anchor` → `Curve` →
// `Connection`. Only `Connection` (plus the optional debug telemetry in
// `engine.rs`) crosses the boundary back to callers. `Curve` and
// `Intersection` are transient and never leave the stage that builds them.
//
// All coordinates are `f64` pixels; see `geometry.rs`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::geometry::Point;

/// Lower bound of every semantic axis.
pub const AXIS_MIN: f64 = -100.0;
/// Upper bound of every semantic axis.
pub const AXIS_MAX: f64 = 100.0;

/// Encoded curvature is always clamped to `[-MAX_CURVATURE, MAX_CURVATURE]`.
pub const MAX_CURVATURE: f64 = 0.8;

/// `generation_depth` of curves emitted directly from keywords.
pub const PRIMARY_DEPTH: u8 = 0;
/// `generation_depth` of segments spawned at intersections.
pub const BRANCH_DEPTH: u8 = 1;

/// The four semantic axes of a keyword, each in [-100, 100].
///
/// - `alfa`, `beta`: anchor position (x and inverted y).
/// - `gamma`: fan-out (line count, direction rotation, line length).
/// - `delta`: curvature magnitude.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisVector {
    pub alfa: f64,
    pub beta: f64,
    pub gamma: f64,
    pub delta: f64,
}

impl AxisVector {
    /// Build a vector with every component clamped to the axis range.
    pub fn clamped(alfa: f64, beta: f64, gamma: f64, delta: f64) -> Self {
        let c = |v: f64| v.clamp(AXIS_MIN, AXIS_MAX);
        Self {
            alfa: c(alfa),
            beta: c(beta),
            gamma: c(gamma),
            delta: c(delta),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.alfa.is_finite()
            && self.beta.is_finite()
            && self.gamma.is_finite()
            && self.delta.is_finite()
    }
}

/// A keyword together with its resolved axes. Built once per input keyword.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeywordVector {
    pub keyword: String,
    pub axes: AxisVector,
}

/// Canvas quadrant of an anchor, numbered counter-clockwise from top-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    TopRight,
    TopLeft,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// The conventional 1–4 quadrant number.
    pub fn number(self) -> u8 {
        match self {
            Quadrant::TopRight => 1,
            Quadrant::TopLeft => 2,
            Quadrant::BottomLeft => 3,
            Quadrant::BottomRight => 4,
        }
    }
}

/// A keyword's position on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub keyword_index: usize,
    pub keyword: String,
    /// Pixel-space position.
    pub point: Point,
    /// Position in [0, 1] × [0, 1].
    pub normalized: Point,
    pub quadrant: Quadrant,
}

/// A quadratic curve in pixel space, before encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    pub start: Point,
    pub control: Point,
    pub end: Point,
    pub keyword_index: usize,
    pub quadrant: Quadrant,
}

/// Partial axis data attached to a connection. Always empty in this engine;
/// kept so serialized connections keep the established record shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticInfluence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alfa: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
}

/// A directed segment of the final drawing, straight or quadratic.
///
/// For curved connections the control point is not stored; it is rebuilt
/// from `(from, to, curvature)` with `connection::control_point()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: Point,
    pub to: Point,
    pub curved: bool,
    /// In `[-MAX_CURVATURE, MAX_CURVATURE]`.
    pub curvature: f64,
    pub dashed: bool,
    pub semantic_influence: SemanticInfluence,
    /// `PRIMARY_DEPTH` or `BRANCH_DEPTH`.
    pub generation_depth: u8,
    /// Index of the processed intersection that spawned this branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_from: Option<usize>,
}

/// A point where two or more connections cross.
#[derive(Clone, Debug, PartialEq)]
pub struct Intersection {
    /// Rounded to whole pixels.
    pub point: Point,
    /// Sorted, unique, at least two entries.
    pub from_indices: SmallVec<[usize; 4]>,
}

/// Axis-aligned bounds of a set of connections, clamped to the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Orientation of the symmetry axis used by the mirroring stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorAxis {
    /// Vertical line through the canvas center; reflects x.
    Vertical,
    /// Horizontal line through the canvas center; reflects y.
    Horizontal,
    /// Reflects across the line x + y = cx + cy through the canvas center.
    /// The visualization segment is drawn along the main diagonal instead.
    Diagonal,
}

/// A line segment for visualizing the mirror axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Per-line clustering and profile telemetry. Never read by later stages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionClusterDebug {
    pub keyword_index: usize,
    pub line_index: usize,
    pub cluster_index: usize,
    /// Central angle of the cluster before gamma rotation, degrees.
    pub cluster_angle: f64,
    /// Rotation applied by gamma, degrees.
    pub gamma_rotation: f64,
    /// `cluster_angle + gamma_rotation`, degrees.
    pub final_cluster_angle: f64,
    pub in_cluster_jitter: f64,
    /// Emitted direction in [0, 180], degrees.
    pub final_direction: f64,
    pub start_point: Point,
    pub length_profile: f64,
    pub curvature_profile: f64,
}
