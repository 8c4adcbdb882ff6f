// Pipeline orchestrator: one request in, one connection list out.
//
// The stages run in a fixed order and each reads only what the previous
// one produced:
//
//   keywords → axes → anchors → curves → connections
//     → pre-mirror bounding box → mirror → branch → (rotate)
//     → (origin bridges) → debug payload
//
// Reordering any of them changes the output for the same seed. The rotation
// decision uses the bounding box captured *before* mirroring, and the
// optional bridges are appended after rotation and turned with the same
// decision.
//
// `generate()` never fails. An empty keyword list yields an empty result,
// keywords past `MAX_KEYWORDS` are ignored, out-of-range options are
// clamped (see `EngineOptions::sanitized()`), and a canvas without a
// positive finite size yields an empty result with a warning. Callers that
// want hard errors for those cases run `GenerateRequest::validate()` first.
//
// See also: `dictionary.rs` for keyword resolution, `curves.rs` for the
// per-anchor fan, `mirroring.rs`, `branching.rs`, `orientation.rs`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::branching::apply_branching;
use crate::bridges::origin_bridges;
use crate::connection::encode_curve;
use crate::curves::generate_curves;
use crate::dictionary::{SemanticMap, default_semantic_map};
use crate::error::RequestError;
use crate::geometry::Canvas;
use crate::input::MAX_KEYWORDS;
use crate::mirroring::{apply_mirroring, mirror_info};
use crate::options::EngineOptions;
use crate::orientation::{rotate_connections, should_rotate};
use crate::position::anchor_for;
use crate::types::{Anchor, AxisSegment, BoundingBox, Connection, DirectionClusterDebug, MirrorAxis};

/// Everything one generation depends on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub keywords: Vec<String>,
    pub seed: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    #[serde(default)]
    pub options: EngineOptions,
    #[serde(default)]
    pub include_debug: bool,
}

impl GenerateRequest {
    /// A request with default options and no debug payload.
    pub fn new(keywords: Vec<String>, seed: impl Into<String>, canvas: Canvas) -> Self {
        Self {
            keywords,
            seed: seed.into(),
            canvas_width: canvas.width,
            canvas_height: canvas.height,
            options: EngineOptions::default(),
            include_debug: false,
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.canvas_width, self.canvas_height)
    }

    /// Reject requests a caller should not send: no keywords, a blank
    /// keyword, a non-positive or non-finite canvas, or a non-finite option.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.keywords.is_empty() {
            return Err(RequestError::NoKeywords);
        }
        if let Some(index) = self.keywords.iter().position(|k| k.trim().is_empty()) {
            return Err(RequestError::EmptyKeyword { index });
        }
        if !canvas_is_usable(&self.canvas()) {
            return Err(RequestError::InvalidCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        self.options.validate()
    }
}

fn canvas_is_usable(canvas: &Canvas) -> bool {
    [canvas.width, canvas.height]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0)
}

/// Inspection data for one generation. Never feeds back into geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineDebug {
    /// Axes of the first keyword.
    pub alfa: f64,
    pub beta: f64,
    pub gamma: f64,
    /// Anchor of the first keyword.
    pub anchor: Anchor,
    pub anchors: Vec<Anchor>,
    /// Pre-mirror bounds; `None` only if no primary curve was produced.
    pub bounding_box: Option<BoundingBox>,
    pub mirror_axis_type: Option<MirrorAxis>,
    pub mirror_axis_segment: Option<AxisSegment>,
    pub per_line_cluster_debug: Vec<DirectionClusterDebug>,
    pub cluster_count: u32,
    pub cluster_spread: f64,
    pub force_orientation_enabled: bool,
    pub force_orientation_applied: bool,
    /// Intersections detected before the processing cap.
    pub intersection_count: usize,
}

/// Output of `generate()`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineResult {
    pub connections: Vec<Connection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<EngineDebug>,
}

/// Run the pipeline against the embedded semantic dictionary.
pub fn generate(request: &GenerateRequest) -> EngineResult {
    generate_with_map(default_semantic_map(), request)
}

/// Run the pipeline against a caller-supplied dictionary.
pub fn generate_with_map(map: &SemanticMap, request: &GenerateRequest) -> EngineResult {
    let canvas = request.canvas();
    if !canvas_is_usable(&canvas) {
        warn!(
            width = request.canvas_width,
            height = request.canvas_height,
            "unusable canvas size, returning empty result"
        );
        return EngineResult::default();
    }
    if request.keywords.is_empty() {
        return EngineResult::default();
    }
    if request.keywords.len() > MAX_KEYWORDS {
        warn!(
            given = request.keywords.len(),
            used = MAX_KEYWORDS,
            "too many keywords, ignoring the rest"
        );
    }

    let options = request.options.sanitized();
    let seed = request.seed.as_str();

    let vectors: Vec<_> = request
        .keywords
        .iter()
        .take(MAX_KEYWORDS)
        .map(|k| map.keyword_vector(k))
        .collect();
    let anchors: Vec<Anchor> = vectors
        .iter()
        .enumerate()
        .map(|(i, kv)| anchor_for(i, kv, &canvas))
        .collect();

    let mut primary = Vec::new();
    let mut per_line = Vec::new();
    for (anchor, kv) in anchors.iter().zip(&vectors) {
        let set = generate_curves(anchor, &kv.axes, seed, &canvas, &options);
        primary.extend(set.curves.iter().map(encode_curve));
        per_line.extend(set.debug);
    }

    let info = mirror_info(&primary, &canvas);
    let primary_count = primary.len();
    let mirrored = apply_mirroring(primary, &canvas);
    let branched = apply_branching(mirrored, seed, &canvas);

    let pre_mirror_bbox = info.as_ref().map(|i| &i.bounding_box);
    let rotate = should_rotate(options.force_orientation, pre_mirror_bbox);
    let mut connections = branched.connections;
    if rotate {
        connections = rotate_connections(connections, &canvas);
    }

    if options.origin_bridges {
        let bridges = origin_bridges(&anchors);
        connections.extend(if rotate {
            rotate_connections(bridges, &canvas)
        } else {
            bridges
        });
    }

    debug!(
        keywords = anchors.len(),
        primary = primary_count,
        intersections = branched.intersections_detected,
        total = connections.len(),
        rotated = rotate,
        "generation finished"
    );

    let debug = request.include_debug.then(|| {
        let first = &vectors[0].axes;
        EngineDebug {
            alfa: first.alfa,
            beta: first.beta,
            gamma: first.gamma,
            anchor: anchors[0].clone(),
            anchors,
            bounding_box: info.map(|i| i.bounding_box),
            mirror_axis_type: info.map(|i| i.axis),
            mirror_axis_segment: info.map(|i| i.segment),
            per_line_cluster_debug: per_line,
            cluster_count: options.cluster_count,
            cluster_spread: options.cluster_spread,
            force_orientation_enabled: options.force_orientation,
            force_orientation_applied: rotate,
            intersection_count: branched.intersections_detected,
        }
    });

    EngineResult { connections, debug }
}
