// Generation options.
//
// `EngineOptions` is the immutable parameter record passed into every
// `generate()` call. There is no ambient configuration: two calls with equal
// options and inputs produce identical output.
//
// The values usually come from four 0–100 UI sliders; `SliderState` maps
// them onto the option ranges. Sliders never influence the seed (see
// `input::derive_seed()`), only the geometry.
//
// Loaded from JSON like any other config struct; every field has a default
// so partial documents are accepted.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::RequestError;

pub const LENGTH_SCALE_RANGE: (f64, f64) = (0.7, 1.3);
pub const CURVATURE_SCALE_RANGE: (f64, f64) = (0.3, 1.7);
pub const CLUSTER_COUNT_RANGE: (u32, u32) = (2, 5);
/// Degrees.
pub const CLUSTER_SPREAD_RANGE: (f64, f64) = (10.0, 60.0);

/// Tunable parameters for one generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Multiplier on every primary line length.
    pub length_scale: f64,
    /// Multiplier on every primary curve's control-point offset.
    pub curvature_scale: f64,
    /// Number of direction clusters lines are bucketed into.
    pub cluster_count: u32,
    /// Angular width of each cluster, degrees.
    pub cluster_spread: f64,
    /// Rotate portrait-shaped geometry by 90° clockwise.
    pub force_orientation: bool,
    /// Overlay dashed straight bridges between every pair of anchors.
    pub origin_bridges: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            length_scale: 1.0,
            curvature_scale: 1.0,
            cluster_count: 3,
            cluster_spread: 30.0,
            force_orientation: false,
            origin_bridges: false,
        }
    }
}

impl EngineOptions {
    /// Check that every numeric option is finite.
    pub fn validate(&self) -> Result<(), RequestError> {
        for (name, value) in [
            ("length_scale", self.length_scale),
            ("curvature_scale", self.curvature_scale),
            ("cluster_spread", self.cluster_spread),
        ] {
            if !value.is_finite() {
                return Err(RequestError::NonFiniteOption { name, value });
            }
        }
        Ok(())
    }

    /// Copy with every option forced into its supported range. Non-finite
    /// values fall back to the default. Out-of-range values are logged.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let clamp_f = |name: &str, v: f64, (lo, hi): (f64, f64), fallback: f64| {
            if !v.is_finite() {
                warn!(option = name, value = v, "non-finite option, using default");
                return fallback;
            }
            let c = v.clamp(lo, hi);
            if c != v {
                warn!(option = name, value = v, clamped = c, "option out of range");
            }
            c
        };
        let (cmin, cmax) = CLUSTER_COUNT_RANGE;
        let cluster_count = self.cluster_count.clamp(cmin, cmax);
        if cluster_count != self.cluster_count {
            warn!(
                option = "cluster_count",
                value = self.cluster_count,
                clamped = cluster_count,
                "option out of range"
            );
        }
        Self {
            length_scale: clamp_f(
                "length_scale",
                self.length_scale,
                LENGTH_SCALE_RANGE,
                defaults.length_scale,
            ),
            curvature_scale: clamp_f(
                "curvature_scale",
                self.curvature_scale,
                CURVATURE_SCALE_RANGE,
                defaults.curvature_scale,
            ),
            cluster_count,
            cluster_spread: clamp_f(
                "cluster_spread",
                self.cluster_spread,
                CLUSTER_SPREAD_RANGE,
                defaults.cluster_spread,
            ),
            force_orientation: self.force_orientation,
            origin_bridges: self.origin_bridges,
        }
    }
}

/// Raw 0–100 positions of the four generation sliders.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderState {
    pub line_length: f64,
    pub curvature: f64,
    pub cluster_count: f64,
    pub cluster_spread: f64,
}

impl Default for SliderState {
    fn default() -> Self {
        Self {
            line_length: 50.0,
            curvature: 50.0,
            cluster_count: 33.0,
            cluster_spread: 40.0,
        }
    }
}

impl SliderState {
    /// Map slider positions onto option ranges. Positions outside 0–100
    /// are clamped first.
    pub fn to_options(&self, force_orientation: bool) -> EngineOptions {
        let t = |s: f64| s.clamp(0.0, 100.0) / 100.0;
        let lerp = |(lo, hi): (f64, f64), s: f64| lo + t(s) * (hi - lo);
        let (cmin, cmax) = CLUSTER_COUNT_RANGE;
        EngineOptions {
            length_scale: lerp(LENGTH_SCALE_RANGE, self.line_length),
            curvature_scale: lerp(CURVATURE_SCALE_RANGE, self.curvature),
            cluster_count: lerp((cmin as f64, cmax as f64), self.cluster_count).round() as u32,
            cluster_spread: lerp(CLUSTER_SPREAD_RANGE, self.cluster_spread),
            force_orientation,
            origin_bridges: false,
        }
    }
}
