// Canvas size presets.
//
// The drawing surface is one of four fixed aspect ratios, the caller's
// viewport, or a custom size. `CanvasSize::resolve()` turns a choice into
// concrete dimensions, falling back to 1080 px on any side that is missing
// or non-positive so generation always receives a usable canvas.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Canvas;

/// Fallback side length in pixels.
pub const DEFAULT_SIDE: f64 = 1080.0;
/// Largest side accepted for custom sizes.
pub const MAX_CUSTOM_SIDE: f64 = 10_000.0;

/// A canvas size choice.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasSize {
    /// 1080 × 1080.
    Square,
    /// 1080 × 1350.
    Portrait4x5,
    /// 1080 × 1920.
    Portrait9x16,
    /// 1920 × 1080.
    Landscape16x9,
    /// The caller's viewport.
    Fit {
        viewport_width: f64,
        viewport_height: f64,
    },
    /// Explicit dimensions; rounded to whole pixels.
    Custom { width: f64, height: f64 },
}

impl CanvasSize {
    /// Concrete dimensions for this choice.
    pub fn resolve(&self) -> Canvas {
        let or_default = |v: f64| {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                DEFAULT_SIDE
            }
        };
        match *self {
            CanvasSize::Square => Canvas::new(1080.0, 1080.0),
            CanvasSize::Portrait4x5 => Canvas::new(1080.0, 1350.0),
            CanvasSize::Portrait9x16 => Canvas::new(1080.0, 1920.0),
            CanvasSize::Landscape16x9 => Canvas::new(1920.0, 1080.0),
            CanvasSize::Fit {
                viewport_width,
                viewport_height,
            } => Canvas::new(or_default(viewport_width), or_default(viewport_height)),
            CanvasSize::Custom { width, height } => {
                Canvas::new(or_default(width.round()), or_default(height.round()))
            }
        }
    }

    /// The preset identifier used in UIs and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            CanvasSize::Square => "square",
            CanvasSize::Portrait4x5 => "4_5",
            CanvasSize::Portrait9x16 => "9_16",
            CanvasSize::Landscape16x9 => "16_9",
            CanvasSize::Fit { .. } => "fit",
            CanvasSize::Custom { .. } => "custom",
        }
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.resolve();
        write!(f, "{} ({}x{})", self.id(), c.width, c.height)
    }
}

/// Error for an unrecognized preset identifier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown canvas preset `{0}` (expected square, 4_5, 9_16, 16_9, fit or custom)")]
pub struct UnknownPreset(pub String);

impl FromStr for CanvasSize {
    type Err = UnknownPreset;

    /// Parse a preset id. `fit` and `custom` parse with unset dimensions,
    /// which resolve to the fallback until the caller fills them in.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "square" => Ok(CanvasSize::Square),
            "4_5" => Ok(CanvasSize::Portrait4x5),
            "9_16" => Ok(CanvasSize::Portrait9x16),
            "16_9" => Ok(CanvasSize::Landscape16x9),
            "fit" => Ok(CanvasSize::Fit {
                viewport_width: 0.0,
                viewport_height: 0.0,
            }),
            "custom" => Ok(CanvasSize::Custom {
                width: 0.0,
                height: 0.0,
            }),
            _ => Err(UnknownPreset(s.to_string())),
        }
    }
}

/// Whether a custom size is usable: both sides positive and at most
/// `MAX_CUSTOM_SIDE`.
pub fn validate_custom_size(width: f64, height: f64) -> bool {
    [width, height]
        .iter()
        .all(|&v| v.is_finite() && v > 0.0 && v <= MAX_CUSTOM_SIDE)
}
