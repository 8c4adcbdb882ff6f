// sfcm_engine — deterministic keyword-to-geometry pipeline.
//
// Turns a short list of keywords into the line drawing of a symbol: each
// keyword resolves to four semantic axes, the axes place an anchor and fan
// out a spray of quadratic curves, and the whole set is mirrored, branched
// at its crossings, and optionally turned upright. The output is a flat
// list of `Connection`s plus optional debug telemetry. Rendering and UI
// live elsewhere.
//
// Module overview:
// - `engine.rs`:      GenerateRequest, generate(), EngineResult/EngineDebug (the orchestrator).
// - `dictionary.rs`:  SemanticMap: keyword → AxisVector, with hash fallback for unknown words.
// - `position.rs`:    Alfa/beta → normalized position → pixel anchor + quadrant.
// - `curves.rs`:      Per-anchor fan of curves (line count, clusters, lengths, curvature).
// - `connection.rs`:  Curve ↔ (from, to, curvature) encoding and control-point rebuild.
// - `mirroring.rs`:   Bounding box, axis classification, reflection + doubling.
// - `branching.rs`:   Intersection detection and seeded branch spawning.
// - `orientation.rs`: Optional 90° clockwise turn of portrait-shaped drawings.
// - `bridges.rs`:     Optional dashed links between keyword anchors.
// - `options.rs`:     EngineOptions + SliderState mapping.
// - `canvas.rs`:      CanvasSize presets.
// - `input.rs`:       Keyword parsing and seed derivation.
// - `geometry.rs`:    Point, Canvas, small vector helpers.
// - `types.rs`:       AxisVector, Anchor, Curve, Connection and friends.
// - `error.rs`:       DictionaryError, RequestError.
// - `prng`:           Re-exported from `sfcm_prng` — string-keyed xoshiro256++.
//
// **Critical constraint: determinism.** `generate()` is a pure function of
// (keywords, seed, canvas size, options). All randomness comes from
// `prng::seeded_random()` over keys of the form `{seed}:{stage}:{indices}`.
// No system time, no OS entropy, no iteration over unordered maps.

pub mod branching;
pub mod bridges;
pub mod canvas;
pub mod connection;
pub mod curves;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod mirroring;
pub mod options;
pub mod orientation;
pub mod position;
pub use sfcm_prng as prng;
pub mod types;

pub use engine::{EngineDebug, EngineResult, GenerateRequest, generate, generate_with_map};
pub use options::{EngineOptions, SliderState};
