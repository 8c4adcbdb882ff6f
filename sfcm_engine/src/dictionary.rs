// Axis resolver: keyword → four-axis semantic vector.
//
// A `SemanticMap` is the static, pre-baked dictionary of known keywords. It
// is loaded from JSON via `SemanticMap::from_json()` (JSON string in, typed
// struct out), and `default_semantic_map()` embeds `data/semantic_map_v2.json`
// with `include_str!` and parses it once per process.
//
// Loading validates every entry: all four axes must be present, numeric and
// finite, and are clamped to [-100, 100]. A malformed entry is dropped with
// a `warn!` and never reaches resolution. Keys are normalized (trim +
// lowercase) so lookups are case-insensitive.
//
// Keywords missing from the dictionary get a fallback vector derived from a
// hash of the normalized keyword, so the same keyword resolves to the same
// axes forever for a fixed dictionary version. Resolution has no error path.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Deserialize;
use serde_json::Value;
use sfcm_prng::SeededRng;
use tracing::{debug, error, warn};

use crate::error::DictionaryError;
use crate::types::{AXIS_MAX, AXIS_MIN, AxisVector, KeywordVector};

/// The dictionary format version this engine understands.
pub const SEMANTIC_MAP_VERSION: u32 = 2;

/// Top-level JSON structure of a dictionary file. Entry values stay untyped
/// until `sanitize_axes()` so one bad entry can't fail the whole load.
#[derive(Debug, Deserialize)]
struct SemanticMapFile {
    version: u32,
    keywords: BTreeMap<String, Value>,
}

/// A validated keyword → axes dictionary.
#[derive(Debug, Clone, Default)]
pub struct SemanticMap {
    entries: BTreeMap<String, AxisVector>,
}

impl SemanticMap {
    /// Parse and validate a dictionary from a JSON string.
    ///
    /// Fails only if the document itself is unusable (bad JSON, wrong
    /// version). Malformed entries are skipped with a warning.
    pub fn from_json(json: &str) -> Result<Self, DictionaryError> {
        let file: SemanticMapFile = serde_json::from_str(json)?;
        if file.version != SEMANTIC_MAP_VERSION {
            return Err(DictionaryError::UnsupportedVersion {
                found: file.version,
                expected: SEMANTIC_MAP_VERSION,
            });
        }

        let mut entries = BTreeMap::new();
        for (key, raw) in &file.keywords {
            let normalized = normalize_keyword(key);
            match sanitize_axes(raw) {
                Some(axes) => {
                    if entries.insert(normalized.clone(), axes).is_some() {
                        debug!(
                            keyword = %normalized,
                            "duplicate dictionary key after normalization"
                        );
                    }
                }
                None => {
                    warn!(keyword = %key, "invalid axes data in semantic dictionary, skipping");
                }
            }
        }

        Ok(SemanticMap { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup by an already-normalized key.
    pub fn get(&self, normalized: &str) -> Option<AxisVector> {
        self.entries.get(normalized).copied()
    }

    /// Resolve a raw keyword: dictionary entry if present, hash fallback
    /// otherwise.
    pub fn resolve(&self, keyword: &str) -> AxisVector {
        let normalized = normalize_keyword(keyword);
        match self.get(&normalized) {
            Some(axes) => axes,
            None => fallback_axes(&normalized),
        }
    }

    /// Resolve a keyword into a `KeywordVector`, keeping the caller's
    /// spelling of the keyword.
    pub fn keyword_vector(&self, keyword: &str) -> KeywordVector {
        KeywordVector {
            keyword: keyword.to_string(),
            axes: self.resolve(keyword),
        }
    }
}

/// The embedded default dictionary, parsed once per process.
///
/// A malformed embedded file degrades to an empty dictionary (every keyword
/// then takes the fallback path) rather than failing generation.
pub fn default_semantic_map() -> &'static SemanticMap {
    static MAP: OnceLock<SemanticMap> = OnceLock::new();
    MAP.get_or_init(|| {
        let json = include_str!("../../data/semantic_map_v2.json");
        SemanticMap::from_json(json).unwrap_or_else(|e| {
            error!("failed to load embedded semantic dictionary: {e}");
            SemanticMap::default()
        })
    })
}

/// Normalize a keyword for lookup: trim and lowercase.
pub fn normalize_keyword(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validate one raw dictionary value. Returns `None` unless it is an object
/// with finite numeric `alfa`, `beta`, `gamma` and `delta`.
pub fn sanitize_axes(raw: &Value) -> Option<AxisVector> {
    let obj = raw.as_object()?;
    let field = |name: &str| {
        obj.get(name)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    };
    Some(AxisVector::clamped(
        field("alfa")?,
        field("beta")?,
        field("gamma")?,
        field("delta")?,
    ))
}

/// Deterministic axes for a keyword missing from the dictionary.
///
/// Four independent draws from one keyed stream, each mapped uniformly onto
/// [-100, 100] and rounded to an integer.
pub fn fallback_axes(normalized: &str) -> AxisVector {
    let mut rng = SeededRng::from_key(&format!("axes_v2:{normalized}"));
    let mut axis = || rng.range_f64(AXIS_MIN, AXIS_MAX).round();
    let alfa = axis();
    let beta = axis();
    let gamma = axis();
    let delta = axis();
    AxisVector::clamped(alfa, beta, gamma, delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": 2,
        "keywords": {
            "Ordine ": { "alfa": -20, "beta": 40, "gamma": -10, "delta": -80 },
            "caos": { "alfa": 160, "beta": -30, "gamma": 90, "delta": -400 },
            "broken": { "alfa": "x", "beta": 0, "gamma": 0, "delta": 0 },
            "partial": { "alfa": 1, "beta": 2, "gamma": 3 },
            "scalar": 7
        }
    }"#;

    #[test]
    fn loads_and_drops_malformed_entries() {
        let map = SemanticMap::from_json(SAMPLE).unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.get("broken").is_none());
        assert!(map.get("partial").is_none());
        assert!(map.get("scalar").is_none());
    }

    #[test]
    fn keys_are_normalized_and_values_clamped() {
        let map = SemanticMap::from_json(SAMPLE).unwrap();
        let ordine = map.get("ordine").unwrap();
        assert_eq!(ordine.alfa, -20.0);
        let caos = map.get("caos").unwrap();
        assert_eq!(caos.alfa, 100.0);
        assert_eq!(caos.delta, -100.0);
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let map = SemanticMap::from_json(SAMPLE).unwrap();
        assert_eq!(map.resolve("  ORDINE"), map.get("ordine").unwrap());
    }

    #[test]
    fn rejects_wrong_version() {
        let json = r#"{"version": 1, "keywords": {}}"#;
        let err = SemanticMap::from_json(json).unwrap_err();
        assert!(matches!(err, DictionaryError::UnsupportedVersion { found: 1, .. }));
        assert_eq!(
            err.to_string(),
            "unsupported semantic dictionary version 1 (expected 2)"
        );
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            SemanticMap::from_json("{not json"),
            Err(DictionaryError::Json(_))
        ));
    }

    #[test]
    fn fallback_is_deterministic_and_in_range() {
        for word in ["nebula", "ferro", "zz top", "ü"] {
            let a = fallback_axes(word);
            let b = fallback_axes(word);
            assert_eq!(a, b);
            for v in [a.alfa, a.beta, a.gamma, a.delta] {
                assert!((AXIS_MIN..=AXIS_MAX).contains(&v), "{word}: {v}");
                assert_eq!(v, v.round());
            }
        }
        assert_ne!(fallback_axes("nebula"), fallback_axes("nebulae"));
    }

    /// Pinned values: a change here changes the drawing of every keyword
    /// missing from the dictionary.
    #[test]
    fn fallback_reference_values() {
        assert_eq!(
            fallback_axes("nebula"),
            AxisVector {
                alfa: 34.0,
                beta: 83.0,
                gamma: 34.0,
                delta: -40.0,
            }
        );
    }

    #[test]
    fn unknown_keyword_uses_fallback() {
        let map = SemanticMap::from_json(SAMPLE).unwrap();
        assert_eq!(map.resolve("Nebula"), fallback_axes("nebula"));
    }

    #[test]
    fn embedded_dictionary_loads() {
        let map = default_semantic_map();
        assert!(!map.is_empty());
        assert!(map.get("ordine").is_some());
        assert!(map.get("caos").is_some());
    }
}
