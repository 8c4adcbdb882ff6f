// Input helpers: raw keyword text → keyword list, and seed derivation.
//
// The seed is a function of the keywords and the canvas size only, so
// moving a slider reshapes the drawing without reshuffling it.

use sfcm_prng::hash_key;

/// At most this many keywords take part in a generation.
pub const MAX_KEYWORDS: usize = 10;

/// Split comma-separated text into trimmed, non-empty keywords, keeping the
/// first `MAX_KEYWORDS`.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

/// Seed string for a keyword list on a canvas: the decimal key hash of
/// `"k1,k2,...-{width}-{height}"`.
pub fn derive_seed(keywords: &[String], width: f64, height: f64) -> String {
    let key = format!("{}-{width}-{height}", keywords.join(","));
    hash_key(&key).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_drops_empties() {
        assert_eq!(parse_keywords(" ordine , ,caos,"), vec!["ordine", "caos"]);
        assert!(parse_keywords("  , ,").is_empty());
        assert!(parse_keywords("").is_empty());
    }

    #[test]
    fn parse_caps_keyword_count() {
        let raw = (0..15).map(|i| format!("k{i}")).collect::<Vec<_>>().join(",");
        let parsed = parse_keywords(&raw);
        assert_eq!(parsed.len(), MAX_KEYWORDS);
        assert_eq!(parsed[9], "k9");
    }

    #[test]
    fn seed_depends_on_keywords_and_canvas() {
        let kw = parse_keywords("ordine,caos");
        let a = derive_seed(&kw, 1080.0, 1080.0);
        assert_eq!(a, derive_seed(&kw, 1080.0, 1080.0));
        assert_ne!(a, derive_seed(&kw, 1080.0, 1350.0));
        let swapped = parse_keywords("caos,ordine");
        assert_ne!(a, derive_seed(&swapped, 1080.0, 1080.0));
        assert!(a.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn seed_key_format() {
        let kw = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            derive_seed(&kw, 800.0, 600.0),
            hash_key("a,b-800-600").to_string()
        );
    }

    #[test]
    fn reference_seed() {
        let kw = parse_keywords("ordine,caos");
        assert_eq!(derive_seed(&kw, 1080.0, 1080.0), "6358729307361574594");
    }
}
