// Origin bridges: dashed straight links between keyword anchors.
//
// An optional overlay enabled by `EngineOptions::origin_bridges`. For every
// pair i < j of anchors (outer loop over i, inner over j) one straight,
// dashed, primary-depth connection runs from anchor i to anchor j. Output
// order depends only on anchor order.

use crate::types::{Anchor, Connection, PRIMARY_DEPTH, SemanticInfluence};

/// One dashed bridge per unordered anchor pair. Empty for fewer than two.
pub fn origin_bridges(anchors: &[Anchor]) -> Vec<Connection> {
    let mut bridges = Vec::with_capacity(anchors.len() * anchors.len().saturating_sub(1) / 2);
    for (i, from) in anchors.iter().enumerate() {
        for to in &anchors[i + 1..] {
            bridges.push(Connection {
                from: from.point,
                to: to.point,
                curved: false,
                curvature: 0.0,
                dashed: true,
                semantic_influence: SemanticInfluence::default(),
                generation_depth: PRIMARY_DEPTH,
                generated_from: None,
            });
        }
    }
    bridges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::types::Quadrant;

    fn anchor(i: usize, x: f64, y: f64) -> Anchor {
        Anchor {
            keyword_index: i,
            keyword: format!("k{i}"),
            point: Point::new(x, y),
            normalized: Point::new(x / 100.0, y / 100.0),
            quadrant: Quadrant::TopLeft,
        }
    }

    #[test]
    fn fewer_than_two_anchors() {
        assert!(origin_bridges(&[]).is_empty());
        assert!(origin_bridges(&[anchor(0, 1.0, 1.0)]).is_empty());
    }

    #[test]
    fn pairs_in_lexical_order() {
        let anchors = [
            anchor(0, 0.0, 0.0),
            anchor(1, 10.0, 0.0),
            anchor(2, 0.0, 10.0),
        ];
        let bridges = origin_bridges(&anchors);
        assert_eq!(bridges.len(), 3);
        let pairs: Vec<_> = bridges.iter().map(|b| (b.from, b.to)).collect();
        assert_eq!(
            pairs,
            vec![
                (anchors[0].point, anchors[1].point),
                (anchors[0].point, anchors[2].point),
                (anchors[1].point, anchors[2].point),
            ]
        );
        for b in &bridges {
            assert!(b.dashed && !b.curved);
            assert_eq!(b.curvature, 0.0);
        }
    }
}
