//! Spatial index over the parts of a region.

use geo_types::Coord;
use rstar::{RTree, RTreeObject, AABB};
use tracing::info;

use super::bbox::BoundingBox;
use super::region::point_in_polygon;
use crate::models::{MultiPolygon, Polygon};

/// One polygon part with its envelope
#[derive(Debug, Clone)]
struct IndexedPolygon {
    /// Position of the part in the source multipolygon
    idx: usize,
    polygon: Polygon,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedPolygon {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedPolygon {
    fn new(idx: usize, polygon: &Polygon) -> Option<Self> {
        let bbox = BoundingBox::from_vertices(polygon.vertices())?;
        Some(Self {
            idx,
            polygon: polygon.clone(),
            envelope: AABB::from_corners([bbox.min_x, bbox.min_y], [bbox.max_x, bbox.max_y]),
        })
    }
}

/// R-tree of polygon envelopes.
///
/// Country boundaries often have hundreds of small island parts. The tree
/// narrows a lookup to the parts whose envelope touches the point before
/// the exact ray-casting test runs. Answers are identical to
/// [`point_in_multipolygon`](super::point_in_multipolygon): ray casting
/// never accepts a point outside the closed envelope of the exterior ring.
pub struct PolygonIndex {
    tree: RTree<IndexedPolygon>,
}

impl std::fmt::Debug for PolygonIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolygonIndex")
            .field("parts", &self.tree.size())
            .finish()
    }
}

impl PolygonIndex {
    /// Build the index. Parts without any vertex are left out since they
    /// contain nothing.
    pub fn build(multipolygon: &MultiPolygon) -> Self {
        let indexed: Vec<IndexedPolygon> = multipolygon
            .polygons()
            .iter()
            .enumerate()
            .filter_map(|(idx, poly)| IndexedPolygon::new(idx, poly))
            .collect();

        let tree = RTree::bulk_load(indexed);
        info!(
            "Polygon index built with {} of {} parts",
            tree.size(),
            multipolygon.len()
        );

        Self { tree }
    }

    pub fn contains(&self, point: Coord<f64>) -> bool {
        self.candidates(point)
            .any(|ip| point_in_polygon(point, &ip.polygon))
    }

    /// Positions of every part containing the point, ascending
    pub fn lookup(&self, point: Coord<f64>) -> Vec<usize> {
        let mut hits: Vec<usize> = self
            .candidates(point)
            .filter(|ip| point_in_polygon(point, &ip.polygon))
            .map(|ip| ip.idx)
            .collect();
        hits.sort_unstable();
        hits
    }

    fn candidates(&self, point: Coord<f64>) -> impl Iterator<Item = &IndexedPolygon> {
        let query_envelope = AABB::from_point([point.x, point.y]);
        self.tree.locate_in_envelope_intersecting(&query_envelope)
    }

    /// Number of indexed parts
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ring;
    use crate::pip::point_in_multipolygon;

    fn archipelago() -> MultiPolygon {
        let mut parts = vec![Polygon::with_holes(
            Ring::from(vec![
                [0.0, 0.0],
                [10.0, 0.0],
                [12.0, 8.0],
                [5.0, 12.0],
                [-2.0, 7.0],
            ]),
            vec![Ring::from(vec![
                [3.0, 3.0],
                [6.0, 3.0],
                [6.0, 6.0],
                [3.0, 6.0],
            ])],
        )];
        for i in 0..20 {
            let x = 15.0 + (i % 5) as f64 * 3.0;
            let y = (i / 5) as f64 * 3.0;
            parts.push(Polygon::new(vec![Ring::from(vec![
                [x, y],
                [x + 2.0, y],
                [x + 1.0, y + 2.0],
            ])]));
        }
        // Degenerate parts mixed in
        parts.push(Polygon::default());
        parts.push(Polygon::new(vec![Ring::default()]));
        MultiPolygon::new(parts)
    }

    #[test]
    fn test_skips_empty_parts() {
        let index = PolygonIndex::build(&archipelago());
        assert_eq!(index.len(), 21);
    }

    #[test]
    fn test_agrees_with_linear_scan() {
        let multi = archipelago();
        let index = PolygonIndex::build(&multi);

        let mut x = -4.0 + 0.071;
        while x < 32.0 {
            let mut y = -2.0 + 0.053;
            while y < 14.0 {
                let p = Coord { x, y };
                assert_eq!(index.contains(p), point_in_multipolygon(p, &multi));
                y += 0.2;
            }
            x += 0.2;
        }
    }

    #[test]
    fn test_lookup_reports_part_positions() {
        let index = PolygonIndex::build(&archipelago());
        assert_eq!(index.lookup(Coord { x: 1.0, y: 1.0 }), vec![0]);
        assert_eq!(index.lookup(Coord { x: 16.0, y: 0.5 }), vec![1]);
        assert!(index.lookup(Coord { x: 4.5, y: 4.5 }).is_empty());
    }

    #[test]
    fn test_empty_index() {
        let index = PolygonIndex::build(&MultiPolygon::default());
        assert!(index.is_empty());
        assert!(!index.contains(Coord { x: 0.0, y: 0.0 }));
    }
}
