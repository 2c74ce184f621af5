//! Region value bundling the boundary, its envelope, and its index.

use geo_types::Coord;
use tracing::debug;

use super::bbox::BoundingBox;
use super::filter::{filter_events_with, par_filter_events_with, FilterOutcome};
use super::index::PolygonIndex;
use crate::error::GeometryError;
use crate::models::{Locate, MultiPolygon};

/// A loaded boundary ready for classification.
///
/// Built once after the boundary is loaded and shared by reference
/// afterwards. Nothing in it changes after construction, so it can be
/// used from any number of threads.
#[derive(Debug)]
pub struct Region {
    geometry: MultiPolygon,
    bbox: BoundingBox,
    index: PolygonIndex,
}

impl Region {
    /// Fails with [`GeometryError::EmptyGeometry`] if the boundary has no
    /// vertices, since there would be nothing to query.
    pub fn new(geometry: MultiPolygon) -> Result<Self, GeometryError> {
        let bbox = BoundingBox::compute(&geometry)?;
        let index = PolygonIndex::build(&geometry);

        debug!(
            "Region with {} parts, {} vertices, bbox {}",
            geometry.len(),
            geometry.vertex_count(),
            bbox
        );

        Ok(Self {
            geometry,
            bbox,
            index,
        })
    }

    pub fn contains(&self, point: Coord<f64>) -> bool {
        self.bbox.contains(point) && self.index.contains(point)
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn geometry(&self) -> &MultiPolygon {
        &self.geometry
    }

    pub fn polygon_count(&self) -> usize {
        self.geometry.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.geometry.vertex_count()
    }

    pub fn filter<'a, E: Locate>(&self, events: &'a [E]) -> FilterOutcome<'a, E> {
        filter_events_with(events, |p| self.contains(p))
    }

    pub fn par_filter<'a, E: Locate + Sync>(&self, events: &'a [E]) -> FilterOutcome<'a, E> {
        par_filter_events_with(events, |p| self.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, Polygon, Ring};
    use crate::pip::filter_events;
    use serde_json::json;

    fn two_islands() -> MultiPolygon {
        MultiPolygon::new(vec![
            Polygon::new(vec![Ring::from(vec![
                [0.0, 0.0],
                [5.0, 0.0],
                [5.0, 5.0],
                [0.0, 5.0],
            ])]),
            Polygon::new(vec![Ring::from(vec![
                [10.0, 10.0],
                [15.0, 10.0],
                [15.0, 15.0],
                [10.0, 15.0],
            ])]),
        ])
    }

    #[test]
    fn test_empty_region_is_rejected() {
        assert!(matches!(
            Region::new(MultiPolygon::default()),
            Err(GeometryError::EmptyGeometry)
        ));
    }

    #[test]
    fn test_contains() {
        let region = Region::new(two_islands()).unwrap();
        assert!(region.contains(Coord { x: 3.0, y: 3.0 }));
        assert!(region.contains(Coord { x: 12.0, y: 12.0 }));
        assert!(!region.contains(Coord { x: 7.0, y: 7.0 }));
        assert!(!region.contains(Coord { x: 30.0, y: 3.0 }));
        assert_eq!(region.bbox(), &BoundingBox::new(0.0, 0.0, 15.0, 15.0));
        assert_eq!(region.polygon_count(), 2);
        assert_eq!(region.vertex_count(), 8);
    }

    #[test]
    fn test_filter_matches_plain_pipeline() {
        let region = Region::new(two_islands()).unwrap();
        let events: Vec<Event> = (0..40)
            .map(|i| {
                let x = i as f64 * 0.4 + 0.05;
                Event::new(json!({"id": i.to_string(), "geometry": {"coordinates": [x, x]}}))
            })
            .collect();

        let plain = filter_events(&events, region.geometry());
        let indexed = region.filter(&events);
        let parallel = region.par_filter(&events);

        assert_eq!(plain.accepted, indexed.accepted);
        assert_eq!(plain.accepted, parallel.accepted);
        assert_eq!(indexed.total_seen, 40);
        assert!(!indexed.accepted.is_empty());
    }
}
