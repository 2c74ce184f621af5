//! Polygon and multipolygon membership built on the ring test.

use geo_types::Coord;

use super::ring::point_in_ring;
use crate::models::{MultiPolygon, Polygon};

/// Inside the exterior ring and outside every hole.
///
/// A polygon without rings contains nothing.
pub fn point_in_polygon(point: Coord<f64>, polygon: &Polygon) -> bool {
    let exterior = match polygon.exterior() {
        Some(ring) => ring,
        None => return false,
    };

    if !point_in_ring(point, exterior.vertices()) {
        return false;
    }

    !polygon
        .interiors()
        .iter()
        .any(|hole| point_in_ring(point, hole.vertices()))
}

/// Inside any part of the region. An empty region contains nothing.
pub fn point_in_multipolygon(point: Coord<f64>, multipolygon: &MultiPolygon) -> bool {
    multipolygon
        .polygons()
        .iter()
        .any(|poly| point_in_polygon(point, poly))
}
