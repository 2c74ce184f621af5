//! Boundary geometry: rings, polygons with holes, and multi-part regions.
//!
//! These types hold the boundary exactly as it was loaded. Rings are not
//! closed, deduplicated, or reoriented, so the classifier sees the same
//! vertex sequence the source file described.

use geo_types::{Coord, LineString};
use serde::{Deserialize, Serialize};

/// A closed loop of vertices. The edge from the last vertex back to the
/// first is implied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct Ring(Vec<Coord<f64>>);

impl Ring {
    pub fn new(vertices: Vec<Coord<f64>>) -> Self {
        Self(vertices)
    }

    pub fn vertices(&self) -> &[Coord<f64>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<[f64; 2]>> for Ring {
    fn from(pairs: Vec<[f64; 2]>) -> Self {
        Self(pairs.into_iter().map(|[x, y]| Coord { x, y }).collect())
    }
}

impl From<Ring> for Vec<[f64; 2]> {
    fn from(ring: Ring) -> Self {
        ring.0.into_iter().map(|c| [c.x, c.y]).collect()
    }
}

impl From<&LineString<f64>> for Ring {
    fn from(line: &LineString<f64>) -> Self {
        Self(line.0.clone())
    }
}

/// One exterior ring followed by zero or more holes.
///
/// A polygon with no rings at all is allowed and contains nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    rings: Vec<Ring>,
}

impl Polygon {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    /// Build from an exterior ring and its holes
    pub fn with_holes(exterior: Ring, holes: Vec<Ring>) -> Self {
        let mut rings = Vec::with_capacity(holes.len() + 1);
        rings.push(exterior);
        rings.extend(holes);
        Self { rings }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn exterior(&self) -> Option<&Ring> {
        self.rings.first()
    }

    pub fn interiors(&self) -> &[Ring] {
        self.rings.get(1..).unwrap_or(&[])
    }

    /// Every vertex of every ring, exterior first
    pub fn vertices(&self) -> impl Iterator<Item = Coord<f64>> + '_ {
        self.rings.iter().flat_map(|r| r.vertices().iter().copied())
    }

    pub fn vertex_count(&self) -> usize {
        self.rings.iter().map(Ring::len).sum()
    }
}

impl From<&geo_types::Polygon<f64>> for Polygon {
    fn from(poly: &geo_types::Polygon<f64>) -> Self {
        Self::with_holes(
            Ring::from(poly.exterior()),
            poly.interiors().iter().map(Ring::from).collect(),
        )
    }
}

impl From<geo_types::Polygon<f64>> for Polygon {
    fn from(poly: geo_types::Polygon<f64>) -> Self {
        Self::from(&poly)
    }
}

/// A region made of independent polygon parts (mainland plus islands).
/// A point belongs to the region if it belongs to any part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiPolygon(Vec<Polygon>);

impl MultiPolygon {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self(polygons)
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, polygon: Polygon) {
        self.0.push(polygon);
    }

    pub fn vertices(&self) -> impl Iterator<Item = Coord<f64>> + '_ {
        self.0.iter().flat_map(|p| p.vertices())
    }

    pub fn vertex_count(&self) -> usize {
        self.0.iter().map(Polygon::vertex_count).sum()
    }

    /// Convert into a geo multipolygon.
    ///
    /// geo closes every ring and needs an exterior, so polygons without
    /// rings are dropped. Only meant for interop with geo algorithms.
    pub fn to_geo(&self) -> geo_types::MultiPolygon<f64> {
        let polygons = self
            .0
            .iter()
            .filter_map(|poly| {
                let exterior = poly.exterior()?;
                Some(geo_types::Polygon::new(
                    LineString::new(exterior.vertices().to_vec()),
                    poly.interiors()
                        .iter()
                        .map(|r| LineString::new(r.vertices().to_vec()))
                        .collect(),
                ))
            })
            .collect();
        geo_types::MultiPolygon::new(polygons)
    }
}

impl From<Polygon> for MultiPolygon {
    fn from(polygon: Polygon) -> Self {
        Self(vec![polygon])
    }
}

impl From<&geo_types::MultiPolygon<f64>> for MultiPolygon {
    fn from(multi: &geo_types::MultiPolygon<f64>) -> Self {
        Self(multi.0.iter().map(Polygon::from).collect())
    }
}

impl From<geo_types::MultiPolygon<f64>> for MultiPolygon {
    fn from(multi: geo_types::MultiPolygon<f64>) -> Self {
        Self::from(&multi)
    }
}

impl FromIterator<Polygon> for MultiPolygon {
    fn from_iter<I: IntoIterator<Item = Polygon>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
