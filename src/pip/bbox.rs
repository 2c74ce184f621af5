//! Axis-aligned envelope of a region, used as the coarse pre-filter and as
//! the rectangular query sent to the event service.

use geo_types::{Coord, Rect};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::models::MultiPolygon;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Fold min/max over every vertex of every ring of every polygon.
    ///
    /// Fails with [`GeometryError::EmptyGeometry`] when there is not a
    /// single vertex to start from.
    pub fn compute(multipolygon: &MultiPolygon) -> Result<Self, GeometryError> {
        Self::from_vertices(multipolygon.vertices()).ok_or(GeometryError::EmptyGeometry)
    }

    /// Envelope of an arbitrary vertex stream, `None` if it is empty
    pub fn from_vertices<I>(vertices: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coord<f64>>,
    {
        vertices.into_iter().fold(None, |acc, c| {
            Some(match acc {
                None => Self::new(c.x, c.y, c.x, c.y),
                Some(b) => Self::new(
                    b.min_x.min(c.x),
                    b.min_y.min(c.y),
                    b.max_x.max(c.x),
                    b.max_y.max(c.y),
                ),
            })
        })
    }

    /// Closed-interval test; points on the border are inside
    pub fn contains(&self, point: Coord<f64>) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    pub fn min(&self) -> Coord<f64> {
        Coord {
            x: self.min_x,
            y: self.min_y,
        }
    }

    pub fn max(&self) -> Coord<f64> {
        Coord {
            x: self.max_x,
            y: self.max_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(self.min(), self.max())
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}

impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.6}, {:.6}, {:.6}, {:.6}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}
