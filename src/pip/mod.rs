//! Point-in-polygon (PIP) classification against a boundary region.
//!
//! Ray casting for single rings, polygon and multipolygon membership on top
//! of it, the bounding box used to query the event service, and the batch
//! filter that keeps the events inside the region.

mod bbox;
mod boundary;
mod filter;
mod index;
mod region;
mod ring;
mod service;

pub use bbox::BoundingBox;
pub use boundary::{load_boundary, parse_boundary};
pub use filter::{filter_events, filter_events_with, par_filter_events_with, FilterOutcome};
pub use index::PolygonIndex;
pub use region::{point_in_multipolygon, point_in_polygon};
pub use ring::point_in_ring;
pub use service::Region;
