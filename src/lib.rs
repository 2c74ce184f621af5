//! Quakefence - earthquake events clipped to an administrative boundary
//!
//! This library provides the boundary classifier and the shared I/O pieces
//! for the `fetch` and `filter` binaries.

pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod pip;
pub mod usgs;

pub use error::{FetchError, GeometryError};
pub use models::{Event, Locate, Location, MultiPolygon, Polygon, Ring};
pub use pip::{BoundingBox, Region};
