//! Core data models: boundary geometry and event records.

pub mod event;
pub mod geometry;

pub use event::{Event, EventCollection, Locate, Location};
pub use geometry::{MultiPolygon, Polygon, Ring};
