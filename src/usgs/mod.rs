//! USGS FDSN event service access.

mod client;
mod query;

pub use client::{paginate, UsgsClient};
pub use query::{EventQuery, TIME_FORMAT};
