//! Query parameters for the FDSN event service.

use chrono::{DateTime, Utc};

use crate::pip::BoundingBox;

/// Time format accepted by the `starttime`/`endtime` parameters
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One event search: a time window inside a rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub start_time: String,
    pub end_time: String,
    pub bbox: BoundingBox,
    pub order_by: String,
}

impl EventQuery {
    pub fn new(
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
            bbox,
            order_by: "time-asc".to_string(),
        }
    }

    /// Window from `start_time` up to `now`
    pub fn until(start_time: impl Into<String>, now: DateTime<Utc>, bbox: BoundingBox) -> Self {
        Self::new(start_time, now.format(TIME_FORMAT).to_string(), bbox)
    }

    /// Parameters for the page starting at `offset` (1-based)
    pub fn params(&self, limit: usize, offset: usize) -> Vec<(&'static str, String)> {
        vec![
            ("format", "geojson".to_string()),
            ("starttime", self.start_time.clone()),
            ("endtime", self.end_time.clone()),
            ("minlongitude", format!("{:.6}", self.bbox.min_x)),
            ("maxlongitude", format!("{:.6}", self.bbox.max_x)),
            ("minlatitude", format!("{:.6}", self.bbox.min_y)),
            ("maxlatitude", format!("{:.6}", self.bbox.max_y)),
            ("orderby", self.order_by.clone()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ]
    }
}
