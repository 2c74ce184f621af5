//! Event records from the USGS feed and the coordinate accessor used by the
//! batch filter.

use geo_types::Coord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where an event claims to be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Location {
    /// First two coordinates as (x, y) = (longitude, latitude)
    Point(Coord<f64>),
    /// No geometry or no coordinates field
    Missing,
    /// Coordinates present but not at least two numbers
    Malformed,
}

impl Location {
    pub fn point(&self) -> Option<Coord<f64>> {
        match self {
            Location::Point(c) => Some(*c),
            _ => None,
        }
    }

    /// Read `[x, y, ...]` from a JSON value. Extra dimensions (depth) are ignored.
    pub fn from_coordinates(value: Option<&Value>) -> Self {
        let items = match value {
            None | Some(Value::Null) => return Location::Missing,
            Some(Value::Array(items)) => items,
            Some(_) => return Location::Malformed,
        };

        match (
            items.first().and_then(Value::as_f64),
            items.get(1).and_then(Value::as_f64),
        ) {
            (Some(x), Some(y)) => Location::Point(Coord { x, y }),
            _ => Location::Malformed,
        }
    }
}

/// Anything the batch filter can place on the map.
pub trait Locate {
    fn locate(&self) -> Location;
}

/// A single GeoJSON feature as delivered by the event service.
///
/// The feature is kept verbatim so accepted events are written back
/// exactly as they arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(Value);

impl Event {
    pub fn new(feature: Value) -> Self {
        Self(feature)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }

    /// USGS event id, when present
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Magnitude from `properties.mag`
    pub fn magnitude(&self) -> Option<f64> {
        self.0.get("properties")?.get("mag")?.as_f64()
    }

    /// Origin time in milliseconds since the epoch, from `properties.time`
    pub fn time_ms(&self) -> Option<i64> {
        self.0.get("properties")?.get("time")?.as_i64()
    }

    /// Hypocentre depth in km (the third coordinate)
    pub fn depth_km(&self) -> Option<f64> {
        self.0.get("geometry")?.get("coordinates")?.get(2)?.as_f64()
    }
}

/// A GeoJSON FeatureCollection of events, as returned by one page of the
/// event service or stored by a previous run. Other members are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventCollection {
    #[serde(default)]
    pub features: Vec<Event>,
}

impl Locate for Event {
    fn locate(&self) -> Location {
        let coordinates = self.0.get("geometry").and_then(|g| g.get("coordinates"));
        Location::from_coordinates(coordinates)
    }
}

impl Locate for Coord<f64> {
    fn locate(&self) -> Location {
        Location::Point(*self)
    }
}

impl Locate for [f64; 2] {
    fn locate(&self) -> Location {
        Location::Point(Coord {
            x: self[0],
            y: self[1],
        })
    }
}

impl Locate for Vec<f64> {
    fn locate(&self) -> Location {
        match self.as_slice() {
            [x, y, ..] => Location::Point(Coord { x: *x, y: *y }),
            _ => Location::Malformed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_locate_feature() {
        let event = Event::new(json!({
            "type": "Feature",
            "id": "us7000abcd",
            "properties": { "mag": 4.6, "time": 1743158400000i64 },
            "geometry": { "type": "Point", "coordinates": [96.1, 21.9, 10.0] }
        }));

        assert_eq!(event.locate(), Location::Point(Coord { x: 96.1, y: 21.9 }));
        assert_eq!(event.id(), Some("us7000abcd"));
        assert_eq!(event.magnitude(), Some(4.6));
        assert_eq!(event.time_ms(), Some(1743158400000));
        assert_eq!(event.depth_km(), Some(10.0));
    }

    #[test]
    fn test_locate_missing_geometry() {
        assert_eq!(
            Event::new(json!({"type": "Feature"})).locate(),
            Location::Missing
        );
        assert_eq!(
            Event::new(json!({"geometry": null})).locate(),
            Location::Missing
        );
        assert_eq!(
            Event::new(json!({"geometry": {"type": "Point"}})).locate(),
            Location::Missing
        );
    }

    #[test]
    fn test_locate_malformed_coordinates() {
        for coords in [
            json!([]),
            json!([1.0]),
            json!(["a", 2.0]),
            json!("1,2"),
            json!({"x": 1}),
        ] {
            let event = Event::new(json!({"geometry": {"coordinates": coords}}));
            assert_eq!(event.locate(), Location::Malformed);
        }
    }

    #[test]
    fn test_collection_without_features() {
        let empty: EventCollection =
            serde_json::from_str(r#"{"type":"FeatureCollection"}"#).unwrap();
        assert!(empty.features.is_empty());
    }

    #[test]
    fn test_locate_vec() {
        assert_eq!(vec![1.0].locate(), Location::Malformed);
        assert_eq!(
            vec![1.0, 2.0, 3.0].locate().point(),
            Some(Coord { x: 1.0, y: 2.0 })
        );
    }
}
