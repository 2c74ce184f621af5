//! GeoJSON output of the filtered events.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::OutputConfig;
use crate::models::Event;
use crate::pip::FilterOutcome;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Milliseconds since the epoch
    pub generated: i64,
    pub title: String,
    /// Events inside the boundary
    pub count: usize,
    /// Events returned for the bounding box
    pub bbox_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starttime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endtime: Option<String>,
    pub source: String,
}

/// FeatureCollection carrying the accepted events untouched
#[derive(Debug, Serialize)]
pub struct FilteredCollection<'a> {
    #[serde(rename = "type")]
    pub collection_type: &'static str,
    pub metadata: Metadata,
    pub features: Vec<&'a Event>,
}

impl<'a> FilteredCollection<'a> {
    pub fn new(
        outcome: FilterOutcome<'a, Event>,
        config: &OutputConfig,
        start_time: Option<&str>,
        end_time: Option<&str>,
        generated: DateTime<Utc>,
    ) -> Self {
        Self {
            collection_type: "FeatureCollection",
            metadata: Metadata {
                generated: generated.timestamp_millis(),
                title: config.title.clone(),
                count: outcome.accepted.len(),
                bbox_count: outcome.total_seen,
                starttime: start_time.map(str::to_string),
                endtime: end_time.map(str::to_string),
                source: config.source.clone(),
            },
            features: outcome.accepted,
        }
    }

    /// Compact JSON, no whitespace
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self).context("Failed to serialize output")?;
        Ok(())
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;

        info!(
            "Wrote {} filtered events to {}",
            self.metadata.count,
            path.display()
        );
        Ok(())
    }
}

/// `{prefix}_{start}_to_{today}.geojson`
pub fn output_file_name(prefix: &str, start_date: &str, today: NaiveDate) -> String {
    format!(
        "{}_{}_to_{}.geojson",
        prefix,
        start_date,
        today.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pip::filter_events_with;
    use chrono::TimeZone;
    use serde_json::{json, Value};

    fn events() -> Vec<Event> {
        vec![
            Event::new(json!({
                "type": "Feature",
                "id": "in",
                "properties": {"mag": 5.1},
                "geometry": {"type": "Point", "coordinates": [1.0, 1.0, 10.0]}
            })),
            Event::new(json!({
                "type": "Feature",
                "id": "out",
                "geometry": {"type": "Point", "coordinates": [9.0, 9.0, 10.0]}
            })),
        ]
    }

    #[test]
    fn test_file_name() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 19).unwrap();
        assert_eq!(
            output_file_name("usgs_earthquakes_admin0", "2025-03-28", today),
            "usgs_earthquakes_admin0_2025-03-28_to_2025-10-19.geojson"
        );
    }

    #[test]
    fn test_metadata_and_features() {
        let events = events();
        let outcome = filter_events_with(&events, |p| p.x < 5.0);
        let generated = Utc.with_ymd_and_hms(2025, 10, 19, 0, 0, 0).unwrap();
        let collection = FilteredCollection::new(
            outcome,
            &OutputConfig::default(),
            Some("2025-03-28"),
            Some("2025-10-19T00:00:00"),
            generated,
        );

        let mut buf = Vec::new();
        collection.to_writer(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains(": "));
        assert!(!text.contains('\n'));

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["metadata"]["count"], 1);
        assert_eq!(value["metadata"]["bboxCount"], 2);
        assert_eq!(value["metadata"]["generated"], 1760832000000i64);
        assert_eq!(value["metadata"]["starttime"], "2025-03-28");
        assert_eq!(value["metadata"]["source"], "USGS FDSN Event API");
        assert_eq!(value["features"][0], *events[0].as_json());
    }

    #[test]
    fn test_write_to_file() {
        let events = events();
        let outcome = filter_events_with(&events, |_| true);
        let collection =
            FilteredCollection::new(outcome, &OutputConfig::default(), None, None, Utc::now());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.geojson");
        collection.write_to_file(&path).unwrap();

        let value: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["features"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_unlabelled_window_is_left_out() {
        let events = events();
        let outcome = filter_events_with(&events, |_| true);
        let collection =
            FilteredCollection::new(outcome, &OutputConfig::default(), None, None, Utc::now());

        let value = serde_json::to_value(&collection).unwrap();
        let metadata = value["metadata"].as_object().unwrap();
        assert!(!metadata.contains_key("starttime"));
        assert!(!metadata.contains_key("endtime"));
        assert_eq!(metadata["count"], 2);
    }
}
