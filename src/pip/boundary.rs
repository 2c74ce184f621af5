//! Boundary extraction from GeoJSON.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::GeometryError;
use crate::models::{MultiPolygon, Polygon, Ring};

/// Load the boundary polygons from a GeoJSON file.
///
/// See [`parse_boundary`] for what is accepted.
pub fn load_boundary<P: AsRef<Path>>(path: P) -> Result<MultiPolygon, GeometryError> {
    let path = path.as_ref();
    info!("Loading boundary from {}", path.display());

    let content = fs::read_to_string(path)?;
    let data: Value = serde_json::from_str(&content)?;

    parse_boundary(&data).map_err(|e| match e {
        GeometryError::NoGeometry(_) => GeometryError::NoGeometry(path.display().to_string()),
        other => other,
    })
}

/// Collect every polygon of a GeoJSON document into one multipolygon.
///
/// The document may be a FeatureCollection, a single Feature, or a bare
/// geometry. `Polygon` adds one part, `MultiPolygon` adds all of its parts,
/// and `GeometryCollection` is walked. Anything else is ignored, as is a
/// geometry whose coordinates are not nested arrays of numeric positions.
/// Positions keep their first two numbers.
///
/// Fails with [`GeometryError::NoGeometry`] if no polygon is found.
pub fn parse_boundary(data: &Value) -> Result<MultiPolygon, GeometryError> {
    let mut multipolygon = MultiPolygon::default();

    match data.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let features = data
                .get("features")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            for (idx, feature) in features.iter().enumerate() {
                debug!("Reading boundary feature {}", idx);
                collect_feature(feature, &mut multipolygon);
            }
        }
        Some("Feature") => collect_feature(data, &mut multipolygon),
        Some(_) => collect_geometry(data, &mut multipolygon),
        None => {}
    }

    if multipolygon.is_empty() {
        return Err(GeometryError::NoGeometry("boundary document".to_string()));
    }

    info!(
        "Loaded boundary with {} polygons ({} vertices)",
        multipolygon.len(),
        multipolygon.vertex_count()
    );

    Ok(multipolygon)
}

fn collect_feature(feature: &Value, out: &mut MultiPolygon) {
    if let Some(geometry) = feature.get("geometry") {
        collect_geometry(geometry, out);
    }
}

fn collect_geometry(geometry: &Value, out: &mut MultiPolygon) {
    let geometry_type = geometry.get("type").and_then(Value::as_str);
    let coordinates = geometry.get("coordinates");

    match (geometry_type, coordinates) {
        (Some("Polygon"), Some(coords)) => match parse_polygon(coords) {
            Some(poly) => push_usable(poly, out),
            None => warn!("Skipping Polygon with malformed coordinates"),
        },
        (Some("MultiPolygon"), Some(coords)) => {
            let parts: Option<Vec<Polygon>> = coords
                .as_array()
                .and_then(|polys| polys.iter().map(parse_polygon).collect());
            match parts {
                Some(parts) => parts.into_iter().for_each(|p| push_usable(p, out)),
                None => warn!("Skipping MultiPolygon with malformed coordinates"),
            }
        }
        (Some("GeometryCollection"), _) => {
            let members = geometry
                .get("geometries")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            for member in members {
                collect_geometry(member, out);
            }
        }
        (Some(other), _) => debug!("Ignoring {} geometry in boundary", other),
        (None, _) => warn!("Skipping geometry without a type"),
    }
}

/// Polygons without a single vertex contain nothing and would only turn a
/// missing boundary into an empty region later on.
fn push_usable(polygon: Polygon, out: &mut MultiPolygon) {
    if polygon.vertex_count() == 0 {
        warn!("Skipping Polygon without vertices");
        return;
    }
    out.push(polygon);
}

fn parse_polygon(value: &Value) -> Option<Polygon> {
    let rings = value
        .as_array()?
        .iter()
        .map(parse_ring)
        .collect::<Option<Vec<Ring>>>()?;
    Some(Polygon::new(rings))
}

fn parse_ring(value: &Value) -> Option<Ring> {
    let vertices = value
        .as_array()?
        .iter()
        .map(|position| {
            let position = position.as_array()?;
            Some(geo_types::Coord {
                x: position.first()?.as_f64()?,
                y: position.get(1)?.as_f64()?,
            })
        })
        .collect::<Option<Vec<_>>>()?;
    Some(Ring::new(vertices))
}
