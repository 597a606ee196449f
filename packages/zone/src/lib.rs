#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zone and ticket decoding plus map layer construction.
//!
//! Turns the raw zones `GeoJSON` feed and the tickets point feed into
//! [`ZoneRecord`]s and [`TicketPoint`]s, then into renderer-ready layers:
//! colored polylines for the regulation and current-status views and a
//! heat layer for ticket density.
//!
//! Features without usable line geometry are kept as records (they can
//! still be classified) but are counted as unrenderable by the layers.

pub mod distance;
pub mod heat;
pub mod layer;

use geojson::{Geometry, Value as GeometryValue};
use park_a_don_zone_models::{Coordinate, TicketPoint, ZoneProperties, ZoneRecord};
use serde_json::Value;
use thiserror::Error;

pub use distance::{distance_miles, nearest_distance_miles};
pub use heat::HeatLayer;
pub use layer::{LatLng, MapLayer, StyledSegment, ZoneSummary};

/// Errors from decoding the zone or ticket feeds.
#[derive(Debug, Error)]
pub enum ZoneError {
    /// Body is not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON, but not a feature collection.
    #[error("Expected a FeatureCollection, got {kind}")]
    NotACollection {
        /// The `type` member that was received.
        kind: String,
    },

    /// Feature collection without a `features` array.
    #[error("FeatureCollection has no features array")]
    MissingFeatures,

    /// Tickets body is not an array of points.
    #[error("Expected an array of ticket points")]
    NotATicketArray,
}

/// Decodes a zones feed (`GeoJSON` `FeatureCollection`) into records.
///
/// Each feature is decoded on its own. A feature with a missing, null,
/// malformed, unsupported, or degenerate geometry is kept with
/// `path: None`, so one bad feature never costs the rest of the feed.
///
/// # Errors
///
/// Returns [`ZoneError`] if the body is not JSON or not a feature
/// collection.
pub fn parse_zone_collection(body: &str) -> Result<Vec<ZoneRecord>, ZoneError> {
    let value: Value = serde_json::from_str(body)?;

    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {}
        Some(kind) => {
            return Err(ZoneError::NotACollection {
                kind: kind.to_string(),
            });
        }
        None => {
            return Err(ZoneError::NotACollection {
                kind: "an untyped value".to_string(),
            });
        }
    }

    let features = value
        .get("features")
        .and_then(Value::as_array)
        .ok_or(ZoneError::MissingFeatures)?;

    let mut geometry_errors = 0_usize;
    let records: Vec<ZoneRecord> = features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            let properties = feature
                .get("properties")
                .and_then(Value::as_object)
                .map(ZoneProperties::from_json)
                .unwrap_or_default();

            let path = match feature.get("geometry") {
                None | Some(Value::Null) => None,
                Some(raw) => match Geometry::from_json_value(raw.clone()) {
                    Ok(geometry) => line_path(&geometry),
                    Err(e) => {
                        log::warn!("Feature {index}: invalid geometry: {e}");
                        geometry_errors += 1;
                        None
                    }
                },
            };

            ZoneRecord { properties, path }
        })
        .collect();

    let renderable = records.iter().filter(|r| r.is_renderable()).count();
    log::debug!(
        "Decoded {} zones ({renderable} with drawable geometry, {geometry_errors} invalid)",
        records.len()
    );

    Ok(records)
}

/// Decodes a tickets feed (`[[lat, lon], ...]`, optionally weighted).
///
/// Rows that are not arrays of at least two numbers are skipped.
///
/// # Errors
///
/// Returns [`ZoneError`] if the body is not a JSON array.
pub fn parse_ticket_points(body: &str) -> Result<Vec<TicketPoint>, ZoneError> {
    let value: Value = serde_json::from_str(body)?;
    let rows = value.as_array().ok_or(ZoneError::NotATicketArray)?;

    let mut points = Vec::with_capacity(rows.len());
    let mut skipped = 0_usize;

    for row in rows {
        let parsed = row.as_array().and_then(|values| {
            let numbers: Option<Vec<f64>> = values.iter().map(Value::as_f64).collect();
            numbers.and_then(|n| TicketPoint::from_values(&n))
        });

        match parsed {
            Some(point) => points.push(point),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} malformed ticket rows");
    }

    Ok(points)
}

/// Extracts a drawable longitude-first path from a line geometry.
///
/// `MultiLineString` parts are concatenated in order. Anything else, or
/// fewer than two positions, is not drawable.
fn line_path(geometry: &Geometry) -> Option<Vec<Coordinate>> {
    let positions: Vec<&Vec<f64>> = match &geometry.value {
        GeometryValue::LineString(line) => line.iter().collect(),
        GeometryValue::MultiLineString(lines) => lines.iter().flatten().collect(),
        _ => {
            log::debug!("Skipping feature with non-line geometry");
            return None;
        }
    };

    let path: Vec<Coordinate> = positions
        .into_iter()
        .filter_map(|p| Coordinate::from_position(p))
        .collect();

    (path.len() >= 2).then_some(path)
}
