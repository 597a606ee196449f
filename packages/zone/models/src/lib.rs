#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parking zone and ticket point types.
//!
//! Zone data arrives from the upstream regulations feed with inconsistent
//! property naming: the same field may be published as `hrs_begin` or
//! `HRS_BEGIN`, numbers may be encoded as strings, and any field can be
//! missing. [`ZoneProperties::from_json`] normalizes a raw properties bag
//! into typed optional fields so downstream code never has to care which
//! spelling a record used.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw `GeoJSON` properties bag.
pub type JsonObject = serde_json::Map<String, Value>;

/// A WGS84 position. Upstream geometry is longitude-first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from a longitude/latitude pair.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Builds a coordinate from a `GeoJSON` position (`[lon, lat, ...]`).
    ///
    /// Returns `None` when the position has fewer than two elements.
    #[must_use]
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lon, lat, ..] => Some(Self::new(*lon, *lat)),
            _ => None,
        }
    }
}

/// Normalized regulation fields of a single parking zone.
///
/// Every field is optional. Hour fields keep the upstream `HHMM` integer
/// encoding (`900` is 9:00, `1730` is 17:30).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneProperties {
    /// Free-text regulation (e.g. "2 HR PARKING", "TOW-AWAY").
    pub regulation: Option<String>,
    /// Free-text days in effect (e.g. "M-F", "M-SA", "DAILY").
    pub days: Option<String>,
    /// Start of the regulated window, `HHMM`.
    pub hours_begin: Option<f64>,
    /// End of the regulated window, `HHMM`.
    pub hours_end: Option<f64>,
    /// Authoritative maximum duration in hours, bypassing inference.
    pub max_hours: Option<f64>,
    /// Free-text exceptions (e.g. "RPP holders exempt").
    pub exceptions: Option<String>,
    /// Residential permit parking area, if any.
    pub rpp_area: Option<String>,
}

impl ZoneProperties {
    /// Reads a properties bag, tolerating both lowercase and upper-case
    /// key conventions.
    ///
    /// The lowercase key wins when it carries a usable value. A missing,
    /// null, empty, or zero lowercase value falls back to the upper-case
    /// key. The `max_hours` override counts as present whenever it is
    /// numeric, zero included; `MAX_HOURS` is consulted only when
    /// `max_hours` is missing or not a number.
    #[must_use]
    pub fn from_json(properties: &JsonObject) -> Self {
        Self {
            regulation: text_field(properties, "regulation", "REGULATION"),
            days: text_field(properties, "days", "DAYS"),
            hours_begin: numeric_field(properties, "hrs_begin", "HRS_BEGIN"),
            hours_end: numeric_field(properties, "hrs_end", "HRS_END"),
            max_hours: override_field(properties, "max_hours", "MAX_HOURS"),
            exceptions: text_field(properties, "exceptions", "EXCEPTIONS"),
            rpp_area: text_field(properties, "rpparea1", "RPPAREA1"),
        }
    }
}

impl From<&JsonObject> for ZoneProperties {
    fn from(properties: &JsonObject) -> Self {
        Self::from_json(properties)
    }
}

/// One parking-regulation segment as fetched from the zones feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRecord {
    /// Regulation fields.
    pub properties: ZoneProperties,
    /// The drawable path, or `None` when the geometry was absent or
    /// cannot be drawn as a line.
    pub path: Option<Vec<Coordinate>>,
}

impl ZoneRecord {
    /// Whether this record has a path that can be drawn on the map.
    #[must_use]
    pub const fn is_renderable(&self) -> bool {
        self.path.is_some()
    }
}

/// A geo-located ticket observation used for heat-density rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Optional intensity weight.
    pub weight: Option<f64>,
}

impl TicketPoint {
    /// Builds a point from a `[lat, lon]` or `[lat, lon, weight]` array.
    ///
    /// Note the order: unlike zone geometry, the tickets feed is
    /// latitude-first.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        match values {
            [latitude, longitude] => Some(Self {
                latitude: *latitude,
                longitude: *longitude,
                weight: None,
            }),
            [latitude, longitude, weight, ..] => Some(Self {
                latitude: *latitude,
                longitude: *longitude,
                weight: Some(*weight),
            }),
            _ => None,
        }
    }
}

/// Returns the first "truthy" value of `lower` then `upper`.
fn lookup<'a>(properties: &'a JsonObject, lower: &str, upper: &str) -> Option<&'a Value> {
    [lower, upper]
        .into_iter()
        .filter_map(|key| properties.get(key))
        .find(|value| is_truthy(value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text_field(properties: &JsonObject, lower: &str, upper: &str) -> Option<String> {
    lookup(properties, lower, upper).map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn numeric_field(properties: &JsonObject, lower: &str, upper: &str) -> Option<f64> {
    lookup(properties, lower, upper).and_then(as_number)
}

fn override_field(properties: &JsonObject, lower: &str, upper: &str) -> Option<f64> {
    [lower, upper]
        .into_iter()
        .find_map(|key| properties.get(key).and_then(as_number))
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn props(value: Value) -> ZoneProperties {
        let Value::Object(map) = value else {
            panic!("fixture must be an object");
        };
        ZoneProperties::from_json(&map)
    }

    #[test]
    fn prefers_lowercase_keys() {
        let p = props(json!({
            "regulation": "2 HR PARKING",
            "REGULATION": "NO PARKING ANYTIME",
            "hrs_begin": 800,
            "HRS_BEGIN": 900,
        }));
        assert_eq!(p.regulation.as_deref(), Some("2 HR PARKING"));
        assert_eq!(p.hours_begin, Some(800.0));
    }

    #[test]
    fn falls_back_to_uppercase_keys() {
        let p = props(json!({
            "regulation": null,
            "REGULATION": "TOW-AWAY",
            "hrs_end": 0,
            "HRS_END": 1800,
            "DAYS": "M-F",
            "RPPAREA1": "N",
        }));
        assert_eq!(p.regulation.as_deref(), Some("TOW-AWAY"));
        assert_eq!(p.hours_end, Some(1800.0));
        assert_eq!(p.days.as_deref(), Some("M-F"));
        assert_eq!(p.rpp_area.as_deref(), Some("N"));
    }

    #[test]
    fn parses_numeric_strings() {
        let p = props(json!({ "hrs_begin": "900", "hrs_end": " 1730 " }));
        assert_eq!(p.hours_begin, Some(900.0));
        assert_eq!(p.hours_end, Some(1730.0));

        let p = props(json!({ "hrs_begin": "nine" }));
        assert_eq!(p.hours_begin, None);
    }

    #[test]
    fn zero_override_is_present() {
        let p = props(json!({ "max_hours": 0 }));
        assert_eq!(p.max_hours, Some(0.0));

        let p = props(json!({ "max_hours": null }));
        assert_eq!(p.max_hours, None);
    }

    #[test]
    fn override_falls_back_to_uppercase_key() {
        let p = props(json!({ "MAX_HOURS": 3 }));
        assert_eq!(p.max_hours, Some(3.0));

        let p = props(json!({ "max_hours": null, "MAX_HOURS": "2" }));
        assert_eq!(p.max_hours, Some(2.0));

        let p = props(json!({ "max_hours": 0, "MAX_HOURS": 4 }));
        assert_eq!(p.max_hours, Some(0.0));
    }

    #[test]
    fn empty_bag_is_all_none() {
        assert_eq!(props(json!({})), ZoneProperties::default());
    }

    #[test]
    fn ticket_point_from_values() {
        assert_eq!(
            TicketPoint::from_values(&[37.77, -122.45]),
            Some(TicketPoint {
                latitude: 37.77,
                longitude: -122.45,
                weight: None,
            })
        );
        assert_eq!(
            TicketPoint::from_values(&[37.77, -122.45, 0.5]).and_then(|p| p.weight),
            Some(0.5)
        );
        assert_eq!(TicketPoint::from_values(&[37.77]), None);
    }

    #[test]
    fn coordinate_from_position_is_longitude_first() {
        let c = Coordinate::from_position(&[-122.45, 37.77, 12.0]).unwrap();
        assert!((c.longitude - -122.45).abs() < f64::EPSILON);
        assert!((c.latitude - 37.77).abs() < f64::EPSILON);
        assert!(Coordinate::from_position(&[1.0]).is_none());
    }
}
