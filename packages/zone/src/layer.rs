//! Renderer-ready polyline layers.
//!
//! A [`MapLayer`] is what a map widget needs to draw the zones: one
//! [`StyledSegment`] per drawable zone with its stroke style and popup
//! content. Two views exist: durations from the regulation classifier,
//! and current availability at a given moment.

use std::fmt;

use chrono::NaiveDateTime;
use park_a_don_regulation::{
    Availability, LegendColor, availability_at, classify_max_hours, color_for_availability,
    color_for_max_hours,
};
use park_a_don_zone_models::{Coordinate, ZoneProperties, ZoneRecord};
use serde::Serialize;

/// Stroke weight for the regulation view.
pub const REGULATION_STROKE_WEIGHT: u8 = 6;

/// Stroke weight for the current-status view.
pub const STATUS_STROKE_WEIGHT: u8 = 4;

/// A latitude-first position, as map widgets expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl From<Coordinate> for LatLng {
    fn from(c: Coordinate) -> Self {
        Self {
            lat: c.latitude,
            lng: c.longitude,
        }
    }
}

/// One drawable zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledSegment {
    /// Polyline path.
    pub path: Vec<LatLng>,
    /// Legend bucket.
    pub color: LegendColor,
    /// CSS hex stroke color.
    pub stroke_color: &'static str,
    /// Stroke weight in pixels.
    pub stroke_weight: u8,
    /// Stroke opacity, 0.0 to 1.0.
    pub stroke_opacity: f64,
    /// Classified maximum duration.
    pub max_hours: Option<f64>,
    /// Availability, for the current-status view only.
    pub availability: Option<Availability>,
    /// Popup content.
    pub summary: ZoneSummary,
}

/// A set of styled segments plus bookkeeping on what could not be drawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLayer {
    /// Drawable segments in feed order.
    pub segments: Vec<StyledSegment>,
    /// Records skipped for lack of drawable geometry.
    pub unrenderable: usize,
}

impl MapLayer {
    /// Builds the regulation (max duration) view.
    #[must_use]
    pub fn regulations(records: &[ZoneRecord]) -> Self {
        Self::build(records, REGULATION_STROKE_WEIGHT, |properties| {
            let hours = classify_max_hours(properties);
            (color_for_max_hours(hours), hours, None)
        })
    }

    /// Builds the current-status view as of `at`.
    #[must_use]
    pub fn current_status(records: &[ZoneRecord], at: NaiveDateTime) -> Self {
        let layer = Self::build(records, STATUS_STROKE_WEIGHT, |properties| {
            let availability = availability_at(properties, at);
            (
                color_for_availability(&availability),
                availability.max_hours,
                Some(availability),
            )
        });

        log::debug!(
            "Current status at {at}: {} allowed, {} restricted",
            layer.allowed_count(),
            layer.segments.len() - layer.allowed_count()
        );

        layer
    }

    /// Number of segments per legend bucket, in legend order.
    #[must_use]
    pub fn counts_by_color(&self) -> Vec<(LegendColor, usize)> {
        LegendColor::ALL
            .into_iter()
            .map(|color| {
                let count = self.segments.iter().filter(|s| s.color == color).count();
                (color, count)
            })
            .collect()
    }

    /// Segments where parking is currently allowed. Regulation-view
    /// segments carry no availability and are never counted.
    #[must_use]
    pub fn allowed_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.availability.is_some_and(|a| a.allowed))
            .count()
    }

    fn build<F>(records: &[ZoneRecord], stroke_weight: u8, style: F) -> Self
    where
        F: Fn(&ZoneProperties) -> (LegendColor, Option<f64>, Option<Availability>),
    {
        let mut layer = Self::default();

        for record in records {
            let Some(path) = &record.path else {
                layer.unrenderable += 1;
                continue;
            };

            let (color, max_hours, availability) = style(&record.properties);

            layer.segments.push(StyledSegment {
                path: path.iter().copied().map(LatLng::from).collect(),
                color,
                stroke_color: color.hex(),
                stroke_weight,
                stroke_opacity: 1.0,
                max_hours,
                availability,
                summary: ZoneSummary::new(&record.properties, max_hours),
            });
        }

        layer
    }
}

/// Popup content for a zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSummary {
    /// Regulation text.
    pub regulation: Option<String>,
    /// Days in effect.
    pub days: Option<String>,
    /// Start of the regulated window, `HHMM`.
    pub hours_begin: Option<f64>,
    /// End of the regulated window, `HHMM`.
    pub hours_end: Option<f64>,
    /// Classified maximum duration.
    pub max_hours: Option<f64>,
    /// Exceptions text.
    pub exceptions: Option<String>,
    /// Residential permit area.
    pub rpp_area: Option<String>,
}

impl ZoneSummary {
    /// Captures the displayable fields of a zone.
    #[must_use]
    pub fn new(properties: &ZoneProperties, max_hours: Option<f64>) -> Self {
        Self {
            regulation: properties.regulation.clone(),
            days: properties.days.clone(),
            hours_begin: properties.hours_begin,
            hours_end: properties.hours_end,
            max_hours,
            exceptions: properties.exceptions.clone(),
            rpp_area: properties.rpp_area.clone(),
        }
    }
}

impl fmt::Display for ZoneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Regulation: {}", or_na(self.regulation.as_deref()))?;
        writeln!(f, "Days: {}", or_na(self.days.as_deref()))?;
        writeln!(
            f,
            "Hours: {} - {}",
            self.hours_begin.map_or_else(|| "N/A".to_string(), |h| h.to_string()),
            self.hours_end.map_or_else(|| "N/A".to_string(), |h| h.to_string()),
        )?;
        match self.max_hours {
            Some(hours) => write!(f, "Max Parking: {hours} hours")?,
            None => write!(f, "Max Parking: Unknown")?,
        }
        if let Some(exceptions) = &self.exceptions {
            write!(f, "\nExceptions: {exceptions}")?;
        }
        if let Some(area) = &self.rpp_area {
            write!(f, "\nRPP Area: {area}")?;
        }
        Ok(())
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(regulation: &str, path: Option<Vec<Coordinate>>) -> ZoneRecord {
        ZoneRecord {
            properties: ZoneProperties {
                regulation: Some(regulation.to_string()),
                ..ZoneProperties::default()
            },
            path,
        }
    }

    fn line() -> Option<Vec<Coordinate>> {
        Some(vec![
            Coordinate::new(-122.45, 37.77),
            Coordinate::new(-122.46, 37.78),
        ])
    }

    #[test]
    fn regulation_layer_styles_and_skips() {
        let records = vec![
            record("1 HR PARKING", line()),
            record("NO PARKING", line()),
            record("2 HR", None),
        ];
        let layer = MapLayer::regulations(&records);

        assert_eq!(layer.segments.len(), 2);
        assert_eq!(layer.unrenderable, 1);

        let first = &layer.segments[0];
        assert_eq!(first.stroke_color, "#FFFF00");
        assert_eq!(first.stroke_weight, REGULATION_STROKE_WEIGHT);
        assert_eq!(first.path[0], LatLng { lat: 37.77, lng: -122.45 });
        assert!(first.availability.is_none());

        let counts = layer.counts_by_color();
        assert_eq!(counts[0], (LegendColor::Red, 1));
        assert_eq!(counts[1], (LegendColor::Yellow, 1));
    }

    #[test]
    fn status_layer_tracks_availability() {
        let at = NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let records = vec![record("NO PARKING", line()), record("4 HR", line())];
        let layer = MapLayer::current_status(&records, at);

        assert_eq!(layer.segments[0].color, LegendColor::Red);
        assert_eq!(layer.segments[1].color, LegendColor::Green);
        assert_eq!(layer.segments[1].stroke_weight, STATUS_STROKE_WEIGHT);
        assert_eq!(layer.allowed_count(), 1);
    }

    #[test]
    fn summary_text() {
        let properties = ZoneProperties {
            regulation: Some("2 HR PARKING".to_string()),
            days: Some("M-F".to_string()),
            hours_begin: Some(900.0),
            hours_end: Some(1730.0),
            rpp_area: Some("N".to_string()),
            ..ZoneProperties::default()
        };
        let summary = ZoneSummary::new(&properties, Some(8.5));
        assert_eq!(
            summary.to_string(),
            "Regulation: 2 HR PARKING\nDays: M-F\nHours: 900 - 1730\n\
             Max Parking: 8.5 hours\nRPP Area: N"
        );

        let empty = ZoneSummary::new(&ZoneProperties::default(), None);
        assert_eq!(
            empty.to_string(),
            "Regulation: N/A\nDays: N/A\nHours: N/A - N/A\nMax Parking: Unknown"
        );
    }
}
