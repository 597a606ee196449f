#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parking regulation classifier.
//!
//! Derives the maximum legally parkable duration for a zone from its
//! heterogeneous regulation fields and maps it onto the fixed map legend.
//! The derivation is a priority chain where the first applicable rule wins:
//!
//! 1. an explicit `max_hours` override, returned verbatim;
//! 2. the regulated time window (`hrs_begin`..`hrs_end`), clamped at zero;
//! 3. keywords in the regulation text;
//! 4. otherwise unknown (`None`).
//!
//! Everything here is pure: the result depends only on the record passed
//! in, never on other records or the wall clock. [`availability`] adds the
//! time-dependent "can I park here right now" check on top, taking the
//! moment to evaluate as an explicit argument.

pub mod availability;

use park_a_don_zone_models::ZoneProperties;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use availability::{Availability, applies_on, availability_at, color_for_availability};

/// Regulation keyword groups, checked in order. The first group with any
/// matching substring decides the duration.
const KEYWORD_RULES: &[(&[&str], f64)] = &[
    (&["NO PARKING", "TOW-AWAY", "NO STOPPING"], 0.0),
    (&["1 HR", "1HR", "1 HOUR"], 1.0),
    (&["2 HR", "2HR", "2 HOUR"], 2.0),
    (&["3 HR", "3HR", "3 HOUR"], 3.0),
    (&["4 HR", "4HR", "4 HOUR"], 4.0),
];

/// Map legend buckets for a zone's maximum parking duration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LegendColor {
    /// No parking allowed.
    Red,
    /// One hour limit.
    Yellow,
    /// Two hour limit.
    Orange,
    /// More than two hours.
    Green,
    /// Duration could not be determined.
    Gray,
}

impl LegendColor {
    /// Legend order, as drawn on the map.
    pub const ALL: [Self; 5] = [
        Self::Red,
        Self::Yellow,
        Self::Orange,
        Self::Green,
        Self::Gray,
    ];

    /// CSS hex color code.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Red => "#FF0000",
            Self::Yellow => "#FFFF00",
            Self::Orange => "#FFA500",
            Self::Green => "#00FF00",
            Self::Gray => "#808080",
        }
    }

    /// Legend caption.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "No Parking",
            Self::Yellow => "1 Hour",
            Self::Orange => "2 Hours",
            Self::Green => "3+ Hours",
            Self::Gray => "Unknown",
        }
    }
}

/// One row of the map legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Bucket.
    pub color: LegendColor,
    /// CSS hex color code.
    pub hex: &'static str,
    /// Caption.
    pub label: &'static str,
}

/// Returns the "Parking Duration" legend in display order.
#[must_use]
pub fn legend() -> Vec<LegendEntry> {
    LegendColor::ALL
        .into_iter()
        .map(|color| LegendEntry {
            color,
            hex: color.hex(),
            label: color.label(),
        })
        .collect()
}

/// Determines the maximum parkable duration in hours for a zone.
///
/// Returns `None` when no rule applies. An override is passed through
/// unchecked, so a negative override comes back negative.
#[must_use]
pub fn classify_max_hours(properties: &ZoneProperties) -> Option<f64> {
    if let Some(hours) = properties.max_hours {
        return Some(hours);
    }

    if let Some(hours) = window_hours(properties) {
        return Some(hours);
    }

    properties
        .regulation
        .as_deref()
        .and_then(hours_from_regulation)
}

/// Maps a maximum duration onto its legend bucket.
///
/// Non-positive durations (negative overrides included) are red. Anything
/// that is not exactly one or two hours falls through to green, so `1.5`
/// and `2.5` are both "3+ Hours", as is `NaN`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn color_for_max_hours(hours: Option<f64>) -> LegendColor {
    match hours {
        None => LegendColor::Gray,
        Some(h) if h <= 0.0 => LegendColor::Red,
        Some(h) if h == 1.0 => LegendColor::Yellow,
        Some(h) if h == 2.0 => LegendColor::Orange,
        Some(_) => LegendColor::Green,
    }
}

/// Converts an `HHMM` encoded time of day to fractional hours
/// (`1730` becomes `17.5`).
#[must_use]
pub fn hhmm_to_hours(value: f64) -> f64 {
    (value / 100.0).floor() + (value % 100.0) / 60.0
}

/// Length of the regulated window when both ends are positive.
/// Inverted or empty windows clamp to zero.
fn window_hours(properties: &ZoneProperties) -> Option<f64> {
    let begin = properties.hours_begin.filter(|v| *v > 0.0)?;
    let end = properties.hours_end.filter(|v| *v > 0.0)?;

    let duration = hhmm_to_hours(end) - hhmm_to_hours(begin);
    Some(if duration > 0.0 { duration } else { 0.0 })
}

/// Keyword match on regulation text, case-insensitive.
#[must_use]
pub fn hours_from_regulation(regulation: &str) -> Option<f64> {
    let rule = regulation.to_uppercase();
    KEYWORD_RULES
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| rule.contains(p)))
        .map(|(_, hours)| *hours)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn props(value: serde_json::Value) -> ZoneProperties {
        let serde_json::Value::Object(map) = value else {
            panic!("fixture must be an object");
        };
        ZoneProperties::from_json(&map)
    }

    fn approx(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a duration");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn override_wins_over_everything() {
        let p = props(json!({
            "max_hours": 3,
            "regulation": "NO PARKING ANYTIME",
            "hrs_begin": 800,
            "hrs_end": 1800,
        }));
        approx(classify_max_hours(&p), 3.0);

        let p = props(json!({ "max_hours": 0, "regulation": "4 HR" }));
        approx(classify_max_hours(&p), 0.0);
    }

    #[test]
    fn time_window_fractional_hours() {
        let p = props(json!({ "hrs_begin": 900, "hrs_end": 1730 }));
        approx(classify_max_hours(&p), 8.5);
    }

    #[test]
    fn inverted_window_clamps_to_zero() {
        let p = props(json!({ "hrs_begin": 1730, "hrs_end": 900 }));
        approx(classify_max_hours(&p), 0.0);

        let p = props(json!({ "hrs_begin": 900, "hrs_end": 900 }));
        approx(classify_max_hours(&p), 0.0);
    }

    #[test]
    fn window_takes_priority_over_keywords() {
        let p = props(json!({
            "regulation": "2 HR PARKING 8AM-6PM",
            "hrs_begin": 800,
            "hrs_end": 1800,
        }));
        let hours = classify_max_hours(&p);
        approx(hours, 10.0);
        assert_eq!(color_for_max_hours(hours), LegendColor::Green);
    }

    #[test]
    fn half_window_falls_through_to_keywords() {
        let p = props(json!({ "regulation": "1 hour parking", "hrs_begin": 800 }));
        approx(classify_max_hours(&p), 1.0);
    }

    #[test]
    fn keyword_groups() {
        let cases = [
            ("No Parking Anytime", 0.0),
            ("TOW-AWAY NO PARKING", 0.0),
            ("no stopping 7-9am", 0.0),
            ("1HR PARKING", 1.0),
            ("2hr parking", 2.0),
            ("3 HOUR LIMIT", 3.0),
            ("4 HR", 4.0),
        ];
        for (text, expected) in cases {
            approx(hours_from_regulation(text), expected);
        }
        assert_eq!(hours_from_regulation("GOVERNMENT PERMIT"), None);
    }

    #[test]
    fn no_parking_group_checked_first() {
        approx(
            hours_from_regulation("2 HR PARKING EXCEPT NO PARKING TUE"),
            0.0,
        );
    }

    #[test]
    fn tow_away_end_to_end() {
        let p = props(json!({
            "regulation": "TOW-AWAY NO PARKING",
            "hrs_begin": null,
            "hrs_end": null,
        }));
        let hours = classify_max_hours(&p);
        approx(hours, 0.0);
        assert_eq!(color_for_max_hours(hours).hex(), "#FF0000");
    }

    #[test]
    fn empty_record_is_unknown() {
        let hours = classify_max_hours(&ZoneProperties::default());
        assert_eq!(hours, None);
        assert_eq!(color_for_max_hours(hours).hex(), "#808080");
    }

    #[test]
    fn classification_is_repeatable() {
        let p = props(json!({ "REGULATION": "2 HR", "HRS_BEGIN": "900" }));
        assert_eq!(classify_max_hours(&p), classify_max_hours(&p));
    }

    #[test]
    fn legend_colors() {
        assert_eq!(color_for_max_hours(None).hex(), "#808080");
        assert_eq!(color_for_max_hours(Some(0.0)).hex(), "#FF0000");
        assert_eq!(color_for_max_hours(Some(1.0)).hex(), "#FFFF00");
        assert_eq!(color_for_max_hours(Some(2.0)).hex(), "#FFA500");
        assert_eq!(color_for_max_hours(Some(3.0)).hex(), "#00FF00");
        assert_eq!(color_for_max_hours(Some(2.5)).hex(), "#00FF00");
        assert_eq!(color_for_max_hours(Some(1.5)).hex(), "#00FF00");
    }

    #[test]
    fn legend_is_ordered() {
        let labels: Vec<&str> = legend().iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            ["No Parking", "1 Hour", "2 Hours", "3+ Hours", "Unknown"]
        );
    }

    #[test]
    fn hhmm_conversion() {
        assert!((hhmm_to_hours(1730.0) - 17.5).abs() < 1e-9);
        assert!((hhmm_to_hours(915.0) - 9.25).abs() < 1e-9);
    }
}
