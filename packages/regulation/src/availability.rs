//! Whether a zone can be parked in at a specific moment.
//!
//! Backs the "current status" map view. Regulations only bind on the days
//! and hours they name; outside those the curb is unrestricted.

use chrono::{Datelike as _, NaiveDateTime, Timelike as _, Weekday};
use park_a_don_zone_models::ZoneProperties;
use serde::{Deserialize, Serialize};

use crate::{LegendColor, classify_max_hours, color_for_max_hours};

/// Parking availability of a zone at a moment in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    /// Whether parking is allowed at all.
    pub allowed: bool,
    /// Time limit in hours, `None` when unrestricted or unknown.
    pub max_hours: Option<f64>,
}

impl Availability {
    /// Parking allowed with no limit.
    pub const UNRESTRICTED: Self = Self {
        allowed: true,
        max_hours: None,
    };

    /// Parking prohibited.
    pub const PROHIBITED: Self = Self {
        allowed: false,
        max_hours: Some(0.0),
    };

    /// Whether parking is allowed without a time limit.
    #[must_use]
    pub const fn is_unrestricted(&self) -> bool {
        self.allowed && self.max_hours.is_none()
    }
}

/// Evaluates a zone's regulation at `at` (local time).
#[must_use]
pub fn availability_at(properties: &ZoneProperties, at: NaiveDateTime) -> Availability {
    if !applies_on(properties.days.as_deref(), at.weekday()) {
        return Availability::UNRESTRICTED;
    }

    let prohibited = properties
        .regulation
        .as_deref()
        .is_some_and(prohibits_parking);

    let window = properties
        .hours_begin
        .zip(properties.hours_end)
        .filter(|(begin, end)| *begin != 0.0 && *end != 0.0);

    if let Some((begin, end)) = window {
        let now = f64::from(at.hour() * 100 + at.minute());
        if now < begin || now > end {
            return Availability::UNRESTRICTED;
        }
    }

    if prohibited {
        return Availability::PROHIBITED;
    }

    Availability {
        allowed: true,
        max_hours: classify_max_hours(properties),
    }
}

/// Whether a regulation with the given days-in-effect text binds on
/// `weekday`. Missing or empty text binds every day.
///
/// Recognizes the range forms `M-F`, `M-SA`, and `SA-SU`, otherwise looks
/// for the day's short code (`M`, `TU`, `W`, `TH`, `F`, `SA`, `SU`) or
/// `DAILY` anywhere in the text.
#[must_use]
pub fn applies_on(days: Option<&str>, weekday: Weekday) -> bool {
    let Some(days) = days.map(str::to_uppercase).filter(|d| !d.is_empty()) else {
        return true;
    };

    let is_weekend = matches!(weekday, Weekday::Sat | Weekday::Sun);

    if days.contains("M-F") {
        !is_weekend
    } else if days.contains("M-SA") {
        weekday != Weekday::Sun
    } else if days.contains("SA-SU") || days == "SA" || days == "SU" {
        is_weekend
    } else {
        days.contains(day_code(weekday)) || days.contains("DAILY")
    }
}

/// Legend bucket for the "current status" view.
#[must_use]
pub fn color_for_availability(availability: &Availability) -> LegendColor {
    if !availability.allowed {
        return LegendColor::Red;
    }
    match availability.max_hours {
        None => LegendColor::Green,
        hours => color_for_max_hours(hours),
    }
}

fn prohibits_parking(regulation: &str) -> bool {
    let rule = regulation.to_uppercase();
    rule.contains("NO PARKING") || rule.contains("TOW-AWAY")
}

const fn day_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "M",
        Weekday::Tue => "TU",
        Weekday::Wed => "W",
        Weekday::Thu => "TH",
        Weekday::Fri => "F",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}
