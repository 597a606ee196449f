//! Zone filters.
//!
//! The day filter does not hide zones by itself: it moves the moment used
//! for availability to the chosen weekday (same time of day, within the
//! coming week), so "Saturday" plus "available" answers "where can I park
//! on Saturday at this time".

use chrono::{Datelike as _, Days, NaiveDateTime, Weekday};
use park_a_don_regulation::{availability_at, classify_max_hours};
use park_a_don_zone::nearest_distance_miles;
use park_a_don_zone_models::{Coordinate, ZoneRecord};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Day selector.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DayFilter {
    /// Evaluate at the current moment.
    #[default]
    All,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayFilter {
    /// The selected weekday, if any.
    #[must_use]
    pub const fn weekday(self) -> Option<Weekday> {
        match self {
            Self::All => None,
            Self::Monday => Some(Weekday::Mon),
            Self::Tuesday => Some(Weekday::Tue),
            Self::Wednesday => Some(Weekday::Wed),
            Self::Thursday => Some(Weekday::Thu),
            Self::Friday => Some(Weekday::Fri),
            Self::Saturday => Some(Weekday::Sat),
            Self::Sunday => Some(Weekday::Sun),
        }
    }
}

/// Availability selector.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AvailabilityFilter {
    #[default]
    All,
    /// Parking allowed with no time limit.
    Available,
    /// Parking allowed with a time limit.
    Limited,
    /// No parking.
    Full,
}

/// Price selector. Metered zones are recognized from the regulation text.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PriceFilter {
    #[default]
    All,
    Free,
    Metered,
}

/// Parking type selector.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ParkingTypeFilter {
    #[default]
    All,
    /// A positive maximum duration.
    TimeLimited,
    /// A zero maximum duration.
    NoParking,
    /// Inside a residential permit area.
    Permit,
}

/// The active filter set. The default lets everything through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filters {
    /// Day selector.
    pub day: DayFilter,
    /// Availability selector.
    pub availability: AvailabilityFilter,
    /// Price selector.
    pub price: PriceFilter,
    /// Maximum distance from the origin, in miles.
    pub max_distance_miles: Option<f64>,
    /// Parking type selector.
    pub parking_type: ParkingTypeFilter,
}

impl Filters {
    /// Whether no filter is narrowing the result.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }

    /// The moment availability is evaluated at: `now`, moved forward to
    /// the selected weekday when a day is chosen.
    #[must_use]
    pub fn evaluation_time(&self, now: NaiveDateTime) -> NaiveDateTime {
        let Some(target) = self.day.weekday() else {
            return now;
        };
        let offset = (target.num_days_from_monday() + 7 - now.weekday().num_days_from_monday()) % 7;
        now.checked_add_days(Days::new(u64::from(offset)))
            .unwrap_or(now)
    }

    /// Whether `record` passes every active filter.
    #[must_use]
    pub fn matches(&self, record: &ZoneRecord, now: NaiveDateTime, origin: Coordinate) -> bool {
        self.matches_availability(record, now)
            && self.matches_price(record)
            && self.matches_parking_type(record)
            && self.matches_distance(record, origin)
    }

    /// Records passing every active filter, in input order.
    #[must_use]
    pub fn apply(
        &self,
        records: &[ZoneRecord],
        now: NaiveDateTime,
        origin: Coordinate,
    ) -> Vec<ZoneRecord> {
        let kept: Vec<ZoneRecord> = records
            .iter()
            .filter(|r| self.matches(r, now, origin))
            .cloned()
            .collect();
        log::debug!("Filters kept {} of {} zones", kept.len(), records.len());
        kept
    }

    fn matches_availability(&self, record: &ZoneRecord, now: NaiveDateTime) -> bool {
        if self.availability == AvailabilityFilter::All {
            return true;
        }
        let availability = availability_at(&record.properties, self.evaluation_time(now));
        let no_parking = !availability.allowed || availability.max_hours.is_some_and(|h| h <= 0.0);

        match self.availability {
            AvailabilityFilter::All => true,
            AvailabilityFilter::Available => availability.is_unrestricted(),
            AvailabilityFilter::Limited => !no_parking && availability.max_hours.is_some(),
            AvailabilityFilter::Full => no_parking,
        }
    }

    fn matches_price(&self, record: &ZoneRecord) -> bool {
        let metered = record
            .properties
            .regulation
            .as_deref()
            .is_some_and(|r| r.to_uppercase().contains("METER"));

        match self.price {
            PriceFilter::All => true,
            PriceFilter::Free => !metered,
            PriceFilter::Metered => metered,
        }
    }

    fn matches_parking_type(&self, record: &ZoneRecord) -> bool {
        match self.parking_type {
            ParkingTypeFilter::All => true,
            ParkingTypeFilter::TimeLimited => {
                classify_max_hours(&record.properties).is_some_and(|h| h > 0.0)
            }
            ParkingTypeFilter::NoParking => {
                classify_max_hours(&record.properties).is_some_and(|h| h <= 0.0)
            }
            ParkingTypeFilter::Permit => record.properties.rpp_area.is_some(),
        }
    }

    /// Zones without a drawable path have no position and fail any
    /// distance limit.
    fn matches_distance(&self, record: &ZoneRecord, origin: Coordinate) -> bool {
        let Some(limit) = self.max_distance_miles else {
            return true;
        };
        record
            .path
            .as_deref()
            .and_then(|path| nearest_distance_miles(path, origin))
            .is_some_and(|d| d <= limit)
    }
}
