#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Response types for the parking backend API.
//!
//! The backend owns these shapes; the client only decodes and displays
//! them. Keys are `snake_case` on the wire. Optional blocks may be
//! missing entirely depending on how much data the backend has for a
//! street.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Identifier of a ticket cluster zone. The backend has used both
/// numeric cluster IDs and street names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoneId {
    /// Numeric cluster ID.
    Number(i64),
    /// Named zone.
    Name(String),
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Name(s) => f.write_str(s),
        }
    }
}

/// Categorical ticket risk.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum RiskLevel {
    /// Safe to park.
    Low,
    /// Park with caution.
    Medium,
    /// Avoid parking.
    High,
}

/// Ticket risk assessment for a queried street.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Zone the street was matched to.
    pub zone_id: ZoneId,
    /// Risk score, 0-100 by convention.
    pub risk_score: f64,
    /// Categorical level as sent by the backend (e.g. "Medium").
    pub risk_level: String,
    /// Severity color, CSS hex.
    pub risk_color: String,
    /// Human-readable advice.
    pub recommendation: String,
    /// Address the street query resolved to.
    #[serde(default)]
    pub matched_address: Option<String>,
    /// Whether the current time is the zone's peak ticketing time.
    #[serde(default)]
    pub is_peak_time: Option<bool>,
    /// When tickets are most often issued.
    #[serde(default)]
    pub peak_info: Option<PeakInfo>,
    /// Historical ticket statistics.
    #[serde(default)]
    pub statistics: Option<RiskStatistics>,
    /// Zone centroid.
    #[serde(default)]
    pub location: Option<RiskLocation>,
    /// When the assessment was computed.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<NaiveDateTime>,
}

impl RiskAssessment {
    /// Parses [`Self::risk_level`], `None` for levels this client does not
    /// know about.
    #[must_use]
    pub fn level(&self) -> Option<RiskLevel> {
        self.risk_level.parse().ok()
    }
}

/// Peak ticketing time of a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakInfo {
    /// Day name (e.g. "Tuesday").
    pub day: String,
    /// Hour of day, 0-23.
    pub hour: u8,
}

/// Historical ticket statistics of a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskStatistics {
    /// Tickets observed in the data period.
    pub total_tickets: u64,
    /// Average tickets per day.
    pub tickets_per_day: f64,
    /// Length of the data period.
    pub data_period_days: u64,
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLocation {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Which derived map artifact to regenerate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MapKind {
    /// Parking allowed right now.
    Current,
    /// Regulations plus ticket heat and clusters.
    Combined,
}

/// Response of a map regeneration trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRegeneration {
    /// Whether the artifact was rebuilt.
    pub success: bool,
    /// When the artifact was rebuilt.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<NaiveDateTime>,
    /// Failure reason when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Failure message.
    pub error: String,
}

/// Accepts naive ISO 8601 timestamps as well as ones with an offset
/// (converted to the offset's local time). Anything unparseable is `None`
/// rather than failing the whole response.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        s.parse::<NaiveDateTime>()
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(&s)
                    .ok()
                    .map(|dt| dt.naive_local())
            })
    }))
}
