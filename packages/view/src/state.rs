//! View state and its reducer.
//!
//! All UI state lives in one serializable [`ViewState`] value. The only
//! way to change it is [`reduce`], which takes the current state and an
//! [`Action`] and returns the next state.

use park_a_don_api_models::{MapKind, RiskAssessment};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::filters::{AvailabilityFilter, DayFilter, Filters, ParkingTypeFilter, PriceFilter};

/// Which filter dropdown is open.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilterKind {
    Day,
    Availability,
    Price,
    Distance,
    ParkingType,
    MapView,
}

/// What the map shows.
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
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum MapView {
    /// Zones colored by maximum duration.
    #[default]
    Regulations,
    /// Zones colored by whether parking is allowed right now.
    CurrentStatus,
    /// Ticket density.
    Heatmap,
    /// Regulations plus ticket density.
    Combined,
}

impl MapView {
    /// The backend map artifact behind this view, if it has one.
    #[must_use]
    pub const fn regeneration_kind(self) -> Option<MapKind> {
        match self {
            Self::CurrentStatus => Some(MapKind::Current),
            Self::Combined => Some(MapKind::Combined),
            Self::Regulations | Self::Heatmap => None,
        }
    }
}

/// The risk-check panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RiskPanel {
    #[default]
    Closed,
    Loading {
        street: String,
    },
    Loaded {
        street: String,
        assessment: Box<RiskAssessment>,
    },
    Failed {
        street: String,
        message: String,
    },
}

impl RiskPanel {
    /// Whether a lookup for `street` is in flight.
    #[must_use]
    pub fn is_loading(&self, street: &str) -> bool {
        matches!(self, Self::Loading { street: s } if s == street)
    }
}

/// Complete UI state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    /// Open dropdown, at most one.
    pub open_dropdown: Option<FilterKind>,
    /// Active filters.
    pub filters: Filters,
    /// Map view.
    pub map_view: MapView,
    /// Changes whenever the embedded map must be reloaded.
    pub map_reload_key: u64,
    /// Risk-check panel.
    pub risk: RiskPanel,
}

/// Everything that can happen to the view.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ToggleDropdown(FilterKind),
    CloseDropdowns,
    SetDay(DayFilter),
    SetAvailability(AvailabilityFilter),
    SetPrice(PriceFilter),
    SetMaxDistance(Option<f64>),
    SetParkingType(ParkingTypeFilter),
    ResetFilters,
    SetMapView(MapView),
    /// The backend finished rebuilding a map artifact.
    MapRegenerated(MapKind),
    /// The user submitted a street for a risk check.
    RiskRequested(String),
    RiskLoaded {
        street: String,
        assessment: Box<RiskAssessment>,
    },
    RiskFailed {
        street: String,
        message: String,
    },
    CloseRisk,
}

/// Computes the next state.
///
/// Choosing any filter value closes the open dropdown. Risk results are
/// only accepted while the panel is still loading that same street, so a
/// response to an abandoned or superseded query is dropped.
#[must_use]
pub fn reduce(mut state: ViewState, action: Action) -> ViewState {
    match action {
        Action::ToggleDropdown(kind) => {
            state.open_dropdown = if state.open_dropdown == Some(kind) {
                None
            } else {
                Some(kind)
            };
        }
        Action::CloseDropdowns => state.open_dropdown = None,
        Action::SetDay(day) => {
            state.filters.day = day;
            state.open_dropdown = None;
        }
        Action::SetAvailability(availability) => {
            state.filters.availability = availability;
            state.open_dropdown = None;
        }
        Action::SetPrice(price) => {
            state.filters.price = price;
            state.open_dropdown = None;
        }
        Action::SetMaxDistance(miles) => {
            state.filters.max_distance_miles = miles.filter(|m| m.is_finite() && *m >= 0.0);
            state.open_dropdown = None;
        }
        Action::SetParkingType(parking_type) => {
            state.filters.parking_type = parking_type;
            state.open_dropdown = None;
        }
        Action::ResetFilters => {
            state.filters = Filters::default();
            state.open_dropdown = None;
        }
        Action::SetMapView(view) => {
            if state.map_view != view {
                state.map_view = view;
                state.map_reload_key = state.map_reload_key.wrapping_add(1);
            }
            state.open_dropdown = None;
        }
        Action::MapRegenerated(kind) => {
            if state.map_view.regeneration_kind() == Some(kind) {
                state.map_reload_key = state.map_reload_key.wrapping_add(1);
            }
        }
        Action::RiskRequested(street) => {
            let street = street.trim().to_string();
            state.risk = if street.is_empty() {
                RiskPanel::Failed {
                    street,
                    message: "Please enter a street name".to_string(),
                }
            } else {
                RiskPanel::Loading { street }
            };
        }
        Action::RiskLoaded { street, assessment } => {
            if state.risk.is_loading(&street) {
                state.risk = RiskPanel::Loaded { street, assessment };
            } else {
                log::debug!("Dropping stale risk result for {street:?}");
            }
        }
        Action::RiskFailed { street, message } => {
            if state.risk.is_loading(&street) {
                state.risk = RiskPanel::Failed { street, message };
            } else {
                log::debug!("Dropping stale risk failure for {street:?}");
            }
        }
        Action::CloseRisk => state.risk = RiskPanel::Closed,
    }

    state
}
