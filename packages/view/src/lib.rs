#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Front-end state for Park-A-Don.
//!
//! UI state is one serializable [`ViewState`] updated only through
//! [`reduce`]. [`Filters`] narrows zone records, and [`visible_layer`]
//! turns the filtered records into the layer for the selected
//! [`MapView`].

pub mod effects;
pub mod filters;
pub mod state;

use chrono::NaiveDateTime;
use park_a_don_zone::MapLayer;
use park_a_don_zone_models::{Coordinate, ZoneRecord};

pub use effects::{query_risk, regenerate_map};
pub use filters::{AvailabilityFilter, DayFilter, Filters, ParkingTypeFilter, PriceFilter};
pub use state::{Action, FilterKind, MapView, RiskPanel, ViewState, reduce};

/// Filters `records` and styles them for the active view.
///
/// The current-status view colors by availability at the filters'
/// evaluation time; every other view colors by maximum duration.
#[must_use]
pub fn visible_layer(
    state: &ViewState,
    records: &[ZoneRecord],
    now: NaiveDateTime,
    origin: Coordinate,
) -> MapLayer {
    let kept = state.filters.apply(records, now, origin);
    match state.map_view {
        MapView::CurrentStatus => {
            MapLayer::current_status(&kept, state.filters.evaluation_time(now))
        }
        MapView::Regulations | MapView::Heatmap | MapView::Combined => {
            MapLayer::regulations(&kept)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use park_a_don_regulation::LegendColor;
    use park_a_don_zone_models::ZoneProperties;

    use super::*;

    const ORIGIN: Coordinate = Coordinate::new(-122.4505, 37.7763);

    fn record(regulation: &str, days: &str) -> ZoneRecord {
        ZoneRecord {
            properties: ZoneProperties {
                regulation: Some(regulation.to_string()),
                days: Some(days.to_string()),
                ..ZoneProperties::default()
            },
            path: Some(vec![ORIGIN, Coordinate::new(-122.4510, 37.7765)]),
        }
    }

    #[test]
    fn current_status_uses_selected_day() {
        // 2025-03-05 is a Wednesday.
        let now = NaiveDate::from_ymd_opt(2025, 3, 5)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let records = vec![record("NO PARKING", "M-F"), record("2 HR", "M-F")];

        let state = reduce(
            ViewState::default(),
            Action::SetMapView(MapView::CurrentStatus),
        );
        let layer = visible_layer(&state, &records, now, ORIGIN);
        assert_eq!(layer.segments[0].color, LegendColor::Red);
        assert_eq!(layer.segments[1].color, LegendColor::Orange);

        let state = reduce(state, Action::SetDay(DayFilter::Sunday));
        let layer = visible_layer(&state, &records, now, ORIGIN);
        assert!(layer.segments.iter().all(|s| s.color == LegendColor::Green));
    }

    #[test]
    fn regulations_view_respects_filters() {
        let now = NaiveDate::from_ymd_opt(2025, 3, 5)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let records = vec![record("NO PARKING", ""), record("1 HR", "")];
        let state = reduce(
            ViewState::default(),
            Action::SetParkingType(ParkingTypeFilter::TimeLimited),
        );
        let layer = visible_layer(&state, &records, now, ORIGIN);
        assert_eq!(layer.segments.len(), 1);
        assert_eq!(layer.segments[0].color, LegendColor::Yellow);
    }
}
