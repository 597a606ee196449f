//! Ticket density heat layer.

use park_a_don_zone_models::{Coordinate, TicketPoint};
use serde::Serialize;

use crate::distance::distance_miles;

/// Heat layer blur radius in pixels.
pub const DEFAULT_RADIUS: u32 = 25;

/// Heat layer blur in pixels.
pub const DEFAULT_BLUR: u32 = 15;

/// Zoom level at which points reach full intensity.
pub const DEFAULT_MAX_ZOOM: u8 = 17;

/// Intensity stops, low to high.
pub const DEFAULT_GRADIENT: [(f64, &str); 4] =
    [(0.2, "blue"), (0.4, "lime"), (0.6, "orange"), (0.8, "red")];

/// Ticket points plus the parameters used to render them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatLayer {
    /// Observations.
    pub points: Vec<TicketPoint>,
    /// Blur radius in pixels.
    pub radius: u32,
    /// Blur amount in pixels.
    pub blur: u32,
    /// Zoom level at which points reach full intensity.
    pub max_zoom: u8,
    /// Gradient stops as `(intensity, color)`.
    pub gradient: Vec<(f64, &'static str)>,
}

impl HeatLayer {
    /// Wraps `points` with the default rendering parameters.
    #[must_use]
    pub fn new(points: Vec<TicketPoint>) -> Self {
        Self {
            points,
            radius: DEFAULT_RADIUS,
            blur: DEFAULT_BLUR,
            max_zoom: DEFAULT_MAX_ZOOM,
            gradient: DEFAULT_GRADIENT.to_vec(),
        }
    }

    /// Drops points farther than `miles` from `origin`.
    #[must_use]
    pub fn within(mut self, origin: Coordinate, miles: f64) -> Self {
        let before = self.points.len();
        self.points.retain(|p| {
            distance_miles(Coordinate::new(p.longitude, p.latitude), origin) <= miles
        });
        log::debug!(
            "Kept {} of {before} ticket points within {miles} miles",
            self.points.len()
        );
        self
    }

    /// Whether there is anything to draw. Empty layers are not added to
    /// the map at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of point weights, unweighted points counting as one.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.points.iter().map(|p| p.weight.unwrap_or(1.0)).sum()
    }
}
