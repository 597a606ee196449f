#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the parking backend.
//!
//! The backend exposes four plain-JSON endpoints: the zones `GeoJSON` feed,
//! the ticket points feed, a per-street risk lookup, and POST triggers that
//! rebuild the pre-rendered maps. [`ParkingApi`] is the seam the rest of
//! the toolchain programs against; [`HttpParkingApi`] is the `reqwest`
//! implementation.
//!
//! Failures never retry automatically. Each one is scoped to the feature
//! that issued it: [`fetch_map_data`] loads zones and tickets together but
//! reports their results separately, so a broken tickets feed still leaves
//! the zones drawable.

pub mod config;
pub mod http;

use async_trait::async_trait;
use park_a_don_api_models::{MapKind, MapRegeneration, RiskAssessment};
use park_a_don_zone::ZoneError;
use park_a_don_zone_models::{TicketPoint, ZoneRecord};
use thiserror::Error;

pub use config::{ClientConfig, ConfigError, Endpoints};
pub use http::{HttpParkingApi, normalize_street};

/// Errors from talking to the parking backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body is not the expected JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Zone or ticket feed could not be decoded.
    #[error("Feed error: {0}")]
    Feed(#[from] ZoneError),

    /// Backend answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Backend-supplied message, or the status reason.
        message: String,
    },

    /// Backend reported that a map could not be rebuilt.
    #[error("Failed to regenerate {kind} map: {message}")]
    RegenerationFailed {
        /// Which map.
        kind: MapKind,
        /// Backend-supplied reason.
        message: String,
    },

    /// Risk lookup with a blank street name.
    #[error("Street name is empty")]
    EmptyStreet,

    /// Configured base URL is unusable.
    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl {
        /// The configured value.
        url: String,
    },
}

impl ClientError {
    /// Text suitable for showing to an end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::RegenerationFailed { .. } => self.to_string(),
            Self::EmptyStreet => "Please enter a street name".to_string(),
            Self::Http(e) if e.is_timeout() || e.is_connect() => {
                "Could not reach the parking server".to_string()
            }
            Self::Http(_) | Self::Json(_) | Self::Feed(_) => "Server error".to_string(),
            Self::InvalidBaseUrl { url } => format!("Invalid server address: {url}"),
        }
    }
}

/// Operations offered by the parking backend.
#[async_trait]
pub trait ParkingApi: Send + Sync {
    /// Fetches all regulation zones.
    async fn zones(&self) -> Result<Vec<ZoneRecord>, ClientError>;

    /// Fetches ticket observations for the heat layer.
    async fn tickets(&self) -> Result<Vec<TicketPoint>, ClientError>;

    /// Looks up the ticket risk for a street name (free text, any case).
    async fn risk(&self, street: &str) -> Result<RiskAssessment, ClientError>;

    /// Asks the backend to rebuild a pre-rendered map.
    async fn regenerate(&self, kind: MapKind) -> Result<MapRegeneration, ClientError>;
}

/// Zones and tickets loaded side by side, each with its own outcome.
#[derive(Debug)]
pub struct MapData {
    /// Zones feed outcome.
    pub zones: Result<Vec<ZoneRecord>, ClientError>,
    /// Tickets feed outcome.
    pub tickets: Result<Vec<TicketPoint>, ClientError>,
}

/// Loads both feeds concurrently. A failure in one does not affect the
/// other.
pub async fn fetch_map_data(api: &dyn ParkingApi) -> MapData {
    let (zones, tickets) = tokio::join!(api.zones(), api.tickets());

    if let Err(e) = &zones {
        log::error!("Error loading zones: {e}");
    }
    if let Err(e) = &tickets {
        log::error!("Error loading tickets: {e}");
    }

    MapData { zones, tickets }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TicketsDown;

    #[async_trait]
    impl ParkingApi for TicketsDown {
        async fn zones(&self) -> Result<Vec<ZoneRecord>, ClientError> {
            Ok(vec![ZoneRecord::default()])
        }

        async fn tickets(&self) -> Result<Vec<TicketPoint>, ClientError> {
            Err(ClientError::Api {
                status: 500,
                message: "tickets unavailable".to_string(),
            })
        }

        async fn risk(&self, _street: &str) -> Result<RiskAssessment, ClientError> {
            Err(ClientError::EmptyStreet)
        }

        async fn regenerate(&self, kind: MapKind) -> Result<MapRegeneration, ClientError> {
            Err(ClientError::RegenerationFailed {
                kind,
                message: "offline".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn feed_failures_are_scoped() {
        let data = fetch_map_data(&TicketsDown).await;
        assert_eq!(data.zones.unwrap().len(), 1);
        assert_eq!(
            data.tickets.unwrap_err().user_message(),
            "tickets unavailable"
        );
    }

    #[test]
    fn user_messages() {
        assert_eq!(
            ClientError::EmptyStreet.user_message(),
            "Please enter a street name"
        );
        assert_eq!(
            ClientError::Feed(ZoneError::NotATicketArray).user_message(),
            "Server error"
        );
        assert_eq!(
            ClientError::RegenerationFailed {
                kind: MapKind::Current,
                message: "busy".to_string(),
            }
            .user_message(),
            "Failed to regenerate current map: busy"
        );
    }
}
