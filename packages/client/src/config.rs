//! Client configuration.
//!
//! Resolution order, later wins:
//!
//! 1. built-in defaults (mirrored in `config/default.toml`);
//! 2. an optional TOML file, where any omitted key keeps its default;
//! 3. `PARK_A_DON_API_URL` and `PARK_A_DON_TIMEOUT_SECS`;
//! 4. command-line flags, applied by the caller.

use std::path::Path;

use park_a_don_api_models::MapKind;
use park_a_don_zone_models::Coordinate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Overrides [`ClientConfig::base_url`].
pub const API_URL_ENV: &str = "PARK_A_DON_API_URL";

/// Overrides [`ClientConfig::request_timeout_secs`].
pub const TIMEOUT_ENV: &str = "PARK_A_DON_TIMEOUT_SECS";

/// The shipped example configuration.
pub const DEFAULT_TOML: &str = include_str!("../config/default.toml");

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML or has the wrong shape.
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL, optionally with a path prefix.
    pub base_url: String,
    /// Whole-request timeout.
    pub request_timeout_secs: u64,
    /// Connection establishment timeout.
    pub connect_timeout_secs: u64,
    /// Endpoint paths relative to `base_url`.
    pub endpoints: Endpoints,
    /// Reference point for distance filtering.
    pub origin: Coordinate,
    /// Heat layer radius around `origin`.
    pub heat_radius_miles: f64,
}

/// Endpoint paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Zones `GeoJSON` feed.
    pub zones: String,
    /// Ticket points feed.
    pub tickets: String,
    /// Risk lookup; the street name is appended as a path segment.
    pub risk: String,
    /// Current-status map regeneration trigger.
    pub regenerate_current: String,
    /// Combined map regeneration trigger.
    pub regenerate_combined: String,
}

impl Endpoints {
    /// Path of the regeneration trigger for `kind`.
    #[must_use]
    pub fn regenerate(&self, kind: MapKind) -> &str {
        match kind {
            MapKind::Current => &self.regenerate_current,
            MapKind::Combined => &self.regenerate_combined,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            zones: "/zones".to_string(),
            tickets: "/tickets".to_string(),
            risk: "/zone-info".to_string(),
            regenerate_current: "/regenerate-current-map".to_string(),
            regenerate_combined: "/regenerate-combined-map".to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5001".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            endpoints: Endpoints::default(),
            origin: Coordinate::new(-122.4505, 37.7763),
            heat_radius_miles: 1.0,
        }
    }
}

impl ClientConfig {
    /// Parses a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is malformed.
    pub fn from_toml(document: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(document)?)
    }

    /// Loads defaults, the optional file, then environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or an
    /// environment override is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                log::debug!("Loading config from {}", path.display());
                Self::from_toml(&std::fs::read_to_string(path)?)?
            }
            None => Self::default(),
        };

        config.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(TIMEOUT_ENV).ok(),
        )?;

        Ok(config)
    }

    /// Applies environment-style string overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if the timeout is not a number.
    pub fn apply_overrides(
        &mut self,
        api_url: Option<String>,
        timeout_secs: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }

        if let Some(raw) = timeout_secs {
            let secs = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: TIMEOUT_ENV,
                value: raw.clone(),
            })?;
            self.request_timeout_secs = secs;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_toml_matches_defaults() {
        assert_eq!(
            ClientConfig::from_toml(DEFAULT_TOML).unwrap(),
            ClientConfig::default()
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml(
            r#"
            base_url = "https://parking.example.edu/api"

            [endpoints]
            risk = "/risk"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://parking.example.edu/api");
        assert_eq!(config.endpoints.risk, "/risk");
        assert_eq!(config.endpoints.zones, "/zones");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn overrides() {
        let mut config = ClientConfig::default();
        config
            .apply_overrides(
                Some("http://10.0.0.2:8000".to_string()),
                Some("5".to_string()),
            )
            .unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:8000");
        assert_eq!(config.request_timeout_secs, 5);

        let err = config
            .apply_overrides(None, Some("soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn regenerate_paths() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.regenerate(MapKind::Current),
            "/regenerate-current-map"
        );
        assert_eq!(
            endpoints.regenerate(MapKind::Combined),
            "/regenerate-combined-map"
        );
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            ClientConfig::from_toml("base_url = ["),
            Err(ConfigError::Toml(_))
        ));
    }
}
