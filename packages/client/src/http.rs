//! `reqwest` implementation of [`ParkingApi`].

use std::time::Duration;

use async_trait::async_trait;
use park_a_don_api_models::{ApiErrorBody, MapKind, MapRegeneration, RiskAssessment};
use park_a_don_zone_models::{TicketPoint, ZoneRecord};
use reqwest::{StatusCode, Url};

use crate::{ClientConfig, ClientError, ParkingApi};

/// HTTP client for the parking backend.
pub struct HttpParkingApi {
    client: reqwest::Client,
    base: Url,
    config: ClientConfig,
}

impl HttpParkingApi {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if the base URL cannot be
    /// parsed or cannot carry a path, or [`ClientError::Http`] if the
    /// underlying client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.base_url).map_err(|_| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: config.base_url,
            });
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("park_a_don/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base,
            config,
        })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolves an endpoint path against the base URL, keeping any path
    /// prefix the base URL carries.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if the base URL cannot carry
    /// a path.
    pub fn endpoint_url(&self, path: &str, extra: Option<&str>) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| ClientError::InvalidBaseUrl {
                url: self.config.base_url.clone(),
            })?;
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
            if let Some(extra) = extra {
                segments.push(extra);
            }
        }
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<String, ClientError> {
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        read_body(response).await
    }
}

#[async_trait]
impl ParkingApi for HttpParkingApi {
    async fn zones(&self) -> Result<Vec<ZoneRecord>, ClientError> {
        let url = self.endpoint_url(&self.config.endpoints.zones, None)?;
        let body = self.get(url).await?;
        let zones = park_a_don_zone::parse_zone_collection(&body)?;
        log::info!("Loaded {} zones", zones.len());
        Ok(zones)
    }

    async fn tickets(&self) -> Result<Vec<TicketPoint>, ClientError> {
        let url = self.endpoint_url(&self.config.endpoints.tickets, None)?;
        let body = self.get(url).await?;
        let points = park_a_don_zone::parse_ticket_points(&body)?;
        log::info!("Loaded {} ticket points", points.len());
        Ok(points)
    }

    async fn risk(&self, street: &str) -> Result<RiskAssessment, ClientError> {
        let street = normalize_street(street)?;
        let url = self.endpoint_url(&self.config.endpoints.risk, Some(street))?;
        let body = self.get(url).await?;
        decode_risk(&body)
    }

    async fn regenerate(&self, kind: MapKind) -> Result<MapRegeneration, ClientError> {
        let url = self.endpoint_url(self.config.endpoints.regenerate(kind), None)?;
        log::debug!("POST {url}");
        let response = self.client.post(url).send().await?;
        let body = read_body(response).await?;
        decode_regeneration(kind, &body)
    }
}

/// Trims a street query, rejecting blank input before any request is made.
///
/// # Errors
///
/// Returns [`ClientError::EmptyStreet`] for blank input.
pub fn normalize_street(street: &str) -> Result<&str, ClientError> {
    let street = street.trim();
    if street.is_empty() {
        return Err(ClientError::EmptyStreet);
    }
    Ok(street)
}

async fn read_body(response: reqwest::Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    check_status(status, &body)?;
    Ok(body)
}

/// Maps a non-2xx status to [`ClientError::Api`], preferring the body's
/// `error` message over the status reason.
pub(crate) fn check_status(status: StatusCode, body: &str) -> Result<(), ClientError> {
    if status.is_success() {
        return Ok(());
    }

    let message = serde_json::from_str::<ApiErrorBody>(body).map_or_else(
        |_| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        },
        |b| b.error,
    );

    log::warn!("Request failed with {status}: {message}");

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

pub(crate) fn decode_risk(body: &str) -> Result<RiskAssessment, ClientError> {
    Ok(serde_json::from_str(body)?)
}

pub(crate) fn decode_regeneration(
    kind: MapKind,
    body: &str,
) -> Result<MapRegeneration, ClientError> {
    let regeneration: MapRegeneration = serde_json::from_str(body)?;
    if !regeneration.success {
        return Err(ClientError::RegenerationFailed {
            kind,
            message: regeneration
                .error
                .unwrap_or_else(|| "unknown error".to_string()),
        });
    }
    log::info!("Regenerated {kind} map");
    Ok(regeneration)
}
