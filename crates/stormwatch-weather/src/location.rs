//! One-shot geolocation.
//!
//! A [`LocationProvider`] answers a single position request. Requests are
//! bounded by [`GeolocationOptions::timeout`] through [`request_position`].
//! Callers that remember a previous position may reuse it while it is younger
//! than [`GeolocationOptions::maximum_age`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::types::{Coordinates, LocationError};

const USER_AGENT: &str = "Stormwatch/0.1.0";
const DEFAULT_TIMEOUT_SECS: u64 = 8;
const DEFAULT_MAXIMUM_AGE_SECS: u64 = 300;

/// Bounds for a position request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationOptions {
    pub timeout: Duration,
    /// Oldest cached position still acceptable
    pub maximum_age: Duration,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            maximum_age: Duration::from_secs(DEFAULT_MAXIMUM_AGE_SECS),
        }
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(
        &self,
        options: &GeolocationOptions,
    ) -> Result<Coordinates, LocationError>;
}

/// Ask `provider` for a position, giving up after `options.timeout`.
pub async fn request_position(
    provider: &dyn LocationProvider,
    options: &GeolocationOptions,
) -> Result<Coordinates, LocationError> {
    match tokio::time::timeout(options.timeout, provider.current_position(options)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("Location request timed out after {:?}", options.timeout);
            Err(LocationError::Timeout)
        }
    }
}

/// Provider for systems without any position source
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedLocation;

#[async_trait]
impl LocationProvider for UnsupportedLocation {
    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Always answers with the configured coordinates
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
    city: Option<String>,
}

/// Approximate position from the machine's public IP address (ip-api.com format)
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    client: Client,
    url: String,
}

impl IpGeolocator {
    pub fn new(url: impl Into<String>) -> Result<Self, LocationError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LocationError::ServiceUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl LocationProvider for IpGeolocator {
    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<Coordinates, LocationError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            tracing::debug!("IP location request failed: {}", e);
            LocationError::ServiceUnavailable(e.to_string())
        })?;

        if !response.status().is_success() {
            return Err(LocationError::ServiceUnavailable(format!(
                "IP lookup returned status {}",
                response.status()
            )));
        }

        let body: IpLookupResponse = response
            .json()
            .await
            .map_err(|e| LocationError::ServiceUnavailable(format!("parse error: {}", e)))?;

        if body.status != "success" {
            return Err(LocationError::ServiceUnavailable(
                body.message.unwrap_or_else(|| body.status.clone()),
            ));
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => {
                tracing::info!(
                    "IP location resolved near {}",
                    body.city.as_deref().unwrap_or("unknown city")
                );
                Ok(Coordinates {
                    latitude,
                    longitude,
                })
            }
            _ => Err(LocationError::ServiceUnavailable(
                "IP lookup response has no coordinates".into(),
            )),
        }
    }
}
