//! Geolocation accessor and the location providers it can wrap.

use std::{fmt::Debug, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    error::{LocationError, ResolveError},
    http::HttpClient,
    model::Coordinates,
};

/// Options forwarded with every position request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionOptions {
    /// Upper bound on how long the accessor waits for a fix.
    pub timeout: Option<Duration>,
    /// How old a fix the provider may hand back instead of taking a new one.
    pub maximum_age: Option<Duration>,
}

/// Platform location capability.
#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn current_position(&self, options: &PositionOptions)
    -> Result<Coordinates, LocationError>;
}

/// One-shot position query over an optional provider.
#[derive(Debug, Clone)]
pub struct Geolocator {
    provider: Option<Arc<dyn LocationProvider>>,
    options: PositionOptions,
}

impl Geolocator {
    pub fn new(provider: Option<Arc<dyn LocationProvider>>, options: PositionOptions) -> Self {
        Self { provider, options }
    }

    /// A geolocator with no provider behind it; every call fails with
    /// `CapabilityUnavailable`.
    pub fn unavailable() -> Self {
        Self::new(None, PositionOptions::default())
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Issues a fresh request on every call.
    pub async fn locate(&self) -> Result<Coordinates, ResolveError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(ResolveError::CapabilityUnavailable)?;

        let request = provider.current_position(&self.options);
        let coords = match self.options.timeout {
            Some(limit) => tokio::time::timeout(limit, request).await.map_err(|_| {
                tracing::debug!(?limit, "position request timed out");
                LocationError::Timeout
            })??,
            None => request.await?,
        };

        Ok(coords)
    }
}

/// Always reports the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    coords: Coordinates,
}

impl FixedLocation {
    pub fn new(coords: Coordinates) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        Ok(self.coords)
    }
}

pub const DEFAULT_IP_API_URL: &str = "http://ip-api.com";

/// Approximate position derived from the caller's public IP address.
#[derive(Debug, Clone)]
pub struct IpLocation {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpLocation {
    pub fn new(base_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        Self { base_url: base_url.into(), http }
    }

    fn lookup_url(&self) -> String {
        format!(
            "{}/json?fields=status,message,lat,lon",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LocationProvider for IpLocation {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        let body = self
            .http
            .get_json(&self.lookup_url())
            .await
            .map_err(|e| LocationError::PositionUnavailable(e.to_string()))?;

        let parsed: IpApiResponse = serde_json::from_value(body)
            .map_err(|e| LocationError::PositionUnavailable(format!("unexpected response: {e}")))?;

        if parsed.status != "success" {
            let reason = parsed.message.unwrap_or_else(|| parsed.status.clone());
            tracing::debug!(%reason, "IP geolocation refused");
            return Err(LocationError::PositionUnavailable(reason));
        }

        match (parsed.lat, parsed.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(LocationError::PositionUnavailable(
                "response carried no coordinates".to_string(),
            )),
        }
    }
}
