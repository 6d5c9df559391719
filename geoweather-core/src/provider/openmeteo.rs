use serde_json::Value;

use crate::{
    error::ResolveError,
    model::{Coordinates, Temperature},
};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

/// Open-Meteo current-conditions lookup.
#[derive(Debug, Clone)]
pub struct OpenMeteo {
    base_url: String,
}

impl OpenMeteo {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    pub fn lookup_url(&self, coords: Coordinates) -> String {
        format!(
            "{}/v1/forecast?latitude={}&longitude={}&current=temperature_2m",
            self.base_url.trim_end_matches('/'),
            coords.latitude,
            coords.longitude,
        )
    }

    /// Reads `current.temperature_2m`.
    pub fn temperature(&self, body: &Value) -> Result<Temperature, ResolveError> {
        let raw = body
            .pointer("/current/temperature_2m")
            .ok_or_else(|| {
                ResolveError::MalformedData("forecast has no current.temperature_2m".to_string())
            })?;

        raw.as_f64()
            .and_then(Temperature::from_celsius)
            .ok_or_else(|| {
                ResolveError::MalformedData(format!(
                    "current.temperature_2m is not a usable number: {raw}"
                ))
            })
    }
}

impl Default for OpenMeteo {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
