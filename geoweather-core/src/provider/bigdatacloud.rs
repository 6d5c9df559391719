use serde::Deserialize;
use serde_json::Value;

use crate::model::{Coordinates, PlaceName};

use super::{GeocoderId, ReverseGeocoder};

pub const DEFAULT_BASE_URL: &str = "https://api.bigdatacloud.net";

/// BigDataCloud's key-less client-side reverse geocoding endpoint.
#[derive(Debug, Clone)]
pub struct BigDataCloud {
    base_url: String,
}

impl BigDataCloud {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BdcResponse {
    city: Option<String>,
    locality: Option<String>,
    principal_subdivision: Option<String>,
    country_name: Option<String>,
}

impl ReverseGeocoder for BigDataCloud {
    fn id(&self) -> GeocoderId {
        GeocoderId::BigDataCloud
    }

    fn lookup_url(&self, coords: Coordinates) -> String {
        format!(
            "{}/data/reverse-geocode-client?latitude={}&longitude={}&localityLanguage=en",
            self.base_url.trim_end_matches('/'),
            coords.latitude,
            coords.longitude,
        )
    }

    fn place_name(&self, body: &Value) -> PlaceName {
        let parsed = BdcResponse::deserialize(body).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "unexpected BigDataCloud response shape");
            BdcResponse::default()
        });

        PlaceName::first_non_empty([
            parsed.city,
            parsed.locality,
            parsed.principal_subdivision,
            parsed.country_name,
        ])
    }
}
