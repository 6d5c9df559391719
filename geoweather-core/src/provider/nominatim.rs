use serde::Deserialize;
use serde_json::Value;

use crate::model::{Coordinates, PlaceName};

use super::{GeocoderId, ReverseGeocoder};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// OpenStreetMap Nominatim reverse lookup. Requires a descriptive User-Agent.
#[derive(Debug, Clone)]
pub struct Nominatim {
    base_url: String,
}

impl Nominatim {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NominatimResponse {
    address: NominatimAddress,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl ReverseGeocoder for Nominatim {
    fn id(&self) -> GeocoderId {
        GeocoderId::Nominatim
    }

    fn lookup_url(&self, coords: Coordinates) -> String {
        format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1&zoom=10",
            self.base_url.trim_end_matches('/'),
            coords.latitude,
            coords.longitude,
        )
    }

    fn place_name(&self, body: &Value) -> PlaceName {
        let addr = NominatimResponse::deserialize(body)
            .unwrap_or_else(|e| {
                tracing::debug!(error = %e, "unexpected Nominatim response shape");
                NominatimResponse::default()
            })
            .address;

        PlaceName::first_non_empty([
            addr.city,
            addr.town,
            addr.village,
            addr.municipality,
            addr.county,
            addr.state,
            addr.country,
        ])
    }
}
