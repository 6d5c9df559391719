use crate::{
    Config,
    model::{Coordinates, PlaceName},
    provider::{bigdatacloud::BigDataCloud, nominatim::Nominatim},
};
use serde_json::Value;
use std::{convert::TryFrom, fmt::Debug};

pub mod bigdatacloud;
pub mod nominatim;
pub mod openmeteo;

pub use openmeteo::OpenMeteo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeocoderId {
    BigDataCloud,
    Nominatim,
}

impl GeocoderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeocoderId::BigDataCloud => "bigdatacloud",
            GeocoderId::Nominatim => "nominatim",
        }
    }

    pub const fn all() -> &'static [GeocoderId] {
        &[GeocoderId::BigDataCloud, GeocoderId::Nominatim]
    }
}

impl std::fmt::Display for GeocoderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for GeocoderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "bigdatacloud" => Ok(GeocoderId::BigDataCloud),
            "nominatim" => Ok(GeocoderId::Nominatim),
            _ => Err(anyhow::anyhow!(
                "Unknown geocoder '{value}'. Supported geocoders: bigdatacloud, nominatim."
            )),
        }
    }
}

/// A reverse-geocoding contract: how to ask, and how to read the answer.
///
/// The request itself goes through [`crate::HttpClient`] so both lookups of a
/// resolution attempt share one transport.
pub trait ReverseGeocoder: Send + Sync + Debug {
    fn id(&self) -> GeocoderId;

    fn lookup_url(&self, coords: Coordinates) -> String;

    /// Never fails: an unrecognised body resolves to "Unknown Location".
    fn place_name(&self, body: &Value) -> PlaceName;
}

/// Construct a geocoder from config and explicit GeocoderId.
pub fn geocoder_from_config(id: GeocoderId, config: &Config) -> Box<dyn ReverseGeocoder> {
    match id {
        GeocoderId::BigDataCloud => Box::new(BigDataCloud::new(config.endpoints.bigdatacloud.clone())),
        GeocoderId::Nominatim => Box::new(Nominatim::new(config.endpoints.nominatim.clone())),
    }
}

/// Construct the configured geocoder, using the `geocoder` field.
pub fn default_geocoder_from_config(config: &Config) -> anyhow::Result<Box<dyn ReverseGeocoder>> {
    let id = config.geocoder_id()?;
    Ok(geocoder_from_config(id, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn geocoder_id_as_str_roundtrip() {
        for id in GeocoderId::all() {
            let s = id.as_str();
            let parsed = GeocoderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn geocoder_id_is_case_insensitive() {
        assert_eq!(GeocoderId::try_from("Nominatim").unwrap(), GeocoderId::Nominatim);
    }

    #[test]
    fn unknown_geocoder_error() {
        let err = GeocoderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown geocoder"));
    }

    #[test]
    fn default_geocoder_is_bigdatacloud() {
        let cfg = Config::default();
        let geocoder = default_geocoder_from_config(&cfg).expect("default geocoder");
        assert_eq!(geocoder.id(), GeocoderId::BigDataCloud);
    }

    #[test]
    fn configured_geocoder_uses_configured_endpoint() {
        let mut cfg = Config::default();
        cfg.set_geocoder(GeocoderId::Nominatim);
        cfg.endpoints.nominatim = "http://osm.local".to_string();

        let geocoder = default_geocoder_from_config(&cfg).expect("configured geocoder");
        assert_eq!(geocoder.id(), GeocoderId::Nominatim);
        assert!(
            geocoder
                .lookup_url(Coordinates::new(0.0, 0.0))
                .starts_with("http://osm.local/reverse?")
        );
    }

    #[test]
    fn default_geocoder_errors_on_unknown_name() {
        let cfg = Config { geocoder: Some("mapbox".to_string()), ..Config::default() };
        let err = default_geocoder_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("Unknown geocoder 'mapbox'"));
    }
}
