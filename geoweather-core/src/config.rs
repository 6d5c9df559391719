use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    display::DisplayFormat,
    location::{DEFAULT_IP_API_URL, PositionOptions},
    model::Coordinates,
    provider::{GeocoderId, bigdatacloud, nominatim, openmeteo},
};

/// Base URLs of the external services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub bigdatacloud: String,
    pub nominatim: String,
    pub open_meteo: String,
    pub ip_api: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            bigdatacloud: bigdatacloud::DEFAULT_BASE_URL.to_string(),
            nominatim: nominatim::DEFAULT_BASE_URL.to_string(),
            open_meteo: openmeteo::DEFAULT_BASE_URL.to_string(),
            ip_api: DEFAULT_IP_API_URL.to_string(),
        }
    }
}

/// Where the position fix comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    /// Approximate position from the public IP address.
    #[default]
    Ip,
    /// The `latitude`/`longitude` pair from this file.
    Fixed,
    /// No location capability at all.
    Disabled,
}

impl LocationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationSource::Ip => "ip",
            LocationSource::Fixed => "fixed",
            LocationSource::Disabled => "disabled",
        }
    }

    pub const fn all() -> &'static [LocationSource] {
        &[LocationSource::Ip, LocationSource::Fixed, LocationSource::Disabled]
    }
}

impl std::fmt::Display for LocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub source: LocationSource,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timeout_secs: Option<u64>,
    pub maximum_age_secs: Option<u64>,
}

impl LocationConfig {
    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            timeout: self.timeout_secs.map(Duration::from_secs),
            maximum_age: self.maximum_age_secs.map(Duration::from_secs),
        }
    }

    /// Fixed coordinates, required when `source = "fixed"`.
    pub fn fixed_coordinates(&self) -> Result<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(anyhow!(
                "Location source is 'fixed' but latitude/longitude are not both set.\n\
                 Hint: run `geoweather configure` or pass --lat and --lon."
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Transport timeout; unset means the client's own default.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: concat!("geoweather/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub format: DisplayFormat,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reverse geocoder id, e.g. "bigdatacloud" or "nominatim".
    /// Unset means "bigdatacloud".
    pub geocoder: Option<String>,

    /// Example TOML:
    /// [endpoints]
    /// open_meteo = "http://localhost:8080"
    pub endpoints: Endpoints,

    pub location: LocationConfig,
    pub http: HttpConfig,
    pub display: DisplayConfig,
}

impl Config {
    /// Return the configured geocoder as a strongly-typed GeocoderId.
    pub fn geocoder_id(&self) -> Result<GeocoderId> {
        match self.geocoder.as_deref() {
            Some(s) => GeocoderId::try_from(s),
            None => Ok(GeocoderId::BigDataCloud),
        }
    }

    /// Store geocoder as string.
    pub fn set_geocoder(&mut self, id: GeocoderId) {
        self.geocoder = Some(id.as_str().to_string());
    }

    /// Switch to a fixed position.
    pub fn set_fixed_location(&mut self, coords: Coordinates) {
        self.location.source = LocationSource::Fixed;
        self.location.latitude = Some(coords.latitude);
        self.location.longitude = Some(coords.longitude);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "geoweather", "geoweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
