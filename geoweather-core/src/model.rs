use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Literal used when a geocoding response names no usable place.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

/// Human-readable place picked from a geocoding response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceName(String);

impl PlaceName {
    /// First non-empty candidate, or [`UNKNOWN_LOCATION`].
    pub fn first_non_empty<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        candidates
            .into_iter()
            .flatten()
            .map(|s| s.as_ref().trim().to_string())
            .find(|s| !s.is_empty())
            .map(PlaceName)
            .unwrap_or_else(Self::unknown)
    }

    pub fn unknown() -> Self {
        PlaceName(UNKNOWN_LOCATION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whole degrees Celsius.
///
/// Rounding is half away from zero: 20.5 becomes 21 and -20.5 becomes -21.
/// Readings below absolute zero or above [`Temperature::MAX_CELSIUS`] are
/// not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Temperature(i64);

impl Temperature {
    pub const MIN_CELSIUS: f64 = -273.15;
    pub const MAX_CELSIUS: f64 = 1000.0;

    /// Returns `None` for NaN, infinities and physically implausible values.
    pub fn from_celsius(value: f64) -> Option<Self> {
        if !(Self::MIN_CELSIUS..=Self::MAX_CELSIUS).contains(&value) {
            return None;
        }
        Some(Temperature(value.round() as i64))
    }

    pub fn degrees(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°C", self.0)
    }
}

/// The only thing the display sink ever sees.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherResult {
    Resolved {
        place: PlaceName,
        temperature: Temperature,
    },
    Failed {
        reason: ResolveError,
    },
}

impl WeatherResult {
    pub fn is_resolved(&self) -> bool {
        matches!(self, WeatherResult::Resolved { .. })
    }
}
