//! Core library for the `geoweather` widget.
//!
//! This crate defines:
//! - The location-to-weather resolver and its state machine
//! - Capability traits for network, location and rendering access
//! - Reverse-geocoding and forecast provider contracts
//! - Configuration handling
//!
//! It is used by `geoweather-cli`, but any host that can supply the three
//! capabilities can drive it.

pub mod config;
pub mod display;
pub mod error;
pub mod http;
pub mod location;
pub mod model;
pub mod provider;
pub mod resolver;

pub use config::{Config, LocationSource};
pub use display::{DisplayFormat, DisplaySink, Renderer, render};
pub use error::{FetchCause, FetchError, LocationError, ResolveError};
pub use http::{HttpClient, ReqwestHttpClient};
pub use location::{FixedLocation, Geolocator, IpLocation, LocationProvider, PositionOptions};
pub use model::{Coordinates, PlaceName, Temperature, WeatherResult};
pub use provider::{GeocoderId, OpenMeteo, ReverseGeocoder};
pub use resolver::{ResolverState, WeatherResolver};
