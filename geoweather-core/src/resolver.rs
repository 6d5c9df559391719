//! The location-to-weather resolution flow.
//!
//! One [`WeatherResolver`] performs exactly one resolution attempt:
//!
//! ```text
//! Idle -> AwaitingPosition -> AwaitingLookups -> Resolved
//!                 |                  |
//!                 +------------------+--------> Failed
//! ```
//!
//! `resolve` consumes the resolver, so a finished attempt cannot be re-entered.

use std::{future::Future, sync::Arc};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    Config,
    config::LocationSource,
    display::{DisplaySink, Renderer},
    error::{FetchCause, FetchError, ResolveError},
    http::HttpClient,
    location::{FixedLocation, Geolocator, IpLocation, LocationProvider},
    model::{Coordinates, WeatherResult},
    provider::{OpenMeteo, ReverseGeocoder, default_geocoder_from_config},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    Idle,
    AwaitingPosition,
    AwaitingLookups,
    Resolved,
    Failed,
}

impl ResolverState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ResolverState::Resolved | ResolverState::Failed)
    }

    pub fn can_transition_to(self, next: ResolverState) -> bool {
        use ResolverState::*;

        matches!(
            (self, next),
            (Idle, AwaitingPosition)
                | (AwaitingPosition, AwaitingLookups)
                | (AwaitingPosition, Failed)
                | (AwaitingLookups, Resolved)
                | (AwaitingLookups, Failed)
        )
    }
}

#[derive(Debug)]
pub struct WeatherResolver {
    geolocator: Geolocator,
    http: Arc<dyn HttpClient>,
    geocoder: Box<dyn ReverseGeocoder>,
    forecast: OpenMeteo,
    state: ResolverState,
}

impl WeatherResolver {
    pub fn new(
        geolocator: Geolocator,
        http: Arc<dyn HttpClient>,
        geocoder: Box<dyn ReverseGeocoder>,
        forecast: OpenMeteo,
    ) -> Self {
        Self {
            geolocator,
            http,
            geocoder,
            forecast,
            state: ResolverState::Idle,
        }
    }

    /// Wire a resolver from configuration, sharing `http` between the
    /// lookups and (when `source = "ip"`) the location provider.
    pub fn from_config(config: &Config, http: Arc<dyn HttpClient>) -> anyhow::Result<Self> {
        let provider: Option<Arc<dyn LocationProvider>> = match config.location.source {
            LocationSource::Ip => Some(Arc::new(IpLocation::new(
                config.endpoints.ip_api.clone(),
                Arc::clone(&http),
            ))),
            LocationSource::Fixed => Some(Arc::new(FixedLocation::new(
                config.location.fixed_coordinates()?,
            ))),
            LocationSource::Disabled => None,
        };

        let geolocator = Geolocator::new(provider, config.location.position_options());
        let geocoder = default_geocoder_from_config(config)?;
        let forecast = OpenMeteo::new(config.endpoints.open_meteo.clone());

        debug!(
            location_available = geolocator.is_available(),
            source = %config.location.source,
            geocoder = %geocoder.id(),
            "resolver wired from config"
        );

        Ok(Self::new(geolocator, http, geocoder, forecast))
    }

    pub fn state(&self) -> ResolverState {
        self.state
    }

    /// Run the attempt to completion and hand the outcome to `sink` once.
    pub async fn resolve<R: Renderer>(mut self, sink: &mut DisplaySink<R>) -> WeatherResult {
        let result = self.run().await;
        sink.show(&result);
        result
    }

    async fn run(&mut self) -> WeatherResult {
        self.transition(ResolverState::AwaitingPosition);

        let coords = match self.geolocator.locate().await {
            Ok(coords) => coords,
            Err(reason) => return self.fail(reason),
        };

        self.transition(ResolverState::AwaitingLookups);
        debug!(%coords, geocoder = %self.geocoder.id(), "position acquired, starting lookups");

        let (geocoding, forecast) = match self.lookups(coords).await {
            Ok(bodies) => bodies,
            Err(e) => return self.fail(e.into()),
        };

        let place = self.geocoder.place_name(&geocoding);
        let temperature = match self.forecast.temperature(&forecast) {
            Ok(t) => t,
            Err(reason) => return self.fail(reason),
        };

        self.transition(ResolverState::Resolved);
        info!(%place, %temperature, "weather resolved");

        WeatherResult::Resolved { place, temperature }
    }

    /// Both lookups are in flight at once. The first failure decides the
    /// join; the other task is detached rather than aborted.
    async fn lookups(&self, coords: Coordinates) -> Result<(Value, Value), FetchError> {
        let geocoding = spawn_fetch(Arc::clone(&self.http), self.geocoder.lookup_url(coords));
        let forecast = spawn_fetch(Arc::clone(&self.http), self.forecast.lookup_url(coords));

        tokio::try_join!(geocoding, forecast)
    }

    fn fail(&mut self, reason: ResolveError) -> WeatherResult {
        self.transition(ResolverState::Failed);
        warn!(kind = reason.kind(), error = %reason, "weather resolution failed");

        WeatherResult::Failed { reason }
    }

    fn transition(&mut self, next: ResolverState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal resolver transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(from = ?self.state, to = ?next, "resolver transition");
        self.state = next;
    }
}

fn spawn_fetch(
    http: Arc<dyn HttpClient>,
    url: String,
) -> impl Future<Output = Result<Value, FetchError>> {
    let task = tokio::spawn({
        let url = url.clone();
        async move { http.get_json(&url).await }
    });

    async move {
        match task.await {
            Ok(res) => res,
            Err(e) => Err(FetchError::new(
                url,
                FetchCause::Transport(format!("lookup task failed: {e}")),
            )),
        }
    }
}
