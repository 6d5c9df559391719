use thiserror::Error;

/// Why the platform could not produce a position fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
    #[error("location request timed out")]
    Timeout,
}

/// Underlying cause of a failed GET.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchCause {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("invalid JSON body: {0}")]
    Parse(String),
}

/// A single failed lookup, carrying the URL that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request to {url} failed: {cause}")]
pub struct FetchError {
    pub url: String,
    #[source]
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(url: impl Into<String>, cause: FetchCause) -> Self {
        Self { url: url.into(), cause }
    }
}

/// Every way a resolution attempt can end in `Failed`.
///
/// All variants share the same user-visible placeholder; the distinction
/// only matters for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no location provider is available")]
    CapabilityUnavailable,
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("malformed lookup data: {0}")]
    MalformedData(String),
}

impl ResolveError {
    /// Short, stable label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::CapabilityUnavailable => "capability_unavailable",
            ResolveError::Location(_) => "location_error",
            ResolveError::Fetch(_) => "fetch_error",
            ResolveError::MalformedData(_) => "malformed_data",
        }
    }
}
