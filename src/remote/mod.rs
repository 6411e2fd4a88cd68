//! Remote services
//!
//! Best-effort HTTP collaborators:
//! - Remote counter service (aggregated total across devices)
//! - Geolocation lookup (approximate coordinates for the current visitor)
//!
//! Both sit behind trait seams so the ledger can be handed mock clients in
//! tests. Every call is bounded by a timeout set at client construction; the
//! ledger decides what a failure degrades to.

mod counter;
mod geo;

pub use counter::{CounterConfig, HttpCounterClient};
pub use geo::{GeoConfig, GeoLocation, HttpGeoClient};

use async_trait::async_trait;
use thiserror::Error;

/// Remote counter service seam
#[async_trait]
pub trait CounterService: Send + Sync {
    /// Fetch the aggregated visit total
    async fn fetch(&self) -> Result<u64, RemoteError>;

    /// Register one visit
    async fn increment(&self) -> Result<(), RemoteError>;
}

/// Geolocation lookup seam
#[async_trait]
pub trait GeoService: Send + Sync {
    /// Look up the approximate location of the current caller
    async fn lookup(&self) -> Result<GeoLocation, RemoteError>;
}

/// Errors that can occur when talking to a remote service
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Service unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Map a transport error onto the remote taxonomy
pub(crate) fn classify(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Timeout
    } else if e.is_connect() {
        RemoteError::Unavailable
    } else {
        RemoteError::Request(e)
    }
}

/// Stand-in for a service that has been switched off in configuration.
///
/// Every call reports `Unavailable`, so callers degrade exactly as they would
/// for an unreachable service.
pub struct DisabledService;

#[async_trait]
impl CounterService for DisabledService {
    async fn fetch(&self) -> Result<u64, RemoteError> {
        Err(RemoteError::Unavailable)
    }

    async fn increment(&self) -> Result<(), RemoteError> {
        Err(RemoteError::Unavailable)
    }
}

#[async_trait]
impl GeoService for DisabledService {
    async fn lookup(&self) -> Result<GeoLocation, RemoteError> {
        Err(RemoteError::Unavailable)
    }
}
