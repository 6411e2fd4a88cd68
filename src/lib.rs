//! # Footfall
//!
//! Visit analytics for a static personal homepage: a visit ledger over a small
//! persisted key-value store, reconciled against a best-effort remote counter,
//! with page-fragment renderers for the news feed, the publications list, and
//! the visitor map.
//!
//! ## Features
//!
//! - **Visit ledger**: global and daily counters with calendar-day rollover
//! - **Deduplication**: one record per location per day, exact-coordinate match
//! - **Best-effort remote**: counter and geolocation failures degrade silently
//! - **Renderers**: idempotent fragment builders for news, publications, map
//!
//! ## Modules
//!
//! - [`ledger`]: The visit ledger core
//! - [`storage`]: Persisted key-value state and data types
//! - [`remote`]: Remote counter and geolocation clients
//! - [`site`]: Page content collaborators
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use footfall::remote::{CounterConfig, GeoConfig, HttpCounterClient, HttpGeoClient};
//! use footfall::{VisitLedger, VisitStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ledger = VisitLedger::new(
//!         VisitStore::open("footfall_data/store.json"),
//!         Arc::new(HttpCounterClient::new(CounterConfig::default())),
//!         Arc::new(HttpGeoClient::new(GeoConfig::default())),
//!     );
//!
//!     // Record this session's visit and report the reconciled stats
//!     let snapshot = ledger.init().await;
//!     println!("{snapshot}");
//! }
//! ```

pub mod config;
pub mod ledger;
pub mod remote;
pub mod site;
pub mod storage;

// Re-export top-level types for convenience
pub use ledger::VisitLedger;

pub use storage::{
    DailyCounter, LedgerSnapshot, RegionAggregate, StoreError, StoreResult, VisitRecord,
    VisitStore,
};

pub use remote::{
    CounterConfig, CounterService, GeoConfig, GeoLocation, GeoService, HttpCounterClient,
    HttpGeoClient, RemoteError,
};

pub use site::{
    render_news, render_publications, MapPayload, MapView, Marker, NewsFeed, NewsItem,
    Publication, PublicationLinks,
};

pub use config::{Config, ConfigError, LoggingConfig, SiteConfig};
