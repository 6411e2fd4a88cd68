//! Visit Ledger
//!
//! The core of the crate: determines, records, and reports visit counts,
//! reconciling the local persisted view with a best-effort remote aggregate.
//!
//! One `VisitLedger` is constructed per session and holds its injected storage
//! and network clients; there is no ambient global state. Every external call
//! is independently best-effort: a failed remote fetch falls back to the local
//! record count, a failed geolocation lookup skips the location record, and a
//! failed remote increment is logged and forgotten. Nothing here surfaces an
//! error to the caller.

use crate::config::Config;
use crate::remote::{
    CounterConfig, CounterService, DisabledService, GeoConfig, GeoLocation, GeoService,
    HttpCounterClient, HttpGeoClient,
};
use crate::storage::{DailyCounter, LedgerSnapshot, RegionAggregate, VisitRecord, VisitStore};
use chrono::Utc;
use std::sync::Arc;

/// Tracks visit counts across a local store and a remote counter service
pub struct VisitLedger {
    store: VisitStore,
    counter: Arc<dyn CounterService>,
    geo: Arc<dyn GeoService>,
}

/// Today's UTC calendar date, YYYY-MM-DD
fn utc_today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

impl VisitLedger {
    /// Create a ledger over the given store and service clients
    pub fn new(store: VisitStore, counter: Arc<dyn CounterService>, geo: Arc<dyn GeoService>) -> Self {
        Self { store, counter, geo }
    }

    /// Build a ledger from configuration: file-backed store, HTTP clients.
    ///
    /// Services switched off in config are replaced by [`DisabledService`], so
    /// the rest of the ledger degrades as if they were unreachable.
    pub fn from_config(config: &Config) -> Self {
        let store = VisitStore::open(config.storage.store_path());

        let counter: Arc<dyn CounterService> = if config.counter.enabled {
            Arc::new(HttpCounterClient::new(CounterConfig {
                base_url: config.counter.base_url.clone(),
                site_id: config.counter.site_id.clone(),
                timeout_ms: config.counter.timeout_ms,
            }))
        } else {
            Arc::new(DisabledService)
        };

        let geo: Arc<dyn GeoService> = if config.geo.enabled {
            Arc::new(HttpGeoClient::new(GeoConfig {
                url: config.geo.url.clone(),
                timeout_ms: config.geo.timeout_ms,
            }))
        } else {
            Arc::new(DisabledService)
        };

        Self::new(store, counter, geo)
    }

    /// Today's counter, rolling over when the stored date is stale.
    ///
    /// The reset is not persisted here; persistence happens on the next
    /// increment.
    pub fn daily_counter(&self) -> DailyCounter {
        self.daily_counter_on(&utc_today())
    }

    fn daily_counter_on(&self, today: &str) -> DailyCounter {
        match self.store.daily_counter() {
            Some(counter) if counter.is_current(today) => counter,
            _ => DailyCounter::fresh(today),
        }
    }

    /// Add one to the persisted global counter and return the new value.
    ///
    /// Read-modify-write with no cross-process locking; the last writer wins.
    pub fn increment_global_counter(&self) -> u64 {
        let next = self.store.global_counter() + 1;
        if let Err(e) = self.store.set_global_counter(next) {
            tracing::warn!(error = %e, "Failed to persist global counter");
        }
        tracing::debug!(total = next, "Global counter updated");
        next
    }

    /// Roll over if needed, add one to today's counter, persist, return it
    pub fn increment_daily_counter(&self) -> DailyCounter {
        self.increment_daily_counter_on(&utc_today())
    }

    fn increment_daily_counter_on(&self, today: &str) -> DailyCounter {
        let mut counter = self.daily_counter_on(today);
        counter.count += 1;
        if let Err(e) = self.store.set_daily_counter(&counter) {
            tracing::warn!(error = %e, "Failed to persist daily counter");
        }
        counter
    }

    /// The aggregated visit total.
    ///
    /// Remote value when the counter service answers; on any failure, the
    /// count of locally persisted visit records. Never an error.
    pub async fn fetch_remote_counter(&self) -> u64 {
        match self.counter.fetch().await {
            Ok(value) => value,
            Err(e) => {
                let fallback = self.store.visit_records().len() as u64;
                tracing::warn!(
                    error = %e,
                    fallback,
                    "Remote counter unreachable, using local record count"
                );
                fallback
            }
        }
    }

    /// Post one visit to the remote counter, fire-and-forget.
    ///
    /// The request runs on a detached task bounded by the client timeout;
    /// failures are logged, not retried, not surfaced.
    pub fn send_visit_to_remote(&self) {
        let counter = Arc::clone(&self.counter);
        tokio::spawn(async move {
            if let Err(e) = counter.increment().await {
                tracing::warn!(error = %e, "Failed to register visit with remote counter");
            }
        });
    }

    /// Look up the visitor's location and record it for today.
    ///
    /// Returns the appended record, or `None` when the lookup failed or an
    /// identical (date, latitude, longitude) record already exists.
    pub async fn record_visitor_location(&self) -> Option<VisitRecord> {
        let location = match self.geo.lookup().await {
            Ok(location) => location,
            Err(e) => {
                tracing::warn!(error = %e, "Geolocation lookup failed, skipping location record");
                return None;
            }
        };

        self.record_location(&location, &utc_today(), &Utc::now().to_rfc3339())
    }

    fn record_location(
        &self,
        location: &GeoLocation,
        date: &str,
        timestamp: &str,
    ) -> Option<VisitRecord> {
        let record = VisitRecord::new(
            location.latitude,
            location.longitude,
            location.region_label(),
            date,
            timestamp,
        );

        let mut records = self.store.visit_records();
        if records.iter().any(|existing| existing.same_place_and_day(&record)) {
            tracing::debug!(date, label = %record.region_label, "Visit from this location already recorded today");
            return None;
        }

        records.push(record.clone());
        if let Err(e) = self.store.set_visit_records(&records) {
            tracing::warn!(error = %e, "Failed to persist visit record");
        }

        tracing::info!(label = %record.region_label, "New visitor location recorded");
        Some(record)
    }

    /// Per-location counts over the persisted record set, recomputed on call
    pub fn region_aggregates(&self) -> Vec<RegionAggregate> {
        RegionAggregate::group(&self.store.visit_records())
    }

    /// Current stats without recording a visit.
    ///
    /// The remote fetch and the daily computation have no ordering dependency
    /// and run concurrently.
    pub async fn stats(&self) -> LedgerSnapshot {
        let (total_visits, daily) =
            tokio::join!(self.fetch_remote_counter(), async { self.daily_counter() });

        LedgerSnapshot {
            total_visits,
            daily,
            regions: self.region_aggregates(),
            new_visit: None,
        }
    }

    /// Run the full session flow: report stats, then record this visit.
    ///
    /// Order matches the page-load sequence: current stats (global already
    /// reconciled against the remote), existing region aggregates for the
    /// marker collaborator, then the visit itself (detached remote increment,
    /// local counters, location record) and a refreshed snapshot. The detached
    /// increment may or may not have landed when the refresh reads the remote
    /// counter.
    pub async fn init(&self) -> LedgerSnapshot {
        let (total, daily) =
            tokio::join!(self.fetch_remote_counter(), async { self.daily_counter() });
        tracing::info!(total, today = daily.count, "Visitor stats at session start");

        let regions = self.region_aggregates();
        tracing::debug!(regions = regions.len(), "Existing visitor regions");

        self.send_visit_to_remote();
        self.increment_global_counter();
        let daily = self.increment_daily_counter();
        let new_visit = self.record_visitor_location().await;

        let regions = if new_visit.is_some() {
            self.region_aggregates()
        } else {
            regions
        };

        let total_visits = self.fetch_remote_counter().await;

        LedgerSnapshot {
            total_visits,
            daily,
            regions,
            new_visit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteError;
    use async_trait::async_trait;

    struct FixedCounter(u64);

    #[async_trait]
    impl CounterService for FixedCounter {
        async fn fetch(&self) -> Result<u64, RemoteError> {
            Ok(self.0)
        }

        async fn increment(&self) -> Result<(), RemoteError> {
            Ok(())
        }
    }

    struct FailingCounter;

    #[async_trait]
    impl CounterService for FailingCounter {
        async fn fetch(&self) -> Result<u64, RemoteError> {
            Err(RemoteError::Unavailable)
        }

        async fn increment(&self) -> Result<(), RemoteError> {
            Err(RemoteError::Unavailable)
        }
    }

    struct FixedGeo(GeoLocation);

    #[async_trait]
    impl GeoService for FixedGeo {
        async fn lookup(&self) -> Result<GeoLocation, RemoteError> {
            Ok(self.0.clone())
        }
    }

    struct FailingGeo;

    #[async_trait]
    impl GeoService for FailingGeo {
        async fn lookup(&self) -> Result<GeoLocation, RemoteError> {
            Err(RemoteError::Timeout)
        }
    }

    fn tianjin() -> GeoLocation {
        GeoLocation {
            latitude: 39.0851,
            longitude: 117.1994,
            city: Some("Tianjin".into()),
            region: Some("Tianjin".into()),
            country_name: Some("China".into()),
        }
    }

    fn ledger(counter: impl CounterService + 'static, geo: impl GeoService + 'static) -> VisitLedger {
        VisitLedger::new(VisitStore::in_memory(), Arc::new(counter), Arc::new(geo))
    }

    #[test]
    fn test_global_counter_increments_from_zero() {
        let ledger = ledger(FailingCounter, FailingGeo);
        assert_eq!(ledger.increment_global_counter(), 1);
        assert_eq!(ledger.increment_global_counter(), 2);
        assert_eq!(ledger.increment_global_counter(), 3);
    }

    #[test]
    fn test_daily_counter_scenario() {
        let ledger = ledger(FailingCounter, FailingGeo);

        let first = ledger.increment_daily_counter_on("2025-01-01");
        assert_eq!(first, DailyCounter { date: "2025-01-01".into(), count: 1 });

        let second = ledger.increment_daily_counter_on("2025-01-01");
        assert_eq!(second.count, 2);

        let next_day = ledger.increment_daily_counter_on("2025-01-02");
        assert_eq!(next_day, DailyCounter { date: "2025-01-02".into(), count: 1 });
    }

    #[test]
    fn test_daily_rollover_on_read_is_not_persisted() {
        let ledger = ledger(FailingCounter, FailingGeo);
        ledger.increment_daily_counter_on("2025-01-01");

        let rolled = ledger.daily_counter_on("2025-01-02");
        assert_eq!(rolled, DailyCounter::fresh("2025-01-02"));

        // the stored counter still carries the old date until the next increment
        let stored = ledger.store.daily_counter().unwrap();
        assert_eq!(stored.date, "2025-01-01");
        assert_eq!(stored.count, 1);
    }

    #[test]
    fn test_duplicate_location_same_day_is_discarded() {
        let ledger = ledger(FailingCounter, FailingGeo);
        let loc = tianjin();

        let first = ledger.record_location(&loc, "2025-01-01", "2025-01-01T08:00:00Z");
        assert!(first.is_some());

        let second = ledger.record_location(&loc, "2025-01-01", "2025-01-01T09:30:00Z");
        assert!(second.is_none());
        assert_eq!(ledger.store.visit_records().len(), 1);
    }

    #[test]
    fn test_same_day_different_coordinates_appends() {
        let ledger = ledger(FailingCounter, FailingGeo);
        let mut loc = tianjin();

        ledger.record_location(&loc, "2025-01-01", "2025-01-01T08:00:00Z");
        loc.latitude += 0.5;
        ledger.record_location(&loc, "2025-01-01", "2025-01-01T09:00:00Z");

        assert_eq!(ledger.store.visit_records().len(), 2);
    }

    #[test]
    fn test_same_coordinates_different_day_appends() {
        let ledger = ledger(FailingCounter, FailingGeo);
        let loc = tianjin();

        ledger.record_location(&loc, "2025-01-01", "2025-01-01T08:00:00Z");
        ledger.record_location(&loc, "2025-01-02", "2025-01-02T08:00:00Z");

        assert_eq!(ledger.store.visit_records().len(), 2);
    }

    #[tokio::test]
    async fn test_remote_fetch_returns_remote_value() {
        let ledger = ledger(FixedCounter(99), FailingGeo);
        assert_eq!(ledger.fetch_remote_counter().await, 99);
    }

    #[tokio::test]
    async fn test_remote_fetch_falls_back_to_record_count() {
        let ledger = ledger(FailingCounter, FailingGeo);
        assert_eq!(ledger.fetch_remote_counter().await, 0);

        ledger.record_location(&tianjin(), "2025-01-01", "2025-01-01T08:00:00Z");
        assert_eq!(ledger.fetch_remote_counter().await, 1);
    }

    #[tokio::test]
    async fn test_failed_geo_lookup_records_nothing() {
        let ledger = ledger(FailingCounter, FailingGeo);
        assert!(ledger.record_visitor_location().await.is_none());
        assert!(ledger.store.visit_records().is_empty());
    }

    #[tokio::test]
    async fn test_init_records_the_visit() {
        let ledger = ledger(FixedCounter(10), FixedGeo(tianjin()));

        let snapshot = ledger.init().await;
        assert_eq!(snapshot.total_visits, 10);
        assert_eq!(snapshot.daily.count, 1);
        assert!(snapshot.new_visit.is_some());
        assert_eq!(snapshot.regions.len(), 1);
        assert_eq!(snapshot.regions[0].count, 1);
        assert_eq!(ledger.store.global_counter(), 1);
    }

    #[tokio::test]
    async fn test_init_degrades_when_everything_fails() {
        let ledger = ledger(FailingCounter, FailingGeo);

        let snapshot = ledger.init().await;
        // no records, no remote: total falls back to zero, but local counters advanced
        assert_eq!(snapshot.total_visits, 0);
        assert_eq!(snapshot.daily.count, 1);
        assert!(snapshot.new_visit.is_none());
        assert!(snapshot.regions.is_empty());
    }

    #[tokio::test]
    async fn test_stats_does_not_record() {
        let ledger = ledger(FixedCounter(5), FixedGeo(tianjin()));

        let snapshot = ledger.stats().await;
        assert_eq!(snapshot.total_visits, 5);
        assert_eq!(snapshot.daily.count, 0);
        assert!(snapshot.new_visit.is_none());
        assert_eq!(ledger.store.global_counter(), 0);
        assert!(ledger.store.visit_records().is_empty());
    }
}
