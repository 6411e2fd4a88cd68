//! Core data types for the footfall visit ledger
//!
//! This module defines the fundamental types used throughout the crate:
//! - `VisitRecord`: One geolocated visit, immutable once created
//! - `DailyCounter`: Today's visit count with its calendar date
//! - `RegionAggregate`: Derived per-location grouping, recomputed on render
//! - `LedgerSnapshot`: The aggregated view consumed by rendering collaborators

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single recorded visit
///
/// Created on each session when the geolocation lookup succeeds. Immutable once
/// created; owned exclusively by the persisted record set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    /// Approximate latitude reported by the geolocation service
    pub latitude: f64,
    /// Approximate longitude reported by the geolocation service
    pub longitude: f64,
    /// Human-readable "City, Region, Country" label
    pub region_label: String,
    /// ISO calendar date of the visit (YYYY-MM-DD)
    pub date: String,
    /// RFC 3339 timestamp of the visit
    pub timestamp: String,
}

impl VisitRecord {
    pub fn new(
        latitude: f64,
        longitude: f64,
        region_label: impl Into<String>,
        date: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            region_label: region_label.into(),
            date: date.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Whether another record represents the same place on the same day.
    ///
    /// Coordinates are compared by exact equality, no distance tolerance.
    pub fn same_place_and_day(&self, other: &VisitRecord) -> bool {
        self.date == other.date
            && self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

/// Visit count for a single calendar day
///
/// At most one counter is current per day: any read or write against a stored
/// counter whose date is no longer today resets it to `{date: today, count: 0}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyCounter {
    /// ISO calendar date (YYYY-MM-DD)
    pub date: String,
    /// Visits counted on that date
    pub count: u64,
}

impl DailyCounter {
    /// A zeroed counter for the given date
    pub fn fresh(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            count: 0,
        }
    }

    /// Whether this counter belongs to the given calendar day
    pub fn is_current(&self, today: &str) -> bool {
        self.date == today
    }
}

/// Visitor count for one distinct location
///
/// Derived, never stored: recomputed from the record set whenever markers are
/// rendered. Grouping is on the exact (latitude, longitude) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionAggregate {
    pub latitude: f64,
    pub longitude: f64,
    pub region_label: String,
    pub count: u64,
}

impl RegionAggregate {
    /// Group visit records by exact coordinates.
    ///
    /// The label of the first record seen for a location wins. Results are
    /// ordered by descending count, then label, so renders are stable.
    pub fn group(records: &[VisitRecord]) -> Vec<RegionAggregate> {
        let mut by_location: HashMap<(u64, u64), RegionAggregate> = HashMap::new();

        for record in records {
            let key = (record.latitude.to_bits(), record.longitude.to_bits());
            by_location
                .entry(key)
                .and_modify(|agg| agg.count += 1)
                .or_insert_with(|| RegionAggregate {
                    latitude: record.latitude,
                    longitude: record.longitude,
                    region_label: record.region_label.clone(),
                    count: 1,
                });
        }

        let mut aggregates: Vec<RegionAggregate> = by_location.into_values().collect();
        aggregates.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.region_label.cmp(&b.region_label))
        });
        aggregates
    }
}

/// Aggregated counts exposed to rendering collaborators
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    /// Total visits, reconciled against the remote counter when reachable
    pub total_visits: u64,
    /// Today's counter
    pub daily: DailyCounter,
    /// One entry per distinct visitor location
    pub regions: Vec<RegionAggregate>,
    /// The record appended for the current visit, if it was unique
    pub new_visit: Option<VisitRecord>,
}

impl std::fmt::Display for LedgerSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} total, {} today ({}), {} regions",
            self.total_visits,
            self.daily.count,
            self.daily.date,
            self.regions.len()
        )
    }
}
