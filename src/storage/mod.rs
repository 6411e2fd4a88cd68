//! Persisted visit state
//!
//! This module provides the ledger's persistence layer:
//!
//! - **types**: Core data structures (VisitRecord, DailyCounter, RegionAggregate)
//! - **store**: Key-value storage seam with file and in-memory backends
//! - **error**: Error types
//!
//! # Layout
//!
//! ```text
//! globalVisitorCounter -> "42"
//! todayVisitorCounter  -> {"date":"2025-01-01","count":3}
//! visitorData          -> [{"latitude":..,"longitude":..,"regionLabel":..,..}]
//! ```
//!
//! Absent or malformed values always read back as zero state; nothing in this
//! layer surfaces a read error to its callers.

pub mod error;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{StoreError, StoreResult};
pub use store::{FileStore, KeyValueStore, MemoryStore, VisitStore};
pub use store::{GLOBAL_COUNTER_KEY, TODAY_COUNTER_KEY, VISITOR_DATA_KEY};
pub use types::{DailyCounter, LedgerSnapshot, RegionAggregate, VisitRecord};
