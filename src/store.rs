/// Observation store gateway: deduplication and query interface.
///
/// The repository is an explicit trait rather than a framework-derived
/// query layer. `save` is at-most-once per natural key — the loser of a
/// concurrent insert race discards its own record and treats the existing
/// one as canonical, with no merge and no error. That guarantee is what
/// lets overlapping scheduled and manual collection runs coexist without
/// any per-domain locking.
///
/// Two implementations exist: `MemoryStore` here (an explicit index keyed
/// by natural key, plus a newest-record-per-station index for the fallback
/// path), and the PostgreSQL gateway in `db.rs`.

use crate::model::{Observation, Source};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Result of a `save` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record was persisted; it is new and should be classified and
    /// routed downstream.
    Inserted,
    /// A record with this natural key already exists. The existing record
    /// is canonical; the submitted one is discarded. Success, not an error.
    AlreadyExists,
}

/// A store-level failure (connectivity, malformed row, ...). Key conflicts
/// are never errors — they surface as `SaveOutcome::AlreadyExists`.
#[derive(Debug)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// Record store consumed by the collection pipeline.
pub trait ObservationStore: Send + Sync {
    /// Whether a record with this natural key is already persisted.
    fn exists(&self, source: Source, natural_key: &str) -> Result<bool, StoreError>;

    /// Persists the record unless its natural key already exists.
    fn save(&self, record: &Observation) -> Result<SaveOutcome, StoreError>;

    /// Records for a domain observed at or after `since`, newest first.
    fn find_recent_since(
        &self,
        source: Source,
        since: DateTime<Utc>,
    ) -> Result<Vec<Observation>, StoreError>;

    /// Records for a domain inside a lat/lon bounding box, newest first.
    /// Records without coordinates never match.
    fn find_in_bounding_box(
        &self,
        source: Source,
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
    ) -> Result<Vec<Observation>, StoreError>;

    /// The newest stored record for one station, if any. This is the
    /// cache the resilience fallback serves from.
    fn latest_for_station(
        &self,
        source: Source,
        station_id: &str,
    ) -> Result<Option<Observation>, StoreError>;
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

struct MemoryIndex {
    /// Canonical records, keyed by (source, natural key).
    records: HashMap<(Source, String), Observation>,
    /// Newest record per (source, station), maintained on insert so the
    /// "currently flooding" / fallback queries never scan.
    latest_by_station: HashMap<(Source, String), Observation>,
}

/// In-memory `ObservationStore`. Backs the unit and integration tests and
/// doubles as the working set for deployments without PostgreSQL.
pub struct MemoryStore {
    index: Mutex<MemoryIndex>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            index: Mutex::new(MemoryIndex {
                records: HashMap::new(),
                latest_by_station: HashMap::new(),
            }),
        }
    }

    /// Number of stored records, across all domains.
    pub fn len(&self) -> usize {
        self.index.lock().expect("store lock poisoned").records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservationStore for MemoryStore {
    fn exists(&self, source: Source, natural_key: &str) -> Result<bool, StoreError> {
        let index = self.index.lock().map_err(|e| StoreError(e.to_string()))?;
        Ok(index
            .records
            .contains_key(&(source, natural_key.to_string())))
    }

    fn save(&self, record: &Observation) -> Result<SaveOutcome, StoreError> {
        let mut index = self.index.lock().map_err(|e| StoreError(e.to_string()))?;
        let key = (record.source(), record.natural_key());

        if index.records.contains_key(&key) {
            return Ok(SaveOutcome::AlreadyExists);
        }

        index.records.insert(key, record.clone());

        if let Some(station_id) = record.station_id() {
            let station_key = (record.source(), station_id.to_string());
            let newer = match index.latest_by_station.get(&station_key) {
                Some(current) => record.observed_at() > current.observed_at(),
                None => true,
            };
            if newer {
                index.latest_by_station.insert(station_key, record.clone());
            }
        }

        Ok(SaveOutcome::Inserted)
    }

    fn find_recent_since(
        &self,
        source: Source,
        since: DateTime<Utc>,
    ) -> Result<Vec<Observation>, StoreError> {
        let index = self.index.lock().map_err(|e| StoreError(e.to_string()))?;
        let mut matches: Vec<Observation> = index
            .records
            .iter()
            .filter(|((s, _), record)| *s == source && record.observed_at() >= since)
            .map(|(_, record)| record.clone())
            .collect();
        matches.sort_by_key(|r| std::cmp::Reverse(r.observed_at()));
        Ok(matches)
    }

    fn find_in_bounding_box(
        &self,
        source: Source,
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
    ) -> Result<Vec<Observation>, StoreError> {
        let index = self.index.lock().map_err(|e| StoreError(e.to_string()))?;
        let mut matches: Vec<Observation> = index
            .records
            .iter()
            .filter(|((s, _), record)| {
                *s == source
                    && matches!(
                        (record.latitude(), record.longitude()),
                        (Some(lat), Some(lon))
                            if lat >= min_lat && lat <= max_lat
                                && lon >= min_lon && lon <= max_lon
                    )
            })
            .map(|(_, record)| record.clone())
            .collect();
        matches.sort_by_key(|r| std::cmp::Reverse(r.observed_at()));
        Ok(matches)
    }

    fn latest_for_station(
        &self,
        source: Source,
        station_id: &str,
    ) -> Result<Option<Observation>, StoreError> {
        let index = self.index.lock().map_err(|e| StoreError(e.to_string()))?;
        Ok(index
            .latest_by_station
            .get(&(source, station_id.to_string()))
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
