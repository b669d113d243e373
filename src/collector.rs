/// Collection orchestration: one operation per hazard domain, each wiring
/// resilient fetch → dedup/persist → classify → route → publish.
///
/// Persistence happens before routing, and only records that were actually
/// inserted are routed — a record already present under its natural key is
/// a silent no-op, which is what makes overlapping scheduled and manual
/// runs of the same domain safe without any locking. Cached fallback
/// records re-enter the pipeline the same way and dedup right back out.
///
/// A collection run never fails visibly to its trigger: upstream failure
/// degrades to cached or empty batches inside the resilience wrapper, and
/// the only externally observable symptom of a data gap is the absence of
/// new records (and the log lines).

use crate::alert::router::{self, QueryKind};
use crate::alert::severity;
use crate::config::CollectorConfig;
use crate::fanout;
use crate::ingest::{quake, river, space_weather, tides};
use crate::model::{Observation, Source};
use crate::publish::{self, EventPublisher};
use crate::resilience::{BreakerState, ResilientSource};
use crate::stations;
use crate::store::{ObservationStore, SaveOutcome};
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Collection tasks
// ---------------------------------------------------------------------------

/// One dispatchable unit of collection work. The endpoint and the daemon
/// both speak in these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollectionTask {
    RecentQuakes,
    SignificantQuakes,
    QuakesNear {
        latitude: f64,
        longitude: f64,
        radius_degrees: f64,
        min_magnitude: f64,
    },
    TideLevels,
    RiverLevels,
    KpIndex,
    Cme,
}

impl CollectionTask {
    pub fn describe(&self) -> &'static str {
        match self {
            CollectionTask::RecentQuakes => "recent earthquakes",
            CollectionTask::SignificantQuakes => "significant earthquakes",
            CollectionTask::QuakesNear { .. } => "earthquakes near location",
            CollectionTask::TideLevels => "tide levels",
            CollectionTask::RiverLevels => "river levels",
            CollectionTask::KpIndex => "Kp index",
            CollectionTask::Cme => "CME activity",
        }
    }
}

/// Counters summarizing one collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Records that came out of the (resilience-wrapped) fetch stage,
    /// live or cached.
    pub fetched: usize,
    /// Records persisted for the first time.
    pub inserted: usize,
    /// Records discarded because their natural key already existed.
    pub duplicates: usize,
    /// Outbound channel deliveries attempted.
    pub published: usize,
    /// Records dropped because the store itself failed.
    pub store_errors: usize,
}

// ---------------------------------------------------------------------------
// Collector
// ---------------------------------------------------------------------------

/// Owns the HTTP client, the per-source resilience decorators, and the
/// store/publisher collaborators. Shared across the daemon timers and the
/// manual trigger surface behind an `Arc`.
pub struct Collector {
    config: CollectorConfig,
    http: reqwest::blocking::Client,
    store: Arc<dyn ObservationStore>,
    publisher: Arc<dyn EventPublisher>,
    quake_api: ResilientSource,
    tides_api: ResilientSource,
    river_api: ResilientSource,
    swpc_api: ResilientSource,
    donki_api: ResilientSource,
}

impl Collector {
    pub fn new(
        config: CollectorConfig,
        store: Arc<dyn ObservationStore>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        let resilience = &config.resilience;
        Self {
            quake_api: ResilientSource::new("usgs-earthquake-api", resilience),
            tides_api: ResilientSource::new("noaa-tides-api", resilience),
            river_api: ResilientSource::new("usgs-water-api", resilience),
            swpc_api: ResilientSource::new("noaa-swpc-api", resilience),
            donki_api: ResilientSource::new("nasa-donki-api", resilience),
            http: reqwest::blocking::Client::new(),
            store,
            publisher,
            config,
        }
    }

    pub fn store(&self) -> &Arc<dyn ObservationStore> {
        &self.store
    }

    /// Current breaker state per upstream API, for the operator endpoint.
    pub fn breaker_states(&self) -> Vec<(String, BreakerState)> {
        [
            &self.quake_api,
            &self.tides_api,
            &self.river_api,
            &self.swpc_api,
            &self.donki_api,
        ]
        .iter()
        .map(|source| (source.breaker().name().to_string(), source.breaker().state()))
        .collect()
    }

    /// Runs one collection task to completion on the calling thread.
    pub fn run(&self, task: CollectionTask) -> BatchSummary {
        println!("[collector] starting collection: {}", task.describe());
        let summary = match task {
            CollectionTask::RecentQuakes => self.collect_recent_quakes(),
            CollectionTask::SignificantQuakes => self.collect_significant_quakes(),
            CollectionTask::QuakesNear {
                latitude,
                longitude,
                radius_degrees,
                min_magnitude,
            } => self.collect_quakes_near(latitude, longitude, radius_degrees, min_magnitude),
            CollectionTask::TideLevels => self.collect_tide_levels(),
            CollectionTask::RiverLevels => self.collect_river_levels(),
            CollectionTask::KpIndex => self.collect_kp_index(),
            CollectionTask::Cme => self.collect_cme(),
        };
        println!(
            "[collector] completed {}: {} fetched, {} new, {} duplicate, {} published",
            task.describe(),
            summary.fetched,
            summary.inserted,
            summary.duplicates,
            summary.published
        );
        summary
    }

    // -----------------------------------------------------------------------
    // Seismic
    // -----------------------------------------------------------------------

    /// Collects earthquakes from the default lookback window at the
    /// configured magnitude floor.
    pub fn collect_recent_quakes(&self) -> BatchSummary {
        let lookback = self.config.quake.lookback_hours;
        let min_magnitude = self.config.quake.min_magnitude;

        let records = self.quake_api.call(
            || {
                quake::fetch_recent(&self.http, &self.config.quake, lookback, min_magnitude)
                    .map(|batch| batch.into_iter().map(Observation::Quake).collect())
            },
            || self.recent_from_store(Source::Seismic, ChronoDuration::hours(lookback)),
        );

        self.process_batch(records, QueryKind::Standard)
    }

    /// Collects significant earthquakes: magnitude 6.0+ over a 7-day window.
    pub fn collect_significant_quakes(&self) -> BatchSummary {
        let records = self.quake_api.call(
            || {
                quake::fetch_recent(&self.http, &self.config.quake, 168, 6.0)
                    .map(|batch| batch.into_iter().map(Observation::Quake).collect())
            },
            || self.recent_from_store(Source::Seismic, ChronoDuration::hours(168)),
        );

        self.process_batch(records, QueryKind::Significant)
    }

    /// Collects earthquakes near a point. The fallback serves previously
    /// stored events from the equivalent bounding box.
    pub fn collect_quakes_near(
        &self,
        latitude: f64,
        longitude: f64,
        radius_degrees: f64,
        min_magnitude: f64,
    ) -> BatchSummary {
        let records = self.quake_api.call(
            || {
                quake::fetch_near_location(
                    &self.http,
                    &self.config.quake,
                    latitude,
                    longitude,
                    radius_degrees,
                    min_magnitude,
                )
                .map(|batch| batch.into_iter().map(Observation::Quake).collect())
            },
            || {
                self.store
                    .find_in_bounding_box(
                        Source::Seismic,
                        latitude - radius_degrees,
                        latitude + radius_degrees,
                        longitude - radius_degrees,
                        longitude + radius_degrees,
                    )
                    .unwrap_or_default()
            },
        );

        self.process_batch(records, QueryKind::Standard)
    }

    // -----------------------------------------------------------------------
    // Water levels
    // -----------------------------------------------------------------------

    /// Fans out over the tide station roster, one resilience-wrapped fetch
    /// per station.
    pub fn collect_tide_levels(&self) -> BatchSummary {
        let stagger = Duration::from_millis(self.config.tides.dispatch_stagger_ms);

        let jobs: Vec<(String, Box<dyn FnOnce() -> Vec<Observation> + Send>)> =
            stations::tide_station_ids()
                .into_iter()
                .map(|station_id| {
                    let source = self.tides_api.clone();
                    let http = self.http.clone();
                    let config = self.config.tides.clone();
                    let store = Arc::clone(&self.store);
                    let id = station_id.to_string();
                    let job_id = id.clone();
                    let job: Box<dyn FnOnce() -> Vec<Observation> + Send> =
                        Box::new(move || {
                            source.call(
                                || {
                                    tides::fetch_latest(&http, &config, &id)
                                        .map(|obs| vec![Observation::WaterLevel(obs)])
                                },
                                || cached_station(&store, Source::Tide, &id),
                            )
                        });
                    (job_id, job)
                })
                .collect();

        let outcomes = fanout::run_fan_out(self.config.fanout.max_in_flight, stagger, jobs);
        self.process_batch(fanout::merge_outcomes(outcomes), QueryKind::Standard)
    }

    /// Fans out over the river site roster.
    pub fn collect_river_levels(&self) -> BatchSummary {
        let stagger = Duration::from_millis(self.config.river.dispatch_stagger_ms);

        let jobs: Vec<(String, Box<dyn FnOnce() -> Vec<Observation> + Send>)> =
            stations::river_site_ids()
                .into_iter()
                .map(|site_code| {
                    let source = self.river_api.clone();
                    let http = self.http.clone();
                    let config = self.config.river.clone();
                    let store = Arc::clone(&self.store);
                    let id = site_code.to_string();
                    let job_id = id.clone();
                    let job: Box<dyn FnOnce() -> Vec<Observation> + Send> =
                        Box::new(move || {
                            source.call(
                                || {
                                    river::fetch_latest(&http, &config, &[id.as_str()]).map(
                                        |batch| {
                                            batch
                                                .into_iter()
                                                .map(Observation::WaterLevel)
                                                .collect()
                                        },
                                    )
                                },
                                || cached_station(&store, Source::River, &id),
                            )
                        });
                    (job_id, job)
                })
                .collect();

        let outcomes = fanout::run_fan_out(self.config.fanout.max_in_flight, stagger, jobs);
        self.process_batch(fanout::merge_outcomes(outcomes), QueryKind::Standard)
    }

    // -----------------------------------------------------------------------
    // Space weather
    // -----------------------------------------------------------------------

    pub fn collect_kp_index(&self) -> BatchSummary {
        let records = self.swpc_api.call(
            || {
                space_weather::fetch_kp_index(&self.http, &self.config.space_weather)
                    .map(|batch| batch.into_iter().map(Observation::SpaceWeather).collect())
            },
            || self.recent_from_store(Source::SpaceWeather, ChronoDuration::hours(3)),
        );

        self.process_batch(records, QueryKind::Standard)
    }

    pub fn collect_cme(&self) -> BatchSummary {
        let lookback = self.config.space_weather.cme_lookback_days;
        let records = self.donki_api.call(
            || {
                space_weather::fetch_cme(&self.http, &self.config.space_weather)
                    .map(|batch| batch.into_iter().map(Observation::SpaceWeather).collect())
            },
            || self.recent_from_store(Source::SpaceWeather, ChronoDuration::days(lookback)),
        );

        self.process_batch(records, QueryKind::Standard)
    }

    // -----------------------------------------------------------------------
    // Shared pipeline tail
    // -----------------------------------------------------------------------

    fn recent_from_store(&self, source: Source, window: ChronoDuration) -> Vec<Observation> {
        self.store
            .find_recent_since(source, Utc::now() - window)
            .unwrap_or_default()
    }

    /// Dedup, persist, classify, route, publish. Only records inserted for
    /// the first time are routed; everything else is already downstream.
    pub fn process_batch(&self, records: Vec<Observation>, query: QueryKind) -> BatchSummary {
        let mut summary = BatchSummary {
            fetched: records.len(),
            ..BatchSummary::default()
        };

        for record in records {
            match self.store.save(&record) {
                Ok(SaveOutcome::Inserted) => {
                    summary.inserted += 1;
                    log_alerts(&record);
                    for route in router::routes_for(&record, query) {
                        let payload = publish::event_payload(&record, route.event_type);
                        self.publisher
                            .send(route.channel, &router::partition_key(&record), &payload);
                        summary.published += 1;
                    }
                }
                Ok(SaveOutcome::AlreadyExists) => {
                    summary.duplicates += 1;
                }
                Err(e) => {
                    summary.store_errors += 1;
                    eprintln!(
                        "[collector] failed to persist {} record {}: {}",
                        record.source(),
                        record.natural_key(),
                        e
                    );
                }
            }
        }

        summary
    }
}

/// Fallback for a single station: its newest stored reading, or nothing.
fn cached_station(
    store: &Arc<dyn ObservationStore>,
    source: Source,
    station_id: &str,
) -> Vec<Observation> {
    match store.latest_for_station(source, station_id) {
        Ok(Some(record)) => vec![record],
        _ => Vec::new(),
    }
}

/// Operator-facing log lines for records that cross alert thresholds.
fn log_alerts(record: &Observation) {
    match record {
        Observation::Quake(quake) => {
            if severity::is_dangerous(quake) {
                eprintln!(
                    "EARTHQUAKE ALERT: M{} - {} - {} severity - {}",
                    quake.magnitude.unwrap_or(0.0),
                    quake.event_id,
                    severity::quake_severity(quake).as_str(),
                    quake.place
                );
            }
            let risk = severity::tsunami_risk_score(quake);
            if quake.tsunami_flag || risk >= 50 {
                eprintln!(
                    "TSUNAMI WARNING: M{} at {} - risk score {} - {}",
                    quake.magnitude.unwrap_or(0.0),
                    quake
                        .depth_km
                        .map(|d| format!("{} km depth", d))
                        .unwrap_or_else(|| "unknown depth".to_string()),
                    risk,
                    quake.place
                );
            }
        }
        Observation::WaterLevel(reading) => {
            if severity::is_flooding(reading) {
                eprintln!(
                    "FLOOD ALERT: station {} - {} severity",
                    reading.station_id,
                    severity::flood_severity(reading).as_str()
                );
            }
        }
        Observation::SpaceWeather(_) => {}
    }
}

// ---------------------------------------------------------------------------
// Fire-and-forget trigger handle
// ---------------------------------------------------------------------------

/// Manual trigger surface: dispatches a collection task to a background
/// thread and returns immediately. "Success" means dispatched, not
/// completed — the run's outcome is observable only through logs and the
/// store.
#[derive(Clone)]
pub struct CollectorHandle {
    collector: Arc<Collector>,
}

impl CollectorHandle {
    pub fn new(collector: Arc<Collector>) -> Self {
        Self { collector }
    }

    pub fn collector(&self) -> &Arc<Collector> {
        &self.collector
    }

    pub fn trigger(&self, task: CollectionTask) {
        let collector = Arc::clone(&self.collector);
        std::thread::spawn(move || {
            collector.run(task);
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
