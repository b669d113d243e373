/// Core daemon implementation for the hazard collection service.
///
/// This module implements the long-running daemon that:
/// 1. Validates rosters and reports data freshness on startup
/// 2. Runs one independent periodic trigger per hazard domain
/// 3. Hands each firing to the collector, which does the actual work
///
/// Timers are deliberately not serialized against manual triggers for the
/// same domain: the store's at-most-once save per natural key makes an
/// overlapping duplicate run a no-op, so the daemon tolerates overlap
/// instead of locking. A run already in flight completes independently of
/// newer firings; upstream hangs are bounded only by the adapters'
/// per-provider timeouts.

use crate::collector::{Collector, CollectionTask};
use crate::config::ScheduleConfig;
use crate::model::Source;
use crate::stations;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Every `SIGNIFICANT_EVERY`th seismic poll also runs the 7-day
/// significant-events query; its window is long, so polling it at the
/// recent-events cadence would only produce duplicates.
const SIGNIFICANT_EVERY: u64 = 6;

// ---------------------------------------------------------------------------
// Daemon
// ---------------------------------------------------------------------------

pub struct Daemon {
    collector: Arc<Collector>,
    schedule: ScheduleConfig,
}

impl Daemon {
    pub fn new(collector: Arc<Collector>, schedule: ScheduleConfig) -> Self {
        Self {
            collector,
            schedule,
        }
    }

    /// Validates static configuration the daemon cannot run without.
    pub fn initialize(&self) -> Result<(), Box<dyn std::error::Error>> {
        if stations::TIDE_STATIONS.is_empty() {
            return Err("tide station roster is empty".into());
        }
        if stations::RIVER_SITES.is_empty() {
            return Err("river site roster is empty".into());
        }
        Ok(())
    }

    /// Age of the newest stored observation for a domain, or `None` when
    /// nothing has been collected in the trailing week.
    pub fn staleness(&self, source: Source) -> Option<ChronoDuration> {
        let week_ago = Utc::now() - ChronoDuration::days(7);
        self.collector
            .store()
            .find_recent_since(source, week_ago)
            .ok()
            .and_then(|records| records.first().map(|r| Utc::now() - r.observed_at()))
    }

    /// Prints a per-domain freshness report; used at startup so operators
    /// see immediately which domains need their first collection.
    pub fn report_freshness(&self) {
        for source in [
            Source::Seismic,
            Source::Tide,
            Source::River,
            Source::SpaceWeather,
        ] {
            match self.staleness(source) {
                Some(age) if age.num_hours() >= 2 => {
                    println!(
                        "   {} - newest data is {} hours old (stale)",
                        source,
                        age.num_hours()
                    );
                }
                Some(age) => {
                    println!("   {} - data is fresh ({} min old)", source, age.num_minutes());
                }
                None => {
                    println!("   {} - no data found (first collection pending)", source);
                }
            }
        }
    }

    /// Runs the periodic triggers: one timer thread per hazard domain,
    /// each firing its domain's collection tasks on its own interval.
    /// Never returns.
    pub fn run(&self) {
        let timers = vec![
            spawn_domain_timer(
                "seismic",
                self.schedule.quake_poll_minutes,
                Arc::clone(&self.collector),
                |collector, iteration| {
                    collector.run(CollectionTask::RecentQuakes);
                    if iteration % SIGNIFICANT_EVERY == 0 {
                        collector.run(CollectionTask::SignificantQuakes);
                    }
                },
            ),
            spawn_domain_timer(
                "tide",
                self.schedule.tides_poll_minutes,
                Arc::clone(&self.collector),
                |collector, _| {
                    collector.run(CollectionTask::TideLevels);
                },
            ),
            spawn_domain_timer(
                "river",
                self.schedule.river_poll_minutes,
                Arc::clone(&self.collector),
                |collector, _| {
                    collector.run(CollectionTask::RiverLevels);
                },
            ),
            spawn_domain_timer(
                "space_weather",
                self.schedule.space_weather_poll_minutes,
                Arc::clone(&self.collector),
                |collector, _| {
                    collector.run(CollectionTask::KpIndex);
                    collector.run(CollectionTask::Cme);
                },
            ),
        ];

        for timer in timers {
            // Timer threads loop forever; joining parks the main thread.
            let _ = timer.join();
        }
    }
}

/// Spawns one domain's timer thread: fire, then sleep out the remainder of
/// the interval (a slow poll does not shift the schedule by its own
/// duration).
fn spawn_domain_timer<F>(
    domain: &'static str,
    interval_minutes: u64,
    collector: Arc<Collector>,
    fire: F,
) -> std::thread::JoinHandle<()>
where
    F: Fn(&Collector, u64) + Send + 'static,
{
    std::thread::spawn(move || {
        let interval = Duration::from_secs(interval_minutes.max(1) * 60);
        let mut iteration: u64 = 0;
        loop {
            let started = std::time::Instant::now();
            fire(&collector, iteration);
            iteration += 1;

            let elapsed = started.elapsed();
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            } else {
                eprintln!(
                    "[daemon] {} poll took {}s, longer than its {}s interval",
                    domain,
                    elapsed.as_secs(),
                    interval.as_secs()
                );
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectorConfig;
    use crate::model::{Observation, QuakeObservation};
    use crate::publish::CollectingPublisher;
    use crate::store::{MemoryStore, ObservationStore};
    use chrono::TimeZone;

    fn daemon_with_store(store: Arc<MemoryStore>) -> Daemon {
        let collector = Arc::new(Collector::new(
            CollectorConfig::default(),
            store,
            Arc::new(CollectingPublisher::new()),
        ));
        Daemon::new(collector, ScheduleConfig::default())
    }

    #[test]
    fn test_daemon_initializes_with_builtin_rosters() {
        let daemon = daemon_with_store(Arc::new(MemoryStore::new()));
        assert!(daemon.initialize().is_ok());
    }

    #[test]
    fn test_staleness_is_none_for_empty_store() {
        let daemon = daemon_with_store(Arc::new(MemoryStore::new()));
        assert!(
            daemon.staleness(Source::Seismic).is_none(),
            "empty store means maximum staleness"
        );
    }

    #[test]
    fn test_staleness_measured_from_newest_observation() {
        let store = Arc::new(MemoryStore::new());
        let two_hours_ago = Utc::now() - ChronoDuration::hours(2);
        store
            .save(&Observation::Quake(QuakeObservation {
                event_id: "us7000stale".to_string(),
                magnitude: Some(5.0),
                magnitude_type: None,
                depth_km: Some(10.0),
                latitude: 38.0,
                longitude: 142.0,
                event_time: two_hours_ago,
                place: "test".to_string(),
                region: "test".to_string(),
                tsunami_flag: false,
                alert_level: None,
                significance: None,
                felt_reports: None,
                network: None,
                event_url: None,
                raw_payload: "{}".to_string(),
                collected_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            }))
            .unwrap();

        let daemon = daemon_with_store(store);
        let age = daemon
            .staleness(Source::Seismic)
            .expect("stored record should yield a staleness");
        assert!(
            (115..=125).contains(&age.num_minutes()),
            "should be about 120 minutes, got {}",
            age.num_minutes()
        );
    }
}
