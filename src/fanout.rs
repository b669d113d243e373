/// Fan-out coordinator: concurrent, rate-limited collection across a
/// roster of stations.
///
/// Each station fetch is a unit of work submitted to a bounded worker
/// pool; results merge through a single channel. A small fixed delay
/// between dispatches keeps the service inside upstream rate limits.
///
/// One station's failure never aborts the others — by the time work
/// reaches this module every job is resilience-wrapped and infallible
/// (live records, cached fallback, or empty), so every station
/// contributes exactly one outcome to the merged output. There is no
/// global retry of the roster.

use std::sync::mpsc;
use std::time::Duration;
use threadpool::ThreadPool;

/// The result of one station's fetch: its records, possibly empty when
/// the station failed and no cache existed.
#[derive(Debug)]
pub struct StationOutcome<T> {
    pub station_id: String,
    pub records: Vec<T>,
}

/// Runs one resilience-wrapped job per station on a pool of at most
/// `max_in_flight` workers, sleeping `dispatch_stagger` between
/// dispatches. Returns one outcome per station, in completion order
/// (no cross-station ordering is guaranteed; within a station the
/// fetched order is preserved).
pub fn run_fan_out<T, F>(
    max_in_flight: usize,
    dispatch_stagger: Duration,
    jobs: Vec<(String, F)>,
) -> Vec<StationOutcome<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Vec<T> + Send + 'static,
{
    let pool = ThreadPool::new(max_in_flight.max(1));
    let (sender, receiver) = mpsc::channel();

    for (dispatched, (station_id, job)) in jobs.into_iter().enumerate() {
        if dispatched > 0 && !dispatch_stagger.is_zero() {
            std::thread::sleep(dispatch_stagger);
        }
        let sender = sender.clone();
        pool.execute(move || {
            let records = job();
            // Send fails only if the coordinator itself is gone.
            let _ = sender.send(StationOutcome {
                station_id,
                records,
            });
        });
    }

    // Dropping the original sender lets the receiver end once every
    // worker has reported.
    drop(sender);
    receiver.iter().collect()
}

/// Flattens per-station outcomes into the single merged record sequence
/// the downstream pipeline consumes.
pub fn merge_outcomes<T>(outcomes: Vec<StationOutcome<T>>) -> Vec<T> {
    outcomes
        .into_iter()
        .flat_map(|outcome| outcome.records)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
