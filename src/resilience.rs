/// Retry, circuit breaker, and cache fallback for upstream calls.
///
/// Every adapter call runs through a `ResilientSource` decorator:
///
///   1. Transient failures (connection errors, timeouts, non-2xx) are
///      retried a fixed number of times with a fixed backoff.
///   2. A per-source circuit breaker opens after N consecutive failed
///      calls; while open, calls are rejected immediately with no network
///      attempt. After a cool-down one trial call is allowed (HALF_OPEN);
///      its outcome decides between closing and re-opening.
///   3. When the breaker is open or retries are exhausted, the caller's
///      fallback supplies the most recent stored observations instead.
///      The decorator never returns an error — total failure with no
///      cache degrades to an empty batch.
///
/// Breaker state is the only mutable state shared across collection runs
/// for a source; it sits behind a mutex so concurrent station calls on the
/// same source observe transitions atomically.

use crate::config::ResilienceConfig;
use crate::model::CollectError;
use std::sync::Mutex;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

/// Fixed-attempt, fixed-backoff retry. Only transient errors are retried;
/// a parse failure is returned immediately — re-requesting malformed data
/// yields the same malformed data.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first call.
    pub attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, backoff: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            backoff,
        }
    }

    /// Runs `operation` until it succeeds, fails non-transiently, or all
    /// attempts are exhausted.
    pub fn run<T, F>(&self, mut operation: F) -> Result<T, CollectError>
    where
        F: FnMut() -> Result<T, CollectError>,
    {
        let mut attempt = 1;
        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.attempts => {
                    eprintln!(
                        "[resilience] attempt {}/{} failed ({}), retrying",
                        attempt, self.attempts, e
                    );
                    attempt += 1;
                    std::thread::sleep(self.backoff);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Circuit breaker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl BreakerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        }
    }
}

struct BreakerInner {
    state: BreakerState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

/// Per-source circuit breaker with CLOSED → OPEN → HALF_OPEN transitions.
pub struct CircuitBreaker {
    name: String,
    failure_threshold: u32,
    cooldown: Duration,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(name: &str, failure_threshold: u32, cooldown: Duration) -> Self {
        Self {
            name: name.to_string(),
            failure_threshold: failure_threshold.max(1),
            cooldown,
            inner: Mutex::new(BreakerInner {
                state: BreakerState::Closed,
                consecutive_failures: 0,
                opened_at: None,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> BreakerState {
        self.inner.lock().expect("breaker lock poisoned").state
    }

    /// Whether a call may proceed. An OPEN breaker whose cool-down has
    /// elapsed transitions to HALF_OPEN and admits exactly one trial call;
    /// further calls are rejected until the trial reports its outcome.
    pub fn try_acquire(&self) -> bool {
        let mut inner = self.inner.lock().expect("breaker lock poisoned");
        match inner.state {
            BreakerState::Closed => true,
            BreakerState::HalfOpen => false, // trial already in flight
            BreakerState::Open => {
                let cooled_down = inner
                    .opened_at
                    .map(|at| at.elapsed() >= self.cooldown)
                    .unwrap_or(true);
                if cooled_down {
                    inner.state = BreakerState::HalfOpen;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock().expect("breaker lock poisoned");
        if inner.state != BreakerState::Closed {
            println!("[resilience] breaker '{}' closed after successful call", self.name);
        }
        inner.state = BreakerState::Closed;
        inner.consecutive_failures = 0;
        inner.opened_at = None;
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.lock().expect("breaker lock poisoned");
        match inner.state {
            BreakerState::HalfOpen => {
                // Failed trial call: back to OPEN for another cool-down.
                inner.state = BreakerState::Open;
                inner.opened_at = Some(Instant::now());
                eprintln!("[resilience] breaker '{}' re-opened after failed trial", self.name);
            }
            BreakerState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.failure_threshold {
                    inner.state = BreakerState::Open;
                    inner.opened_at = Some(Instant::now());
                    eprintln!(
                        "[resilience] breaker '{}' opened after {} consecutive failures",
                        self.name, inner.consecutive_failures
                    );
                }
            }
            BreakerState::Open => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Resilient source decorator
// ---------------------------------------------------------------------------

/// Retry + breaker + fallback composed around one source's adapter calls.
/// Clone-cheap: the breaker is shared so all station calls for a source
/// feed the same state.
#[derive(Clone)]
pub struct ResilientSource {
    retry: RetryPolicy,
    breaker: std::sync::Arc<CircuitBreaker>,
}

impl ResilientSource {
    pub fn new(name: &str, config: &ResilienceConfig) -> Self {
        Self {
            retry: RetryPolicy::new(config.retry_attempts, config.retry_backoff()),
            breaker: std::sync::Arc::new(CircuitBreaker::new(
                name,
                config.breaker_failure_threshold,
                config.breaker_cooldown(),
            )),
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Runs `fetch` under retry and breaker policy, serving `fallback`
    /// when the breaker is open or the call ultimately fails.
    ///
    /// `NoData` counts as a healthy call with an empty batch — a provider
    /// that answers "nothing new" is not failing. Transport errors and
    /// envelope-level parse failures count against the breaker; only
    /// transport errors are retried first.
    pub fn call<T, F, G>(&self, fetch: F, fallback: G) -> Vec<T>
    where
        F: FnMut() -> Result<Vec<T>, CollectError>,
        G: FnOnce() -> Vec<T>,
    {
        if !self.breaker.try_acquire() {
            eprintln!(
                "[resilience] breaker '{}' is open, serving cached data",
                self.breaker.name()
            );
            return fallback();
        }

        match self.retry.run(fetch) {
            Ok(records) => {
                self.breaker.record_success();
                records
            }
            Err(CollectError::NoData(msg)) => {
                self.breaker.record_success();
                println!("[resilience] '{}': no data upstream ({})", self.breaker.name(), msg);
                Vec::new()
            }
            Err(e) => {
                self.breaker.record_failure();
                eprintln!(
                    "[resilience] '{}' call failed ({}), serving cached data",
                    self.breaker.name(),
                    e
                );
                fallback()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
